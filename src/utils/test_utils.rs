use crate::core::app::App;
use crate::core::config::{ChatMode, Config};
use crate::core::message::{Product, SocialPost};

pub fn sample_product(name: &str) -> Product {
    Product {
        name: name.to_string(),
        price: "$10.00".to_string(),
        image_url: format!("https://example.com/{}.jpg", name.to_lowercase().replace(' ', "-")),
        description: format!("{name} description"),
        shop: "Shop".to_string(),
        link: None,
    }
}

pub fn sample_products(count: usize) -> Vec<Product> {
    (1..=count)
        .map(|i| sample_product(&format!("Item {i}")))
        .collect()
}

pub fn sample_post(id: &str) -> SocialPost {
    SocialPost {
        id: id.to_string(),
        username: format!("user{id}"),
        user_avatar: format!("https://example.com/avatar{id}.jpg"),
        image_url: format!("https://example.com/post{id}.jpg"),
        caption: format!("caption {id}"),
        link: format!("https://example.com/p/{id}"),
    }
}

pub fn sample_posts(count: usize) -> Vec<SocialPost> {
    (1..=count).map(|i| sample_post(&i.to_string())).collect()
}

/// App in mock mode with no delay and no transcript log.
pub fn create_test_app() -> App {
    let config = Config {
        mode: Some(ChatMode::Mock),
        mock_delay_ms: Some(0),
        ..Default::default()
    };
    App::new(config, None).expect("test app")
}
