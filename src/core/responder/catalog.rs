//! Canned replies used by the mock responder.

use crate::core::message::{Product, SocialPost};

/// Which canned reply a user message maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CannedReply {
    Matching,
    Similar,
    General,
}

impl CannedReply {
    /// Pick a reply by keyword; "match" takes precedence over "similar".
    pub fn for_text(text: &str) -> Self {
        let lowered = text.to_lowercase();
        if lowered.contains("match") {
            CannedReply::Matching
        } else if lowered.contains("similar") {
            CannedReply::Similar
        } else {
            CannedReply::General
        }
    }

    pub fn content(self) -> &'static str {
        match self {
            CannedReply::Matching => {
                "Here are some items that would match well with your selection:\n\n\
                 [PRODUCTS]\n\n\
                 I've also found some inspiring posts showing how to style these items:\n\n\
                 [POSTS]"
            }
            CannedReply::Similar => {
                "I found these similar items that match your style:\n\n[PRODUCTS]"
            }
            CannedReply::General => {
                "Based on your style preferences, I've found some great items and trending posts that might interest you!\n\n\
                 [PRODUCTS]\n\n\
                 These items are trending right now and would complement your style perfectly. \
                 I've also found some inspiring social media posts showing how to style similar pieces:\n\n\
                 [POSTS]\n\n\
                 Let me know if you'd like more specific recommendations or have any questions about the items!"
            }
        }
    }

    pub fn products(self) -> Vec<Product> {
        match self {
            CannedReply::Matching => vec![
                product(
                    "Matching Item 1",
                    "$79.99",
                    "match1",
                    "Perfect complement to your selected item",
                    "Fashion Finds",
                ),
                product(
                    "Matching Item 2",
                    "$89.99",
                    "match2",
                    "Another great piece to complete the look",
                    "Style Studio",
                ),
            ],
            CannedReply::Similar => vec![
                product(
                    "Similar Item 1",
                    "$69.99",
                    "similar1",
                    "Similar style with a unique twist",
                    "Fashion Hub",
                ),
                product(
                    "Similar Item 2",
                    "$84.99",
                    "similar2",
                    "Another great alternative in the same style",
                    "Style Co",
                ),
            ],
            CannedReply::General => vec![
                product(
                    "Classic White Sneakers",
                    "$89.99",
                    "sneakers",
                    "Versatile white sneakers that go with everything",
                    "Urban Footwear",
                ),
                product(
                    "Denim Jacket",
                    "$129.99",
                    "jacket",
                    "Classic denim jacket perfect for layering",
                    "Fashion District",
                ),
                product(
                    "Linen Overshirt",
                    "$74.99",
                    "overshirt",
                    "Breathable layer for warm evenings",
                    "Fashion District",
                ),
                product(
                    "Leather Belt",
                    "$39.99",
                    "belt",
                    "Full-grain belt that ties the outfit together",
                    "Urban Footwear",
                ),
            ],
        }
    }

    pub fn posts(self) -> Vec<SocialPost> {
        let all = trending_posts();
        match self {
            CannedReply::Matching => all.into_iter().take(1).collect(),
            CannedReply::Similar => Vec::new(),
            CannedReply::General => all,
        }
    }
}

fn product(name: &str, price: &str, slug: &str, description: &str, shop: &str) -> Product {
    Product {
        name: name.to_string(),
        price: price.to_string(),
        image_url: format!("https://example.com/{slug}.jpg"),
        description: description.to_string(),
        shop: shop.to_string(),
        link: Some(format!("https://example.com/{slug}")),
    }
}

fn trending_posts() -> Vec<SocialPost> {
    vec![
        SocialPost {
            id: "1".to_string(),
            username: "fashionista".to_string(),
            user_avatar: "https://example.com/avatar1.jpg".to_string(),
            image_url: "https://example.com/fashion1.jpg".to_string(),
            caption: "Styling the perfect casual weekend outfit with these amazing pieces! #fashion #style"
                .to_string(),
            link: "https://instagram.com/p/123".to_string(),
        },
        SocialPost {
            id: "2".to_string(),
            username: "styleexpert".to_string(),
            user_avatar: "https://example.com/avatar2.jpg".to_string(),
            image_url: "https://example.com/fashion2.jpg".to_string(),
            caption: "The essential summer wardrobe pieces you need this season ☀️ #summerstyle"
                .to_string(),
            link: "https://instagram.com/p/456".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::split_content;

    #[test]
    fn keyword_selection_is_case_insensitive() {
        assert_eq!(CannedReply::for_text("What would MATCH this?"), CannedReply::Matching);
        assert_eq!(CannedReply::for_text("show me Similar shoes"), CannedReply::Similar);
        assert_eq!(CannedReply::for_text("hello"), CannedReply::General);
        assert_eq!(
            CannedReply::for_text("similar items that match"),
            CannedReply::Matching
        );
    }

    #[test]
    fn table_sizes() {
        assert_eq!(CannedReply::Matching.products().len(), 2);
        assert_eq!(CannedReply::Matching.posts().len(), 1);
        assert_eq!(CannedReply::Similar.products().len(), 2);
        assert!(CannedReply::Similar.posts().is_empty());
        assert_eq!(CannedReply::General.products().len(), 4);
        assert_eq!(CannedReply::General.posts().len(), 2);
    }

    #[test]
    fn canned_content_has_valid_markers() {
        for reply in [
            CannedReply::Matching,
            CannedReply::Similar,
            CannedReply::General,
        ] {
            let split = split_content(reply.content());
            assert!(split.validate().is_ok());
            assert!(split.products_index.is_some());
            assert_eq!(split.posts_index.is_some(), !reply.posts().is_empty());
        }
    }
}
