//! TUI-less "say" command

use std::error::Error;
use std::path::PathBuf;

use tracing::debug;

use crate::core::app::App;
use crate::core::attachment::load_image;
use crate::core::config::Config;
use crate::core::message::Message;
use crate::core::responder::respond_within;
use crate::ui::sections::{render_sections, RenderBlock};

pub async fn run_say(
    config: Config,
    prompt: Vec<String>,
    image: Option<PathBuf>,
    log_file: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");

    let image = match image {
        Some(path) => Some(load_image(&path).await?),
        None => None,
    };

    let mut app = App::new(config, log_file)?;
    let ticket = app.conversation().send(&prompt, image, None)?;
    debug!(request_id = ticket.request_id, "say request sent");

    let result = respond_within(ticket.responder.as_ref(), &ticket.message, ticket.timeout).await;
    match result {
        Ok(reply) => {
            for line in format_reply(&reply) {
                println!("{line}");
            }
            app.conversation()
                .complete_response(ticket.request_id, Ok(reply));
            Ok(())
        }
        Err(err) => {
            app.conversation()
                .complete_response(ticket.request_id, Err(err.clone()));
            Err(err.into())
        }
    }
}

/// Plain-text rendition of a reply, block by block.
pub fn format_reply(message: &Message) -> Vec<String> {
    let mut lines = Vec::new();
    for block in render_sections(message) {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        match block {
            RenderBlock::Text(text) => lines.extend(text.lines().map(str::to_string)),
            RenderBlock::Image(_) => lines.push("[image attached]".to_string()),
            RenderBlock::Products { items, .. } => {
                for product in items {
                    lines.push(format!(
                        "• {} ({}, {})",
                        product.name, product.price, product.shop
                    ));
                    if let Some(link) = &product.link {
                        lines.push(format!("  {link}"));
                    }
                }
            }
            RenderBlock::Overflow { kind, remaining } => {
                lines.push(format!("… and {remaining} more {}", kind.noun(remaining)));
            }
            RenderBlock::Posts(posts) => {
                for post in posts {
                    lines.push(format!("@{}: {}", post.username, post.caption));
                    lines.push(format!("  {}", post.link));
                }
            }
            RenderBlock::Styles(styles) => lines.push(format!("Styles: {}", styles.join(", "))),
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{sample_posts, sample_products};

    #[test]
    fn reply_lines_follow_block_order() {
        let reply = Message::assistant("Here:\n\n[PRODUCTS]\n\nEnjoy!")
            .with_products(sample_products(3))
            .with_styles(vec!["minimalist".into()]);

        let lines = format_reply(&reply);

        assert_eq!(
            lines,
            vec![
                "Here:",
                "",
                "• Item 1 ($10.00, Shop)",
                "• Item 2 ($10.00, Shop)",
                "",
                "… and 1 more product",
                "",
                "Enjoy!",
                "",
                "Styles: minimalist",
            ]
        );
    }

    #[test]
    fn posts_print_author_and_link() {
        let reply = Message::assistant("Inspiration").with_posts(sample_posts(1));

        let lines = format_reply(&reply);

        assert!(lines.contains(&"@user1: caption 1".to_string()));
        assert!(lines.contains(&"  https://example.com/p/1".to_string()));
    }

    #[tokio::test]
    async fn empty_prompt_without_image_is_rejected() {
        let config = Config {
            mode: Some(crate::core::config::ChatMode::Mock),
            mock_delay_ms: Some(0),
            ..Default::default()
        };
        let err = run_say(config, Vec::new(), None, None)
            .await
            .expect_err("empty send");
        assert_eq!(err.to_string(), "Type a message or attach an image first");
    }

    #[tokio::test]
    async fn mock_reply_is_printed() {
        let config = Config {
            mode: Some(crate::core::config::ChatMode::Mock),
            mock_delay_ms: Some(0),
            ..Default::default()
        };
        run_say(config, vec!["red".into(), "dress".into()], None, None)
            .await
            .expect("mock say");
    }
}
