//! Message → render blocks.
//!
//! The block list is a pure function of the message. Overflow buttons and
//! product actions are plain data here; the chat loop turns a focused
//! element into the matching controller call.

use tracing::warn;

use crate::core::content::split_content;
use crate::core::message::{Message, Product, SocialPost};

/// Cards of each kind shown inline before the overflow button.
pub const INLINE_CARD_LIMIT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverflowKind {
    Products,
    Posts,
}

impl OverflowKind {
    pub fn noun(self, count: usize) -> &'static str {
        match (self, count) {
            (OverflowKind::Products, 1) => "product",
            (OverflowKind::Products, _) => "products",
            (OverflowKind::Posts, 1) => "post",
            (OverflowKind::Posts, _) => "posts",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductAction {
    MatchThis,
    SimilarItems,
}

impl ProductAction {
    pub const ALL: [ProductAction; 2] = [ProductAction::MatchThis, ProductAction::SimilarItems];

    pub fn label(self) -> &'static str {
        match self {
            ProductAction::MatchThis => "Match this",
            ProductAction::SimilarItems => "Similar items",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderBlock {
    Text(String),
    Image(String),
    /// Inline product cards; `actions` is true only for assistant replies.
    Products {
        items: Vec<Product>,
        actions: bool,
    },
    Overflow {
        kind: OverflowKind,
        remaining: usize,
    },
    /// Inline post cards, laid out as a two-column grid.
    Posts(Vec<SocialPost>),
    Styles(Vec<String>),
}

fn inline<T: Clone>(items: &[T]) -> Vec<T> {
    items.iter().take(INLINE_CARD_LIMIT).cloned().collect()
}

fn push_text(blocks: &mut Vec<RenderBlock>, text: &str) {
    if !text.trim().is_empty() {
        blocks.push(RenderBlock::Text(text.to_string()));
    }
}

/// Lay out a message as an ordered list of blocks.
pub fn render_sections(message: &Message) -> Vec<RenderBlock> {
    let mut blocks = Vec::new();

    if message.is_user() {
        push_text(&mut blocks, &message.content);
        if let Some(image) = message.first_image() {
            blocks.push(RenderBlock::Image(image.to_string()));
        }
        if !message.products.is_empty() {
            blocks.push(RenderBlock::Products {
                items: inline(&message.products),
                actions: false,
            });
        }
        return blocks;
    }

    let split = split_content(&message.content);
    // Lead, interstitial and trailing text only apply when the reply opens
    // with text ahead of `[PRODUCTS]`.
    let layout = match split.validate() {
        Ok(()) if split.lead_text().is_some() => Some(split),
        Ok(()) => None,
        Err(err) => {
            warn!(message_id = %message.id, error = %err, "rendering raw content");
            None
        }
    };

    match &layout {
        Some(split) => push_text(&mut blocks, split.lead_text().unwrap_or_default()),
        None => push_text(&mut blocks, message.content.trim()),
    }

    if !message.products.is_empty() {
        blocks.push(RenderBlock::Products {
            items: inline(&message.products),
            actions: true,
        });
        if message.products.len() > INLINE_CARD_LIMIT {
            blocks.push(RenderBlock::Overflow {
                kind: OverflowKind::Products,
                remaining: message.products.len() - INLINE_CARD_LIMIT,
            });
        }
    }

    if let Some(text) = layout.as_ref().and_then(|split| split.interstitial_text()) {
        push_text(&mut blocks, text);
    }

    if !message.posts.is_empty() {
        blocks.push(RenderBlock::Posts(inline(&message.posts)));
        if message.posts.len() > INLINE_CARD_LIMIT {
            blocks.push(RenderBlock::Overflow {
                kind: OverflowKind::Posts,
                remaining: message.posts.len() - INLINE_CARD_LIMIT,
            });
        }
    }

    if let Some(text) = layout.as_ref().and_then(|split| split.trailing_text()) {
        push_text(&mut blocks, text);
    }

    if !message.styles.is_empty() {
        blocks.push(RenderBlock::Styles(message.styles.clone()));
    }

    blocks
}
