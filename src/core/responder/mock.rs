use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::catalog::CannedReply;
use super::Responder;
use crate::core::config::ChatMode;
use crate::core::error::ChatError;
use crate::core::message::Message;

/// Answers from the canned catalog after a fixed delay.
pub struct MockResponder {
    delay: Duration,
}

impl MockResponder {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn reply_for(message: &Message) -> Message {
        let canned = CannedReply::for_text(&message.content);
        Message::assistant(canned.content())
            .with_products(canned.products())
            .with_posts(canned.posts())
    }
}

#[async_trait]
impl Responder for MockResponder {
    async fn respond(&self, message: &Message) -> Result<Message, ChatError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let reply = Self::reply_for(message);
        debug!(
            products = reply.products.len(),
            posts = reply.posts.len(),
            "mock reply ready"
        );
        Ok(reply)
    }

    fn mode(&self) -> ChatMode {
        ChatMode::Mock
    }
}
