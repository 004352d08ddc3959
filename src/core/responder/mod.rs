//! Sources of assistant replies.
//!
//! The controller hands every accepted user message to a [`Responder`] on a
//! background task and applies the result when it comes back.

pub mod catalog;
pub mod mock;
pub mod remote;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::core::config::{ChatMode, Config};
use crate::core::error::ChatError;
use crate::core::message::Message;

pub use mock::MockResponder;
pub use remote::RemoteResponder;

#[async_trait]
pub trait Responder: Send + Sync {
    /// Produce the assistant reply for `message`.
    async fn respond(&self, message: &Message) -> Result<Message, ChatError>;

    fn mode(&self) -> ChatMode;
}

pub fn build_responder(config: &Config) -> Result<Arc<dyn Responder>, reqwest::Error> {
    Ok(match config.mode() {
        ChatMode::Mock => Arc::new(MockResponder::new(config.mock_delay())),
        ChatMode::Api => Arc::new(RemoteResponder::from_config(config)?),
    })
}

/// Ask `responder` for a reply, giving up after `timeout` when one is set.
pub async fn respond_within(
    responder: &dyn Responder,
    message: &Message,
    timeout: Option<Duration>,
) -> Result<Message, ChatError> {
    let Some(limit) = timeout else {
        return responder.respond(message).await;
    };
    match tokio::time::timeout(limit, responder.respond(message)).await {
        Ok(result) => result,
        Err(_) => {
            warn!(timeout_secs = limit.as_secs(), "responder timed out");
            Err(ChatError::Connectivity(format!(
                "no reply within {} seconds",
                limit.as_secs()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responder_follows_configured_mode() {
        let mut config = Config {
            mode: Some(ChatMode::Mock),
            ..Default::default()
        };
        assert_eq!(build_responder(&config).unwrap().mode(), ChatMode::Mock);

        config.mode = Some(ChatMode::Api);
        assert_eq!(build_responder(&config).unwrap().mode(), ChatMode::Api);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_reply_times_out() {
        let responder = MockResponder::new(Duration::from_secs(30));
        let result = respond_within(
            &responder,
            &Message::user("hi"),
            Some(Duration::from_secs(5)),
        )
        .await;
        assert!(matches!(result, Err(ChatError::Connectivity(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn no_timeout_waits_for_reply() {
        let responder = MockResponder::new(Duration::from_secs(30));
        let result = respond_within(&responder, &Message::user("hi"), None).await;
        assert!(result.is_ok());
    }
}
