//! Background tasks started by [`AppCommand`](crate::core::app::AppCommand)s.
//!
//! Each task reports back through the action channel; nothing here touches
//! the app directly.

use std::path::PathBuf;

use tracing::debug;

use crate::core::app::{AppAction, AppActionContext, AppActionDispatcher, SendTicket};
use crate::core::attachment::load_image;
use crate::core::responder::respond_within;

pub fn spawn_responder(dispatcher: AppActionDispatcher, ticket: SendTicket) {
    tokio::spawn(async move {
        let SendTicket {
            request_id,
            message,
            responder,
            cancel_token,
            timeout,
        } = ticket;

        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                debug!(request_id, "responder task cancelled");
            }
            result = respond_within(responder.as_ref(), &message, timeout) => {
                dispatcher.dispatch(
                    AppAction::ResponseReady { request_id, result },
                    AppActionContext::default(),
                );
            }
        }
    });
}

pub fn spawn_image_loader(dispatcher: AppActionDispatcher, path: PathBuf, generation: u64) {
    tokio::spawn(async move {
        let result = load_image(&path).await;
        dispatcher.dispatch(
            AppAction::ImageLoaded { generation, result },
            AppActionContext::default(),
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::AppActionEnvelope;
    use crate::utils::test_utils::create_test_app;
    use tokio::sync::mpsc;

    fn dispatcher() -> (AppActionDispatcher, mpsc::UnboundedReceiver<AppActionEnvelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (AppActionDispatcher::new(tx), rx)
    }

    #[tokio::test]
    async fn responder_reports_ready_reply() {
        let (dispatcher, mut rx) = dispatcher();
        let mut app = create_test_app();
        let ticket = app.conversation().send("hello", None, None).unwrap();
        let request_id = ticket.request_id;

        spawn_responder(dispatcher, ticket);

        let envelope = rx.recv().await.expect("action");
        match envelope.action {
            AppAction::ResponseReady { request_id: id, result } => {
                assert_eq!(id, request_id);
                assert!(result.is_ok());
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancelled_responder_reports_nothing() {
        let (dispatcher, mut rx) = dispatcher();
        let mut app = create_test_app();
        let ticket = app.conversation().send("hello", None, None).unwrap();
        ticket.cancel_token.cancel();

        spawn_responder(dispatcher, ticket);

        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn image_loader_reports_failure_for_missing_file() {
        let (dispatcher, mut rx) = dispatcher();
        spawn_image_loader(dispatcher, PathBuf::from("/definitely/missing.png"), 3);

        let envelope = rx.recv().await.expect("action");
        assert!(matches!(
            envelope.action,
            AppAction::ImageLoaded {
                generation: 3,
                result: Err(_)
            }
        ));
    }
}
