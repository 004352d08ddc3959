use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::overflow::OverflowContent;
use super::session::{RequestState, SessionContext};
use super::ui_state::{Screen, UiState};
use crate::core::attachment::ImageAttachment;
use crate::core::error::{ChatError, SendError};
use crate::core::message::{Message, Product};
use crate::core::responder::Responder;

/// Everything a spawned task needs to produce one reply.
pub struct SendTicket {
    pub request_id: u64,
    pub message: Message,
    pub responder: Arc<dyn Responder>,
    pub cancel_token: CancellationToken,
    pub timeout: Option<Duration>,
}

pub fn match_prompt(product: &Product) -> String {
    format!("Find items that match with {}", product.name)
}

pub fn similar_prompt(product: &Product) -> String {
    format!("Show me similar items to {}", product.name)
}

pub struct ConversationController<'a> {
    session: &'a mut SessionContext,
    ui: &'a mut UiState,
}

impl<'a> ConversationController<'a> {
    pub fn new(session: &'a mut SessionContext, ui: &'a mut UiState) -> Self {
        Self { session, ui }
    }

    /// Append the user message and hand back a ticket for the responder.
    ///
    /// The user message stays in the conversation whatever the reply turns
    /// out to be.
    pub fn send(
        &mut self,
        text: &str,
        image: Option<ImageAttachment>,
        product: Option<Product>,
    ) -> Result<SendTicket, SendError> {
        if text.trim().is_empty() && image.is_none() {
            return Err(SendError::Empty);
        }
        if self.session.request.is_pending() {
            return Err(SendError::Busy);
        }

        let mut message = Message::user(text);
        if let Some(image) = image {
            message = message.with_images(vec![image.data_url]);
        }
        if let Some(product) = product {
            message = message.with_products(vec![product]);
        }

        if let Err(e) = self.session.logging.log_message(&message) {
            warn!(error = %e, "failed to write transcript log");
        }

        self.session.clear_attachment();
        self.session.next_request_id += 1;
        let request_id = self.session.next_request_id;
        let cancel_token = CancellationToken::new();
        self.session.cancel_token = Some(cancel_token.clone());
        self.session.request = RequestState::AwaitingResponse { request_id };

        self.ui.messages.push(message.clone());
        self.ui.screen = Screen::Chat;
        self.ui.scroll_to_bottom();

        debug!(request_id, mode = %self.session.mode(), "message sent");
        Ok(SendTicket {
            request_id,
            message,
            responder: Arc::clone(&self.session.responder),
            cancel_token,
            timeout: self.session.config.request_timeout(),
        })
    }

    /// Apply a finished reply. Returns false when the id is stale.
    pub fn complete_response(
        &mut self,
        request_id: u64,
        result: Result<Message, ChatError>,
    ) -> bool {
        if self.session.request != (RequestState::AwaitingResponse { request_id }) {
            debug!(request_id, "dropping stale response");
            return false;
        }
        self.session.request = RequestState::Idle;
        self.session.cancel_token = None;

        match result {
            Ok(reply) => {
                if let Err(e) = self.session.logging.log_message(&reply) {
                    warn!(error = %e, "failed to write transcript log");
                }
                info!(
                    request_id,
                    products = reply.products.len(),
                    posts = reply.posts.len(),
                    "reply received"
                );
                self.ui.messages.push(reply);
                self.ui.scroll_to_bottom();
            }
            Err(err) => {
                warn!(request_id, error = %err, "request failed");
                self.ui.notify_error(err.to_string());
            }
        }
        true
    }

    /// Abort the in-flight request, if any.
    pub fn cancel_pending(&mut self) -> bool {
        let RequestState::AwaitingResponse { request_id } = self.session.request else {
            return false;
        };
        if let Some(token) = self.session.cancel_token.take() {
            token.cancel();
        }
        self.session.request = RequestState::Idle;
        info!(request_id, "request cancelled");
        self.ui.notify_info("Request cancelled");
        true
    }

    pub fn match_this(&mut self, product: &Product) -> Result<SendTicket, SendError> {
        self.send_about(match_prompt(product), product)
    }

    pub fn similar_items(&mut self, product: &Product) -> Result<SendTicket, SendError> {
        self.send_about(similar_prompt(product), product)
    }

    fn send_about(&mut self, prompt: String, product: &Product) -> Result<SendTicket, SendError> {
        let image = self.session.pending_image.clone();
        let ticket = self.send(&prompt, image, Some(product.clone()))?;
        self.close_overflow();
        Ok(ticket)
    }

    pub fn activate_overflow(&mut self, content: OverflowContent) {
        if content.is_empty() {
            return;
        }
        self.ui.overflow.open(content);
    }

    pub fn close_overflow(&mut self) -> bool {
        self.ui.overflow.close()
    }

    /// Drop the transcript and return to the landing screen.
    pub fn clear(&mut self) {
        self.cancel_pending();
        self.ui.messages.clear();
        self.ui.overflow.close();
        self.ui.focus = None;
        self.ui.scroll_offset = 0;
        self.ui.auto_scroll = true;
        self.ui.screen = Screen::Landing;
    }
}
