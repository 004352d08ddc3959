use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::core::attachment::ImageAttachment;
use crate::core::config::{ChatMode, Config};
use crate::core::responder::{build_responder, Responder};
use crate::utils::logging::LoggingState;

/// Whether a reply is outstanding.
///
/// Sends are only accepted in `Idle`; a send moves to `AwaitingResponse`
/// and the matching completion (or a cancel) moves back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    AwaitingResponse {
        request_id: u64,
    },
}

impl RequestState {
    pub fn is_pending(self) -> bool {
        matches!(self, RequestState::AwaitingResponse { .. })
    }
}

pub struct SessionContext {
    pub config: Config,
    pub responder: Arc<dyn Responder>,
    pub logging: LoggingState,
    pub request: RequestState,
    pub next_request_id: u64,
    pub cancel_token: Option<CancellationToken>,
    pub pending_image: Option<ImageAttachment>,
    /// Bumped on every attach/clear so late file reads can be discarded.
    pub attach_generation: u64,
}

impl SessionContext {
    pub fn new(
        config: Config,
        responder: Arc<dyn Responder>,
        logging: LoggingState,
    ) -> Self {
        Self {
            config,
            responder,
            logging,
            request: RequestState::Idle,
            next_request_id: 0,
            cancel_token: None,
            pending_image: None,
            attach_generation: 0,
        }
    }

    pub fn mode(&self) -> ChatMode {
        self.responder.mode()
    }

    /// Switch reply source; takes effect for the next send.
    pub fn set_mode(&mut self, mode: ChatMode) -> Result<(), reqwest::Error> {
        let mut config = self.config.clone();
        config.mode = Some(mode);
        self.responder = build_responder(&config)?;
        self.config = config;
        Ok(())
    }

    pub fn begin_attach(&mut self) -> u64 {
        self.attach_generation += 1;
        self.attach_generation
    }

    /// Store a finished attachment unless a newer attach or clear happened.
    pub fn complete_attach(&mut self, generation: u64, image: ImageAttachment) -> bool {
        if generation != self.attach_generation {
            return false;
        }
        self.pending_image = Some(image);
        true
    }

    pub fn clear_attachment(&mut self) -> bool {
        self.attach_generation += 1;
        self.pending_image.take().is_some()
    }
}
