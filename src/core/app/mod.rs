use std::error::Error;
use std::sync::Arc;

use ratatui::layout::Rect;

use crate::core::config::Config;
use crate::core::responder::{build_responder, Responder};
use crate::ui::layout::LayoutEngine;
use crate::ui::renderer::screen_areas;
use crate::ui::theme::Theme;
use crate::utils::logging::LoggingState;
use crate::utils::scroll::ScrollCalculator;

pub mod actions;
pub mod conversation;
pub mod overflow;
pub mod session;
pub mod ui_state;

pub use actions::{
    apply_actions, AppAction, AppActionContext, AppActionDispatcher, AppActionEnvelope, AppCommand,
};
pub use conversation::{ConversationController, SendTicket};
pub use overflow::{OverflowContent, OverflowPanel};
pub use session::{RequestState, SessionContext};
pub use ui_state::{FocusTarget, Notification, NotificationKind, Screen, UiState};

pub struct App {
    pub session: SessionContext,
    pub ui: UiState,
}

impl App {
    /// Build an app with the responder selected by `config`.
    pub fn new(config: Config, log_file: Option<String>) -> Result<App, Box<dyn Error>> {
        let responder = build_responder(&config)?;
        let logging = LoggingState::new(log_file)?;
        Ok(Self::from_parts(config, responder, logging))
    }

    pub fn from_parts(
        config: Config,
        responder: Arc<dyn Responder>,
        logging: LoggingState,
    ) -> App {
        App {
            session: SessionContext::new(config, responder, logging),
            ui: UiState::new(Theme::default_dark()),
        }
    }

    /// Returns a controller for conversation operations.
    ///
    /// The controller owns sending, reply completion, cancellation and the
    /// overflow panel.
    pub fn conversation(&mut self) -> ConversationController<'_> {
        ConversationController::new(&mut self.session, &mut self.ui)
    }

    fn transcript_area(&self, ctx: AppActionContext) -> Rect {
        screen_areas(Rect::new(0, 0, ctx.term_width, ctx.term_height), self).transcript
    }

    pub fn transcript_height(&self, ctx: AppActionContext) -> u16 {
        self.transcript_area(ctx).height
    }

    pub fn max_scroll_offset(&self, ctx: AppActionContext) -> u16 {
        let area = self.transcript_area(ctx);
        let layout =
            LayoutEngine::layout_messages(&self.ui.messages, &self.ui.theme, area.width, None);
        ScrollCalculator::max_scroll_offset(layout.lines.len(), area.height)
    }

    /// Transcript line holding the focused element, if any.
    pub fn focus_line(&self, ctx: AppActionContext) -> Option<usize> {
        let focus = self.ui.focus?;
        let area = self.transcript_area(ctx);
        LayoutEngine::layout_messages(&self.ui.messages, &self.ui.theme, area.width, Some(focus))
            .focus_line
    }
}

#[cfg(test)]
mod tests;
