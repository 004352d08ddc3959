mod input;
mod navigation;
mod request;

use std::path::PathBuf;

use tokio::sync::mpsc;

use super::conversation::SendTicket;
use super::App;
use crate::core::attachment::{AttachmentError, ImageAttachment};
use crate::core::error::ChatError;
use crate::core::message::Message;

#[derive(Debug)]
pub enum AppAction {
    ProcessCommand {
        input: String,
    },
    ClearInput,
    InsertIntoInput {
        text: String,
    },
    ClearNotification,
    ResponseReady {
        request_id: u64,
        result: Result<Message, ChatError>,
    },
    CancelRequest,
    AttachImage {
        path: PathBuf,
    },
    ImageLoaded {
        generation: u64,
        result: Result<ImageAttachment, AttachmentError>,
    },
    ClearAttachment,
    FocusNext,
    FocusPrevious,
    ClearFocus,
    ActivateFocus,
    OverflowMove {
        delta: isize,
    },
    OverflowMatchSelected,
    OverflowSimilarSelected,
    CloseOverflow,
    ScrollLines {
        delta: i32,
    },
    ScrollPage {
        up: bool,
    },
    ScrollToBottom,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AppActionContext {
    pub term_width: u16,
    pub term_height: u16,
}

pub struct AppActionEnvelope {
    pub action: AppAction,
    pub context: AppActionContext,
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppActionEnvelope>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppActionEnvelope>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction, ctx: AppActionContext) {
        self.dispatch_many([action], ctx);
    }

    pub fn dispatch_many<I>(&self, actions: I, ctx: AppActionContext)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions.into_iter() {
            let _ = self.tx.send(AppActionEnvelope {
                action,
                context: ctx,
            });
        }
    }
}

/// Side effects the event loop runs outside the app lock.
pub enum AppCommand {
    Respond(SendTicket),
    LoadImage { path: PathBuf, generation: u64 },
    Quit,
}

pub fn apply_actions(
    app: &mut App,
    envelopes: impl IntoIterator<Item = AppActionEnvelope>,
) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for envelope in envelopes {
        if let Some(cmd) = apply_action(app, envelope.action, envelope.context) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction, ctx: AppActionContext) -> Option<AppCommand> {
    match action {
        AppAction::ProcessCommand { .. }
        | AppAction::ClearInput
        | AppAction::InsertIntoInput { .. }
        | AppAction::ClearNotification => input::handle_input_action(app, action, ctx),

        AppAction::ResponseReady { .. }
        | AppAction::CancelRequest
        | AppAction::AttachImage { .. }
        | AppAction::ImageLoaded { .. }
        | AppAction::ClearAttachment => request::handle_request_action(app, action, ctx),

        AppAction::FocusNext
        | AppAction::FocusPrevious
        | AppAction::ClearFocus
        | AppAction::ActivateFocus
        | AppAction::OverflowMove { .. }
        | AppAction::OverflowMatchSelected
        | AppAction::OverflowSimilarSelected
        | AppAction::CloseOverflow
        | AppAction::ScrollLines { .. }
        | AppAction::ScrollPage { .. }
        | AppAction::ScrollToBottom => navigation::handle_navigation_action(app, action, ctx),
    }
}

/// Turn the outcome of a send into a command, surfacing refusals as toasts.
fn ticket_to_command(
    app: &mut App,
    outcome: Result<SendTicket, crate::core::error::SendError>,
) -> Option<AppCommand> {
    use crate::core::error::SendError;

    match outcome {
        Ok(ticket) => Some(AppCommand::Respond(ticket)),
        Err(SendError::Empty) => None,
        Err(err @ SendError::Busy) => {
            app.ui.notify_info(err.to_string());
            None
        }
    }
}
