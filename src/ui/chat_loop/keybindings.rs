//! Key → action routing.
//!
//! The mapping is pure over a [`KeyContext`] snapshot so it can be tested
//! without a terminal.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::app::{App, AppAction};

/// What the router needs to know about the app.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyContext {
    pub overflow_open: bool,
    pub pending: bool,
    pub focused: bool,
    pub input_empty: bool,
}

impl KeyContext {
    pub fn from_app(app: &App) -> Self {
        Self {
            overflow_open: app.ui.overflow.is_open(),
            pending: app.session.request.is_pending(),
            focused: app.ui.focus.is_some(),
            input_empty: app.ui.textarea.is_empty(),
        }
    }
}

#[derive(Debug, Default)]
pub struct KeyResult {
    pub actions: Vec<AppAction>,
    /// Hand the key to the text area after the actions run.
    pub forward_to_input: bool,
    pub exit: bool,
}

impl KeyResult {
    fn actions(actions: impl IntoIterator<Item = AppAction>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
            ..Default::default()
        }
    }

    fn forward() -> Self {
        Self {
            forward_to_input: true,
            ..Default::default()
        }
    }

    fn exit() -> Self {
        Self {
            exit: true,
            ..Default::default()
        }
    }

    fn ignored() -> Self {
        Self::default()
    }
}

pub fn route_key(ctx: KeyContext, key: KeyEvent, input: &str) -> KeyResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('c')) {
        return KeyResult::exit();
    }

    if ctx.overflow_open {
        return route_panel_key(key);
    }

    match key.code {
        KeyCode::Esc if ctx.pending => KeyResult::actions([AppAction::CancelRequest]),
        KeyCode::Esc if ctx.focused => KeyResult::actions([AppAction::ClearFocus]),
        KeyCode::Esc => KeyResult::ignored(),
        KeyCode::Tab => KeyResult::actions([AppAction::FocusNext]),
        KeyCode::BackTab => KeyResult::actions([AppAction::FocusPrevious]),
        KeyCode::Enter if key.modifiers.intersects(KeyModifiers::ALT | KeyModifiers::SHIFT) => {
            KeyResult::forward()
        }
        KeyCode::Enter if ctx.focused => KeyResult::actions([AppAction::ActivateFocus]),
        KeyCode::Enter => KeyResult::actions([AppAction::ProcessCommand {
            input: input.to_string(),
        }]),
        KeyCode::PageUp => KeyResult::actions([AppAction::ScrollPage { up: true }]),
        KeyCode::PageDown => KeyResult::actions([AppAction::ScrollPage { up: false }]),
        KeyCode::End if ctrl => KeyResult::actions([AppAction::ScrollToBottom]),
        KeyCode::Up if ctrl || ctx.input_empty => {
            KeyResult::actions([AppAction::ScrollLines { delta: -1 }])
        }
        KeyCode::Down if ctrl || ctx.input_empty => {
            KeyResult::actions([AppAction::ScrollLines { delta: 1 }])
        }
        _ if ctx.focused => KeyResult {
            actions: vec![AppAction::ClearFocus],
            forward_to_input: true,
            exit: false,
        },
        _ => KeyResult::forward(),
    }
}

/// The overflow panel is modal: only its own keys do anything.
fn route_panel_key(key: KeyEvent) -> KeyResult {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            KeyResult::actions([AppAction::OverflowMove { delta: -1 }])
        }
        KeyCode::Down | KeyCode::Char('j') => {
            KeyResult::actions([AppAction::OverflowMove { delta: 1 }])
        }
        KeyCode::Char('m') => KeyResult::actions([AppAction::OverflowMatchSelected]),
        KeyCode::Char('s') => KeyResult::actions([AppAction::OverflowSimilarSelected]),
        KeyCode::Esc | KeyCode::Char('q') => KeyResult::actions([AppAction::CloseOverflow]),
        _ => KeyResult::ignored(),
    }
}

/// Strip control characters from pasted text, keeping newlines and tabs.
pub fn sanitize_pasted_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}
