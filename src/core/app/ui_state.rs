use std::time::{Duration, Instant};

use ratatui::prelude::Size;
use tui_textarea::TextArea;

use super::overflow::OverflowPanel;
use crate::core::message::Message;
use crate::ui::sections::{render_sections, OverflowKind, ProductAction, RenderBlock};
use crate::ui::theme::Theme;

/// How long a toast stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Landing,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

/// Non-blocking toast shown above the input box.
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at) >= NOTIFICATION_TTL
    }
}

/// An interactive element inside the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    ProductAction {
        message: usize,
        product: usize,
        action: ProductAction,
    },
    Overflow {
        message: usize,
        kind: OverflowKind,
    },
}

/// Every focusable element in transcript order.
pub fn focus_targets(messages: &[Message]) -> Vec<FocusTarget> {
    let mut targets = Vec::new();
    for (index, message) in messages.iter().enumerate() {
        if !message.is_assistant() {
            continue;
        }
        for block in render_sections(message) {
            match block {
                RenderBlock::Products {
                    items,
                    actions: true,
                } => {
                    for product in 0..items.len() {
                        for action in ProductAction::ALL {
                            targets.push(FocusTarget::ProductAction {
                                message: index,
                                product,
                                action,
                            });
                        }
                    }
                }
                RenderBlock::Overflow { kind, .. } => targets.push(FocusTarget::Overflow {
                    message: index,
                    kind,
                }),
                _ => {}
            }
        }
    }
    targets
}

pub struct UiState {
    pub screen: Screen,
    pub messages: Vec<Message>,
    pub textarea: TextArea<'static>,
    pub overflow: OverflowPanel,
    pub notification: Option<Notification>,
    pub focus: Option<FocusTarget>,
    pub theme: Theme,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    pub exit_requested: bool,
    pub last_term_size: Size,
    pub pulse_start: Instant,
}

impl UiState {
    pub fn new(theme: Theme) -> Self {
        Self {
            screen: Screen::Landing,
            messages: Vec::new(),
            textarea: TextArea::default(),
            overflow: OverflowPanel::Closed,
            notification: None,
            focus: None,
            theme,
            scroll_offset: 0,
            auto_scroll: true,
            exit_requested: false,
            last_term_size: Size::default(),
            pulse_start: Instant::now(),
        }
    }

    pub fn get_input_text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn set_input_text(&mut self, text: &str) {
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        self.textarea = TextArea::new(lines);
        self.textarea.move_cursor(tui_textarea::CursorMove::Bottom);
        self.textarea.move_cursor(tui_textarea::CursorMove::End);
    }

    pub fn clear_input(&mut self) {
        self.textarea = TextArea::default();
    }

    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.notification = Some(Notification {
            kind,
            message: message.into(),
            created_at: Instant::now(),
        });
    }

    pub fn notify_info(&mut self, message: impl Into<String>) {
        self.notify(NotificationKind::Info, message);
    }

    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.notify(NotificationKind::Error, message);
    }

    /// Drop an expired toast. Returns true when something changed.
    pub fn expire_notification(&mut self, now: Instant) -> bool {
        if self
            .notification
            .as_ref()
            .is_some_and(|notification| notification.is_expired(now))
        {
            self.notification = None;
            return true;
        }
        false
    }

    pub fn focus_next(&mut self) {
        self.step_focus(1);
    }

    pub fn focus_previous(&mut self) {
        self.step_focus(-1);
    }

    fn step_focus(&mut self, delta: isize) {
        let targets = focus_targets(&self.messages);
        if targets.is_empty() {
            self.focus = None;
            return;
        }
        let len = targets.len() as isize;
        let next = match self.focus.and_then(|f| targets.iter().position(|t| *t == f)) {
            Some(current) => (current as isize + delta).rem_euclid(len),
            // Start from the newest element going backwards, oldest going forwards.
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.focus = Some(targets[next as usize]);
        self.auto_scroll = false;
    }

    pub fn clear_focus(&mut self) -> bool {
        self.focus.take().is_some()
    }

    pub fn scroll_to_bottom(&mut self) {
        self.auto_scroll = true;
    }
}
