//! Main chat event loop.
//!
//! One task owns the terminal and the [`App`]; key events, responder replies
//! and image loads all arrive as actions on an unbounded channel.

mod executors;
mod keybindings;
mod lifecycle;

use std::{
    error::Error,
    sync::Arc,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::prelude::Size;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use self::executors::{spawn_image_loader, spawn_responder};
use self::keybindings::{route_key, sanitize_pasted_text, KeyContext};
use self::lifecycle::{restore_terminal, setup_terminal, SharedTerminal};
use crate::core::app::{
    apply_actions, App, AppAction, AppActionContext, AppActionDispatcher, AppActionEnvelope,
    AppCommand,
};
use crate::core::config::Config;
use crate::ui::renderer::ui;

#[derive(Debug)]
pub enum UiEvent {
    Crossterm(Event),
}

/// Shared, lock-guarded access to the app.
#[derive(Clone)]
pub struct AppHandle {
    inner: Arc<Mutex<App>>,
}

impl AppHandle {
    pub fn new(app: App) -> Self {
        Self {
            inner: Arc::new(Mutex::new(app)),
        }
    }

    pub async fn read<R>(&self, f: impl FnOnce(&App) -> R) -> R {
        let guard = self.inner.lock().await;
        f(&guard)
    }

    pub async fn update<R>(&self, f: impl FnOnce(&mut App) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }
}

fn context_for(size: Size) -> AppActionContext {
    AppActionContext {
        term_width: size.width,
        term_height: size.height,
    }
}

async fn current_terminal_size(terminal: &SharedTerminal) -> Size {
    let terminal_guard = terminal.lock().await;
    terminal_guard.size().unwrap_or_default()
}

async fn try_draw_frame(
    app: &AppHandle,
    terminal: &SharedTerminal,
    request_redraw: &mut bool,
    last_draw: &mut Instant,
    frame_duration: Duration,
) -> std::io::Result<()> {
    if !*request_redraw {
        return Ok(());
    }

    let now = Instant::now();
    if now.duration_since(*last_draw) < frame_duration {
        return Ok(());
    }

    let mut terminal_guard = terminal.lock().await;
    app.read(|app| terminal_guard.draw(|f| ui(f, app)).map(|_| ()))
        .await?;
    *last_draw = now;
    *request_redraw = false;
    Ok(())
}

struct EventProcessingOutcome {
    events_processed: bool,
    exit_requested: bool,
}

async fn process_ui_events(
    app: &AppHandle,
    event_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    dispatcher: &AppActionDispatcher,
    term_size: Size,
) -> EventProcessingOutcome {
    let mut outcome = EventProcessingOutcome {
        events_processed: false,
        exit_requested: false,
    };

    while let Ok(ev) = event_rx.try_recv() {
        outcome.events_processed = true;
        match ev {
            UiEvent::Crossterm(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if route_keyboard_event(app, dispatcher, key, term_size).await {
                    outcome.exit_requested = true;
                    break;
                }
            }
            UiEvent::Crossterm(Event::Paste(text)) => {
                dispatcher.dispatch(
                    AppAction::InsertIntoInput {
                        text: sanitize_pasted_text(&text),
                    },
                    context_for(term_size),
                );
            }
            UiEvent::Crossterm(_) => {}
        }
    }

    outcome
}

/// Returns true when the key asks to leave the app.
async fn route_keyboard_event(
    app: &AppHandle,
    dispatcher: &AppActionDispatcher,
    key: KeyEvent,
    term_size: Size,
) -> bool {
    let result = app
        .read(|app| route_key(KeyContext::from_app(app), key, &app.ui.get_input_text()))
        .await;

    if result.exit {
        return true;
    }

    // Focus changes must land before the key reaches the text area.
    if !result.actions.is_empty() {
        let envelopes = result.actions.into_iter().map(|action| AppActionEnvelope {
            action,
            context: context_for(term_size),
        });
        let commands = app.update(|app| apply_actions(app, envelopes)).await;
        run_commands(app, dispatcher, commands).await;
    }

    if result.forward_to_input {
        app.update(|app| {
            app.ui.textarea.input(tui_textarea::Input::from(key));
        })
        .await;
    }

    app.read(|app| app.ui.exit_requested).await
}

async fn run_commands(app: &AppHandle, dispatcher: &AppActionDispatcher, commands: Vec<AppCommand>) {
    for cmd in commands {
        match cmd {
            AppCommand::Respond(ticket) => {
                debug!(request_id = ticket.request_id, "spawning responder");
                spawn_responder(dispatcher.clone(), ticket);
            }
            AppCommand::LoadImage { path, generation } => {
                spawn_image_loader(dispatcher.clone(), path, generation);
            }
            AppCommand::Quit => {
                app.update(|app| app.ui.exit_requested = true).await;
            }
        }
    }
}

async fn drain_action_queue(
    app: &AppHandle,
    dispatcher: &AppActionDispatcher,
    action_rx: &mut mpsc::UnboundedReceiver<AppActionEnvelope>,
) -> bool {
    let mut pending = Vec::new();
    while let Ok(envelope) = action_rx.try_recv() {
        pending.push(envelope);
    }

    if pending.is_empty() {
        return false;
    }

    let commands = app.update(|app| apply_actions(app, pending)).await;
    run_commands(app, dispatcher, commands).await;
    true
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => {
                        continue;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

pub async fn run_chat(config: Config, log: Option<String>) -> Result<(), Box<dyn Error>> {
    let app = AppHandle::new(App::new(config, log)?);
    let mode = app.read(|app| app.session.mode()).await;
    info!(%mode, "starting chat");

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppActionEnvelope>();
    let action_dispatcher = AppActionDispatcher::new(action_tx);

    let terminal = setup_terminal()?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    let event_reader_handle = spawn_event_reader(event_tx);

    const MAX_FPS: u64 = 60;
    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;

    let result: Result<(), Box<dyn Error>> = 'main_loop: loop {
        if app.read(|app| app.ui.exit_requested).await {
            break 'main_loop Ok(());
        }

        if let Err(err) = try_draw_frame(
            &app,
            &terminal,
            &mut request_redraw,
            &mut last_draw,
            frame_duration,
        )
        .await
        {
            break 'main_loop Err(err.into());
        }

        let term_size = current_terminal_size(&terminal).await;
        app.update(|app| app.ui.last_term_size = term_size).await;

        let event_outcome =
            process_ui_events(&app, &mut event_rx, &action_dispatcher, term_size).await;
        if event_outcome.exit_requested {
            break 'main_loop Ok(());
        }
        if event_outcome.events_processed {
            request_redraw = true;
        }

        let actions_applied = drain_action_queue(&app, &action_dispatcher, &mut action_rx).await;
        if actions_applied {
            request_redraw = true;
        }

        let (pending, expired) = app
            .update(|app| {
                (
                    app.session.request.is_pending(),
                    app.ui.expire_notification(Instant::now()),
                )
            })
            .await;
        // The pending indicator animates, so keep drawing while waiting.
        if pending || expired {
            request_redraw = true;
        }

        if !event_outcome.events_processed && !actions_applied {
            tokio::time::sleep(frame_duration).await;
        }
    };

    event_reader_handle.abort();
    app.update(|app| {
        app.conversation().cancel_pending();
    })
    .await;
    restore_terminal(&terminal).await?;

    result
}
