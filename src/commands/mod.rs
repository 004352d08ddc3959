mod registry;

pub use registry::{all_commands, matching_commands, CommandInvocation};

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

use crate::core::app::App;
use crate::core::config::ChatMode;
use crate::utils::logging::dump_conversation;

pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
    AttachImage(PathBuf),
    Quit,
}

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return CommandResult::ProcessAsMessage(input.to_string());
    }

    let mut parts = trimmed[1..].splitn(2, char::is_whitespace);
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    if let Some(command) = registry::find_command(command_name) {
        let invocation = CommandInvocation { args };
        (command.handler)(app, invocation)
    } else {
        CommandResult::ProcessAsMessage(input.to_string())
    }
}

pub(super) fn handle_help(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let commands: Vec<&registry::Command> = if invocation.args.is_empty() {
        all_commands().iter().collect()
    } else {
        matching_commands(invocation.args)
    };
    let usage: Vec<String> = commands
        .iter()
        .flat_map(|command| command.usages.iter())
        .map(|usage| {
            format!(
                "{}: {}",
                usage.syntax,
                usage.description.trim_end_matches('.')
            )
        })
        .collect();
    if usage.is_empty() {
        app.ui
            .notify_error(format!("No command matches {}", invocation.args));
    } else {
        app.ui.notify_info(format!("Commands: {}", usage.join(" • ")));
    }
    CommandResult::Continue
}

pub(super) fn handle_image(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        if app.session.clear_attachment() {
            app.ui.notify_info("Attachment removed");
        } else {
            app.ui.notify_info("No image attached");
        }
        return CommandResult::Continue;
    }
    CommandResult::AttachImage(expand_home(invocation.args))
}

pub(super) fn handle_mode(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        app.ui
            .notify_info(format!("Mode: {} (use /mode mock|api)", app.session.mode()));
        return CommandResult::Continue;
    }
    let mode: ChatMode = match invocation.args.parse() {
        Ok(mode) => mode,
        Err(err) => {
            app.ui.notify_error(err);
            return CommandResult::Continue;
        }
    };
    match app.session.set_mode(mode) {
        Ok(()) => {
            info!(%mode, "mode switched");
            app.ui.notify_info(format!("Switched to {mode} mode"));
        }
        Err(err) => app.ui.notify_error(format!("Could not switch mode: {err}")),
    }
    CommandResult::Continue
}

pub(super) fn handle_log(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let result = if invocation.args.is_empty() {
        app.session.logging.toggle_logging()
    } else {
        app.session
            .logging
            .set_log_file(invocation.args.to_string())
    };
    match result {
        Ok(message) => app.ui.notify_info(message),
        Err(e) => app.ui.notify_error(format!("Log error: {e}")),
    }
    CommandResult::Continue
}

pub(super) fn handle_dump(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let filename = if invocation.args.is_empty() {
        format!("outfitmatch-{}.txt", Utc::now().format("%Y-%m-%d"))
    } else {
        invocation.args.to_string()
    };

    if app.ui.messages.is_empty() {
        app.ui.notify_info("Nothing to dump yet");
        return CommandResult::Continue;
    }

    match dump_conversation(&app.ui.messages, Path::new(&filename)) {
        Ok(count) => app
            .ui
            .notify_info(format!("Dumped {count} messages to {filename}")),
        Err(e) => app.ui.notify_error(format!("Dump failed: {e}")),
    }
    CommandResult::Continue
}

pub(super) fn handle_clear(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.conversation().clear();
    app.ui.notify_info("Conversation cleared");
    CommandResult::Continue
}

pub(super) fn handle_quit(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Quit
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(dirs) = directories::BaseDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(path)
}
