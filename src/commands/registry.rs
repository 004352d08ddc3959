use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct CommandUsage {
    pub syntax: &'static str,
    pub description: &'static str,
}

pub struct Command {
    pub name: &'static str,
    pub usages: &'static [CommandUsage],
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

/// Commands whose name starts with `prefix`, for the help line.
pub fn matching_commands(prefix: &str) -> Vec<&'static Command> {
    let prefix = prefix.trim_start_matches('/').to_ascii_lowercase();
    all_commands()
        .iter()
        .filter(|command| command.name.starts_with(&prefix))
        .collect()
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usages: &[CommandUsage {
            syntax: "/help",
            description: "List available commands.",
        }],
        handler: super::handle_help,
    },
    Command {
        name: "image",
        usages: &[
            CommandUsage {
                syntax: "/image <path>",
                description: "Attach a photo to the next message.",
            },
            CommandUsage {
                syntax: "/image",
                description: "Remove the pending photo.",
            },
        ],
        handler: super::handle_image,
    },
    Command {
        name: "mode",
        usages: &[CommandUsage {
            syntax: "/mode <mock|api>",
            description: "Switch between canned replies and the search service.",
        }],
        handler: super::handle_mode,
    },
    Command {
        name: "log",
        usages: &[
            CommandUsage {
                syntax: "/log <file>",
                description: "Append the transcript to a file.",
            },
            CommandUsage {
                syntax: "/log",
                description: "Pause or resume transcript logging.",
            },
        ],
        handler: super::handle_log,
    },
    Command {
        name: "dump",
        usages: &[CommandUsage {
            syntax: "/dump [file]",
            description: "Write the whole conversation to a file.",
        }],
        handler: super::handle_dump,
    },
    Command {
        name: "clear",
        usages: &[CommandUsage {
            syntax: "/clear",
            description: "Start over from the welcome screen.",
        }],
        handler: super::handle_clear,
    },
    Command {
        name: "quit",
        usages: &[CommandUsage {
            syntax: "/quit",
            description: "Leave OutfitMatch.",
        }],
        handler: super::handle_quit,
    },
];
