//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod say;
pub mod settings;

use std::error::Error;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use crate::cli::say::run_say;
use crate::core::config::{ChatMode, Config};
use crate::ui::chat_loop::run_chat;

const LOG_FILTER_ENV: &str = "OUTFITMATCH_LOG";
const LOG_FILE_ENV: &str = "OUTFITMATCH_LOG_FILE";

#[derive(Parser)]
#[command(name = "outfitmatch")]
#[command(about = "A terminal chat that finds outfits and fashion pieces")]
#[command(
    long_about = "OutfitMatch is a full-screen terminal chat for an outfit recommendation \
assistant. Describe what you are looking for, optionally attach a photo, and the \
assistant answers with product cards and social posts.\n\n\
Configuration:\n\
  The config file lives in the platform config directory (config.toml).\n\
  mode = \"mock\" answers from a built-in catalog without any network access.\n\n\
Environment Variables:\n\
  OUTFITMATCH_LOG       Diagnostic log filter (default: warn)\n\
  OUTFITMATCH_LOG_FILE  Write diagnostic logs from the chat screen to this file\n\n\
Controls:\n\
  Enter             Send the message, or press the focused button\n\
  Alt+Enter         Insert a newline\n\
  Tab/Shift+Tab     Move between product buttons\n\
  PageUp/PageDown   Scroll through the conversation\n\
  Esc               Cancel the pending reply or close the panel\n\
  Ctrl+C            Quit the application\n\n\
Commands:\n\
  /help             List commands\n\
  /image <path>     Attach a photo to the next message\n\
  /mode mock|api    Switch the reply source\n\
  /log <filename>   Enable logging to specified file\n\
  /log              Toggle logging pause/resume"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Answer from the built-in catalog instead of the search service
    #[arg(long, global = true, conflicts_with = "api")]
    pub mock: bool,

    /// Answer from the search service
    #[arg(long, global = true)]
    pub api: bool,

    /// Base URL of the search service
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Enable logging to specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send one message and print the reply without opening the chat screen
    Say {
        /// Message text
        prompt: Vec<String>,
        /// Photo to attach to the message
        #[arg(long, value_name = "PATH")]
        image: Option<PathBuf>,
    },
    /// Show the current configuration
    Config,
    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key
        value: String,
    },
    /// Reset a configuration value to its default
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

impl Args {
    /// Fold command-line overrides into the loaded config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if self.mock {
            config.mode = Some(ChatMode::Mock);
        } else if self.api {
            config.mode = Some(ChatMode::Api);
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = Some(base_url.clone());
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let mut config = Config::load()?;
    args.apply_overrides(&mut config);

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            init_file_logging()?;
            run_chat(config, args.log).await
        }
        Commands::Say { prompt, image } => {
            init_stderr_logging();
            run_say(config, prompt, image, args.log).await
        }
        Commands::Config => {
            config.print_all();
            Ok(())
        }
        Commands::Set { key, value } => {
            let mut stored = Config::load()?;
            println!("{}", settings::set_value(&mut stored, &key, &value)?);
            stored.save()?;
            Ok(())
        }
        Commands::Unset { key } => {
            let mut stored = Config::load()?;
            println!("{}", settings::unset_value(&mut stored, &key)?);
            stored.save()?;
            Ok(())
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn init_stderr_logging() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(env_filter())
        .try_init();
}

/// The chat screen owns the terminal, so diagnostics only go to a file.
fn init_file_logging() -> Result<(), Box<dyn Error>> {
    let Some(path) = std::env::var_os(LOG_FILE_ENV) else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(env_filter())
        .try_init();
    Ok(())
}
