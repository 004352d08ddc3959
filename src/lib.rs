//! OutfitMatch is a terminal chat client for an outfit recommendation assistant.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the message model, the content splitter, the responders
//!   and the conversation controller that sequences requests.
//! - [`ui`] lays out replies as text, product cards and post grids, and runs
//!   the interactive event loop.
//! - [`commands`] implements slash-command parsing used by the chat loop.
//! - [`api`] defines the search service payloads and client.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
