//! Terminal UI layer for interactive chat sessions.
//!
//! - [`sections`] turns a message into ordered render blocks.
//! - [`layout`] and [`renderer`] turn those blocks into terminal lines and frames.
//! - [`chat_loop`] owns the terminal and feeds key events to [`crate::core::app`].

pub mod chat_loop;
pub mod layout;
pub mod renderer;
pub mod sections;
pub mod theme;
