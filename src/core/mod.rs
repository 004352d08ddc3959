pub mod app;
pub mod attachment;
pub mod config;
pub mod content;
pub mod error;
pub mod message;
pub mod responder;
