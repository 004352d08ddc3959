use std::error::Error as StdError;
use std::fmt;

/// Failures of a respond cycle. All of them are reported to the user as a
/// notification and leave the conversation usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// The outgoing request was rejected locally (e.g. an oversized image).
    Validation(String),

    /// The search service could not be reached or failed its health check.
    Connectivity(String),

    /// The search service answered with a failure status or error payload.
    Server(String),
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Validation(message) => write!(f, "Invalid request: {message}"),
            ChatError::Connectivity(message) => write!(f, "Cannot reach server: {message}"),
            ChatError::Server(message) => write!(f, "Server error: {message}"),
        }
    }
}

impl StdError for ChatError {}

/// Reasons a send request is refused before anything is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    /// No text and no image.
    Empty,

    /// A response is still outstanding.
    Busy,
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::Empty => write!(f, "Type a message or attach an image first"),
            SendError::Busy => write!(f, "Still waiting for the previous reply"),
        }
    }
}

impl StdError for SendError {}
