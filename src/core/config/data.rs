use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Where assistant replies come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Canned replies generated locally after a short delay.
    Mock,
    /// Replies from the search service.
    #[default]
    Api,
}

impl ChatMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatMode::Mock => "mock",
            ChatMode::Api => "api",
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(ChatMode::Mock),
            "api" | "remote" => Ok(ChatMode::Api),
            other => Err(format!("unknown chat mode: {other} (expected mock or api)")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Reply source, "mock" or "api"
    pub mode: Option<ChatMode>,
    /// Base URL of the search service, e.g. "http://localhost:8000"
    pub base_url: Option<String>,
    pub health_path: Option<String>,
    pub search_path: Option<String>,
    /// Delay before a mock reply is delivered
    pub mock_delay_ms: Option<u64>,
    /// Largest decoded image accepted in api mode
    pub max_image_bytes: Option<usize>,
    /// Per-request timeout for the search service; unset means wait forever
    pub request_timeout_secs: Option<u64>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
