//! `outfitmatch set` / `outfitmatch unset` key handling.

use std::fmt;

use crate::core::config::{ChatMode, Config};
use crate::utils::url::is_http_url;

pub const KEYS: &[&str] = &[
    "mode",
    "base-url",
    "health-path",
    "search-path",
    "mock-delay-ms",
    "max-image-bytes",
    "request-timeout-secs",
];

#[derive(Debug, PartialEq, Eq)]
pub enum SettingError {
    UnknownKey(String),
    InvalidValue { key: &'static str, message: String },
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => write!(
                f,
                "Unknown config key: {key} (expected one of {})",
                KEYS.join(", ")
            ),
            SettingError::InvalidValue { key, message } => {
                write!(f, "Invalid value for {key}: {message}")
            }
        }
    }
}

impl std::error::Error for SettingError {}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, SettingError> {
    value.trim().parse().map_err(|_| SettingError::InvalidValue {
        key,
        message: format!("expected a whole number, got {value}"),
    })
}

/// Store `value` under `key`. Returns the confirmation line to print.
pub fn set_value(config: &mut Config, key: &str, value: &str) -> Result<String, SettingError> {
    match key {
        "mode" => {
            let mode: ChatMode = value
                .parse()
                .map_err(|message| SettingError::InvalidValue {
                    key: "mode",
                    message,
                })?;
            config.mode = Some(mode);
        }
        "base-url" => {
            if !is_http_url(value) {
                return Err(SettingError::InvalidValue {
                    key: "base-url",
                    message: format!("{value} is not an http(s) URL"),
                });
            }
            config.base_url = Some(value.trim().to_string());
        }
        "health-path" => config.health_path = Some(value.trim().to_string()),
        "search-path" => config.search_path = Some(value.trim().to_string()),
        "mock-delay-ms" => config.mock_delay_ms = Some(parse_number("mock-delay-ms", value)?),
        "max-image-bytes" => {
            config.max_image_bytes = Some(parse_number("max-image-bytes", value)?)
        }
        "request-timeout-secs" => {
            config.request_timeout_secs = Some(parse_number("request-timeout-secs", value)?)
        }
        other => return Err(SettingError::UnknownKey(other.to_string())),
    }
    Ok(format!("✅ Set {key} to: {}", value.trim()))
}

/// Reset `key` to its built-in default.
pub fn unset_value(config: &mut Config, key: &str) -> Result<String, SettingError> {
    match key {
        "mode" => config.mode = None,
        "base-url" => config.base_url = None,
        "health-path" => config.health_path = None,
        "search-path" => config.search_path = None,
        "mock-delay-ms" => config.mock_delay_ms = None,
        "max-image-bytes" => config.max_image_bytes = None,
        "request-timeout-secs" => config.request_timeout_secs = None,
        other => return Err(SettingError::UnknownKey(other.to_string())),
    }
    Ok(format!("✅ Unset {key}"))
}
