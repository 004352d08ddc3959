use std::time::Duration;

use crate::core::config::data::{ChatMode, Config};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_HEALTH_PATH: &str = "/api/health";
pub const DEFAULT_SEARCH_PATH: &str = "/api/search";
pub const DEFAULT_MOCK_DELAY_MS: u64 = 1000;
/// 15 MiB of decoded image bytes.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 15 * 1024 * 1024;

impl Config {
    pub fn mode(&self) -> ChatMode {
        self.mode.unwrap_or_default()
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn health_path(&self) -> &str {
        self.health_path.as_deref().unwrap_or(DEFAULT_HEALTH_PATH)
    }

    pub fn search_path(&self) -> &str {
        self.search_path.as_deref().unwrap_or(DEFAULT_SEARCH_PATH)
    }

    pub fn mock_delay(&self) -> Duration {
        Duration::from_millis(self.mock_delay_ms.unwrap_or(DEFAULT_MOCK_DELAY_MS))
    }

    pub fn max_image_bytes(&self) -> usize {
        self.max_image_bytes.unwrap_or(DEFAULT_MAX_IMAGE_BYTES)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        println!("  mode: {}", self.mode());
        println!("  base-url: {}", self.base_url());
        println!("  health-path: {}", self.health_path());
        println!("  search-path: {}", self.search_path());
        println!("  mock-delay-ms: {}", self.mock_delay().as_millis());
        println!("  max-image-bytes: {}", self.max_image_bytes());
        match self.request_timeout() {
            Some(timeout) => println!("  request-timeout-secs: {}", timeout.as_secs()),
            None => println!("  request-timeout-secs: (none)"),
        }
    }
}
