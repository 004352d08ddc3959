pub mod data;
pub mod defaults;
pub mod io;

pub use data::{ChatMode, Config};
pub use io::ConfigError;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn missing_config_file_yields_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("nonexistent_config.toml");

        let config = Config::load_from_path(&config_path).expect("Failed to load config");

        assert_eq!(config, Config::default());
        assert_eq!(config.mode(), ChatMode::Api);
        assert_eq!(config.base_url(), "http://localhost:8000");
        assert_eq!(config.search_path(), "/api/search");
        assert_eq!(config.max_image_bytes(), 15 * 1024 * 1024);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn config_round_trips_through_disk() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let config = Config {
            mode: Some(ChatMode::Mock),
            base_url: Some("http://search.internal:9000".to_string()),
            mock_delay_ms: Some(5),
            request_timeout_secs: Some(30),
            ..Default::default()
        };
        config.save_to_path(&config_path).expect("save failed");

        let loaded = Config::load_from_path(&config_path).expect("load failed");
        assert_eq!(loaded, config);
        assert_eq!(loaded.mock_delay(), Duration::from_millis(5));
        assert_eq!(loaded.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn invalid_toml_reports_parse_error_with_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "mode = [").expect("write failed");

        let err = Config::load_from_path(&config_path).expect_err("expected parse failure");
        assert!(matches!(err, ConfigError::Malformed { .. }));
        let message = err.to_string();
        assert!(message.starts_with("Settings file "));
        assert!(message.contains("config.toml is not valid TOML"));
    }

    #[test]
    fn directory_in_place_of_file_is_unreadable() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let err = Config::load_from_path(temp_dir.path()).expect_err("expected read failure");
        assert!(matches!(err, ConfigError::Unreadable { .. }));
        assert!(err.to_string().starts_with("Could not read settings file "));
    }

    #[test]
    fn save_into_a_file_path_parent_is_unwritable() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "").expect("write failed");

        let err = Config::default()
            .save_to_path(&blocker.join("config.toml"))
            .expect_err("expected write failure");
        assert!(matches!(err, ConfigError::Unwritable { .. }));
        assert!(err.to_string().starts_with("Could not save settings to "));
    }

    #[test]
    fn unknown_mode_string_is_rejected() {
        assert_eq!("MOCK".parse::<ChatMode>(), Ok(ChatMode::Mock));
        assert!("offline".parse::<ChatMode>().is_err());
    }
}
