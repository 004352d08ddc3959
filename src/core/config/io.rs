use crate::core::config::data::{path_display, Config};
use directories::ProjectDirs;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const SETTINGS_FILE: &str = "config.toml";

/// Problems with the settings file. Each carries the path it concerns.
#[derive(Debug)]
pub enum ConfigError {
    /// The platform reports no config directory for this user.
    NoConfigDir,

    Unreadable { path: PathBuf, source: io::Error },

    /// The file exists but does not hold OutfitMatch settings.
    Malformed {
        path: PathBuf,
        source: toml::de::Error,
    },

    Unwritable { path: PathBuf, source: io::Error },

    Serialize(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoConfigDir => {
                write!(f, "No config directory is available, settings cannot be saved")
            }
            ConfigError::Unreadable { path, source } => write!(
                f,
                "Could not read settings file {}: {source}",
                path_display(path)
            ),
            ConfigError::Malformed { path, source } => write!(
                f,
                "Settings file {} is not valid TOML: {source}",
                path_display(path)
            ),
            ConfigError::Unwritable { path, source } => write!(
                f,
                "Could not save settings to {}: {source}",
                path_display(path)
            ),
            ConfigError::Serialize(source) => write!(f, "Could not encode settings: {source}"),
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::NoConfigDir => None,
            ConfigError::Unreadable { source, .. } | ConfigError::Unwritable { source, .. } => {
                Some(source)
            }
            ConfigError::Malformed { source, .. } => Some(source),
            ConfigError::Serialize(source) => Some(source),
        }
    }
}

impl Config {
    /// Settings from the user's config directory. A missing file, or a
    /// platform with no config directory, means built-in defaults.
    pub fn load() -> Result<Config, ConfigError> {
        match Self::get_config_path() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::get_config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to_path(&path)
    }

    pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(source) => {
                return Err(ConfigError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&contents).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the settings next to `path` first, then rename over it, so an
    /// interrupted save leaves the previous file intact.
    pub(crate) fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        let unwritable = |source| ConfigError::Unwritable {
            path: path.to_path_buf(),
            source,
        };

        let dir = path.parent().filter(|dir| !dir.as_os_str().is_empty());
        let mut staged = match dir {
            Some(dir) => {
                fs::create_dir_all(dir).map_err(unwritable)?;
                NamedTempFile::new_in(dir)
            }
            None => NamedTempFile::new(),
        }
        .map_err(unwritable)?;

        staged.write_all(contents.as_bytes()).map_err(unwritable)?;
        staged.as_file_mut().sync_all().map_err(unwritable)?;
        staged.persist(path).map_err(|err| unwritable(err.error))?;
        Ok(())
    }

    pub fn get_config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "outfitmatch", "outfitmatch")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }
}
