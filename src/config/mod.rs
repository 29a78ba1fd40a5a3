//! Configuration management
//!
//! Settings live in `~/.stepbase/config.yaml` (or `$STEPBASE_HOME/config.yaml`).
//! A missing file means defaults; unknown fields in the file are ignored.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::permission::{Capability, PermissionGate, PermissionStatus};
use crate::sensor::SensorDelay;
use crate::storage::db::data_dir;

/// Keys accepted by [`Config::get`] and [`Config::set`].
pub const CONFIG_KEYS: &[&str] = &[
    "sensor_delay",
    "runtime_permission_required",
    "permission_granted",
];

/// Errors from loading, saving or editing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The data directory could not be determined.
    #[error("Could not find home directory")]
    NoHomeDir,

    /// Reading or writing the file failed.
    #[error("Failed to access {path}: {source}")]
    Io {
        /// File that was being accessed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid YAML for [`Config`].
    #[error("Failed to parse {path}: {message}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// Serializing the config failed.
    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    /// The key is not a known setting.
    #[error("Unknown config key '{0}'")]
    UnknownKey(String),

    /// The value does not fit the key's type.
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue {
        /// Key being set.
        key: String,
        /// What was wrong.
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Requested step-counter delivery rate
    pub sensor_delay: SensorDelay,

    /// Whether activity recognition must be granted at runtime
    pub runtime_permission_required: bool,

    /// Whether the user has granted activity recognition
    pub permission_granted: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sensor_delay: SensorDelay::Normal,
            runtime_permission_required: true,
            permission_granted: false,
        }
    }
}

impl Config {
    /// Loads from the default path, falling back to defaults if absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads from `path`, falling back to defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_saphyr::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Saves to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves to `path`, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content =
            serde_saphyr::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|_| ConfigError::NoHomeDir)?;
        Ok(dir.join("config.yaml"))
    }

    /// Reads a setting as a display string.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            "sensor_delay" => Ok(self.sensor_delay.to_string()),
            "runtime_permission_required" => Ok(self.runtime_permission_required.to_string()),
            "permission_granted" => Ok(self.permission_granted.to_string()),
            _ => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }

    /// Parses `value` and stores it under `key`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "sensor_delay" => {
                self.sensor_delay =
                    value
                        .parse::<SensorDelay>()
                        .map_err(|message| ConfigError::InvalidValue {
                            key: key.to_string(),
                            message,
                        })?;
            }
            "runtime_permission_required" => {
                self.runtime_permission_required = parse_bool(key, value)?;
            }
            "permission_granted" => {
                self.permission_granted = parse_bool(key, value)?;
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected true or false, got '{value}'"),
        }),
    }
}

/// Permission answers taken from configuration.
///
/// There is no dialog to show, so `request` reports the configured grant.
impl PermissionGate for Config {
    fn has_permission(&self, _capability: Capability) -> bool {
        self.permission_granted
    }

    fn requires_runtime_grant(&self, _capability: Capability) -> bool {
        self.runtime_permission_required
    }

    async fn request(&self, _capability: Capability) -> PermissionStatus {
        if self.permission_granted {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }
}
