use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/hemolink/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from an explicit path.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - API and hub URLs use http or https
    /// - Timeouts are non-zero
    /// - Inventory thresholds are ordered critical <= low <= full
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_http_url("api.base_url", &self.api.base_url)?;
        check_http_url("hub.url", &self.hub.url)?;

        if self.api.request_timeout_seconds == 0 || self.api.connect_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "API timeouts must be greater than zero".to_string(),
            });
        }

        let inv = &self.inventory;
        if inv.critical_units > inv.low_units || inv.low_units > inv.full_units {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Inventory thresholds must satisfy critical ({}) <= low ({}) <= full ({})",
                    inv.critical_units, inv.low_units, inv.full_units
                ),
            });
        }

        if inv.full_units == 0 {
            return Err(ConfigError::ValidationError {
                message: "inventory.full_units must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

/// Directory holding the config file and the token file.
pub fn config_dir() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("hemolink")
}

fn check_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(parsed) => Err(ConfigError::ValidationError {
            message: format!("{} must use http or https, got '{}'", field, parsed.scheme()),
        }),
        Err(e) => Err(ConfigError::ValidationError {
            message: format!("{} is not a valid URL: {}", field, e),
        }),
    }
}
