//! Thread-safe configuration storage.
//!
//! A single config snapshot shared between the API client, the hub listener
//! and the CLI. Services take a `ConfigStore` instead of reading globals.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::loader::ConfigError;
use crate::config::types::Config;

/// Thread-safe config container with interior mutability.
#[derive(Clone)]
pub struct ConfigStore {
    inner: Arc<RwLock<Config>>,
    path: PathBuf,
}

impl ConfigStore {
    /// Create a new ConfigStore from initial config and path.
    pub fn new(config: Config, path: PathBuf) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
            path,
        }
    }

    /// Load the config at `path` and wrap it.
    pub fn open(path: PathBuf) -> Result<Self, ConfigError> {
        let config = Config::load_from(&path)?;
        Ok(Self::new(config, path))
    }

    /// Get a clone of the current config.
    pub fn get(&self) -> Config {
        self.inner.read().clone()
    }

    /// Reload config from the file.
    ///
    /// On failure, keeps the old config and returns the error.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let config = Config::load_from(&self.path)?;
        *self.inner.write() = config;
        Ok(())
    }

    /// Get the config file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_keeps_old_config_on_parse_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"https://one.example.org\"\n").unwrap();

        let store = ConfigStore::open(path.clone()).unwrap();
        assert_eq!(store.get().api.base_url, "https://one.example.org");

        std::fs::write(&path, "[api\nbroken").unwrap();
        assert!(store.reload().is_err());
        assert_eq!(store.get().api.base_url, "https://one.example.org");
    }

    #[test]
    fn reload_picks_up_changes() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nbase_url = \"https://one.example.org\"\n").unwrap();
        let store = ConfigStore::open(path.clone()).unwrap();

        std::fs::write(&path, "[api]\nbase_url = \"https://two.example.org\"\n").unwrap();
        store.reload().unwrap();
        assert_eq!(store.get().api.base_url, "https://two.example.org");
        assert_eq!(store.path(), path.as_path());
    }
}
