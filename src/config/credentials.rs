//! Access-token handling.
//!
//! The token is resolved from (in order) an explicit value, the
//! `HEMOLINK_TOKEN` environment variable, the config file, and finally the
//! token file written by `hemolink login`.

use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

use super::types::Config;

/// Environment variable consulted for the access token.
pub const TOKEN_ENV_VAR: &str = "HEMOLINK_TOKEN";

/// Wrapper for sensitive strings that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
/// Use `expose()` to access the actual value when needed for API calls.
#[derive(Clone, PartialEq, Eq)]
pub struct SecureString(String);

impl SecureString {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Expose the inner value.
    ///
    /// Use sparingly and only when actually sending to the API or hub.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(••••••••)")
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

/// Where a resolved token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Flag,
    Environment,
    ConfigFile,
    TokenFile,
}

/// Status of token resolution.
#[derive(Debug, Clone)]
pub enum CredentialStatus {
    Configured {
        token: SecureString,
        source: TokenSource,
    },
    Anonymous,
}

impl CredentialStatus {
    pub fn token(&self) -> Option<&SecureString> {
        match self {
            CredentialStatus::Configured { token, .. } => Some(token),
            CredentialStatus::Anonymous => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("Failed to access token file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Token persisted between CLI invocations.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Token file next to the config file.
    pub fn default_location() -> Self {
        Self::new(super::loader::config_dir().join("token"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token. Missing or blank files yield `None`.
    pub fn load(&self) -> Result<Option<SecureString>, TokenStoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let mut file = OpenOptions::new()
            .read(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        FileExt::lock_shared(&file).map_err(|e| self.io_error(e))?;
        let mut content = String::new();
        let read = file.read_to_string(&mut content);
        let _ = FileExt::unlock(&file);
        read.map_err(|e| self.io_error(e))?;

        let trimmed = content.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(SecureString::new(trimmed.to_string())))
        }
    }

    /// Store the token, replacing any previous one.
    pub fn save(&self, token: &SecureString) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let mut options = OpenOptions::new();
        options.create(true).write(true).truncate(false);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path).map_err(|e| self.io_error(e))?;

        // `mode` only applies on creation; an older file may be wider.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| self.io_error(e))?;
        }

        FileExt::lock_exclusive(&file).map_err(|e| self.io_error(e))?;
        let result = file
            .set_len(0)
            .and_then(|_| file.write_all(token.expose().as_bytes()))
            .and_then(|_| file.flush());
        let _ = FileExt::unlock(&file);
        result.map_err(|e| self.io_error(e))
    }

    /// Remove the stored token. Removing a missing file is not an error.
    pub fn clear(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Resolve the access token.
///
/// `env_value` is passed in rather than read here so callers (and tests)
/// control the environment explicitly.
pub fn resolve_token(
    flag: Option<&str>,
    env_value: Option<&str>,
    config: &Config,
    store: &TokenStore,
) -> Result<CredentialStatus, TokenStoreError> {
    let non_empty = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(String::from);

    if let Some(token) = non_empty(flag) {
        return Ok(configured(token, TokenSource::Flag));
    }
    if let Some(token) = non_empty(env_value) {
        return Ok(configured(token, TokenSource::Environment));
    }
    if let Some(token) = non_empty(config.api.access_token.as_deref()) {
        return Ok(configured(token, TokenSource::ConfigFile));
    }
    match store.load()? {
        Some(token) => Ok(CredentialStatus::Configured {
            token,
            source: TokenSource::TokenFile,
        }),
        None => Ok(CredentialStatus::Anonymous),
    }
}

fn configured(token: String, source: TokenSource) -> CredentialStatus {
    CredentialStatus::Configured {
        token: SecureString::new(token),
        source,
    }
}
