//! Configuration loading, storage and credentials.

mod auth;
mod credentials;
mod loader;
mod store;
mod types;

pub use auth::{build_auth_header, AuthHeader};
pub use credentials::{
    resolve_token, CredentialStatus, SecureString, TokenSource, TokenStore, TokenStoreError,
    TOKEN_ENV_VAR,
};
pub use loader::{config_dir, ConfigError};
pub use store::ConfigStore;
pub use types::{ApiConfig, Config, HubConfig, InventoryConfig, LoggingConfig};
