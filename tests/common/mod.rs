//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;
pub mod mock_hub;

use std::path::PathBuf;

use hemolink::api::ApiClient;
use hemolink::config::{ApiConfig, SecureString};
use hemolink::session::Session;
use hemolink::wizard::{FieldSpec, StepDefinition};
use tempfile::TempDir;

/// Client against `base_url` with a short timeout.
pub fn api_client(base_url: &str, token: Option<&str>) -> ApiClient {
    let config = ApiConfig {
        base_url: base_url.to_string(),
        request_timeout_seconds: 5,
        connect_timeout_seconds: 2,
        access_token: None,
    };
    let session = match token {
        Some(t) => Session::with_token(SecureString::new(t.to_string())),
        None => Session::anonymous(),
    };
    ApiClient::new(&config, session).expect("valid test client")
}

/// Steps requiring `{a}`, `{b}` and nothing.
pub fn three_step_wizard() -> Vec<StepDefinition> {
    vec![
        StepDefinition::new("first", "First").field(FieldSpec::integer("a", "A").required()),
        StepDefinition::new("second", "Second").field(FieldSpec::text("b", "B").required()),
        StepDefinition::new("done", "Done"),
    ]
}

/// Write `content` as a config file in a fresh temp dir.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).expect("write config");
    (dir, path)
}
