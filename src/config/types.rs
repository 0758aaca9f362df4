use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub hub: HubConfig,
    #[serde(default)]
    pub inventory: InventoryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend REST API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    /// Base URL of the REST API (e.g., "https://api.example.org/api").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Total request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    /// Access token used when neither the CLI flag nor the env var supplies one.
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Real-time notification hub settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HubConfig {
    /// Hub endpoint (http/https; converted to ws/wss when connecting).
    #[serde(default = "default_hub_url")]
    pub url: String,
    /// Connect directly over WebSocket without the negotiate round trip.
    #[serde(default)]
    pub skip_negotiation: bool,
    /// Delays between reconnect attempts, in seconds.
    #[serde(default = "default_reconnect_delays")]
    pub reconnect_delays_seconds: Vec<u64>,
}

/// Thresholds used to classify stock levels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryConfig {
    /// Units strictly below this are critical.
    #[serde(default = "default_critical_units")]
    pub critical_units: u32,
    /// Units strictly below this (and not critical) are low.
    #[serde(default = "default_low_units")]
    pub low_units: u32,
    /// Units that render as a full vial.
    #[serde(default = "default_full_units")]
    pub full_units: u32,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_request_timeout() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    5
}

fn default_hub_url() -> String {
    "http://localhost:5000/hubs/notifications".to_string()
}

fn default_reconnect_delays() -> Vec<u64> {
    vec![0, 2, 10, 30]
}

fn default_critical_units() -> u32 {
    5
}

fn default_low_units() -> u32 {
    15
}

fn default_full_units() -> u32 {
    50
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_seconds: default_request_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            access_token: None,
        }
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            url: default_hub_url(),
            skip_negotiation: false,
            reconnect_delays_seconds: default_reconnect_delays(),
        }
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            critical_units: default_critical_units(),
            low_units: default_low_units(),
            full_units: default_full_units(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            hub: HubConfig::default(),
            inventory: InventoryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
