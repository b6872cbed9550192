//! Application configuration value object

use serde::{Deserialize, Serialize};

/// Default backend base URL
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key sent with every backend request
    pub api_key: Option<String>,
    /// Backend base URL
    pub server_url: Option<String>,
    /// Preferred input device label
    pub device: Option<String>,
    /// Show desktop notifications while recording
    pub notify: Option<bool>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            server_url: Some(DEFAULT_SERVER_URL.to_string()),
            device: None,
            notify: Some(false),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            server_url: other.server_url.or(self.server_url),
            device: other.device.or(self.device),
            notify: other.notify.or(self.notify),
        }
    }

    /// Get the server URL, or the default if not set
    pub fn server_url_or_default(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    /// Get notify setting, or false if not set
    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(false)
    }
}
