//! Theme manager configuration
//!
//! Every field has a serde default so a partial (or empty) JSON object is a
//! valid configuration.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Milliseconds between attempts to find a requested theme
pub const DEFAULT_REQUEST_INTERVAL_MS: u64 = 75;

/// Failed attempts tolerated before falling back to the default theme
pub const DEFAULT_REQUEST_THRESHOLD: u32 = 20;

/// Configuration for [`ThemeManager`](crate::view::theme::ThemeManager)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub struct ThemeManagerConfig {
    /// Settings key that holds the theme setting data
    #[serde(default = "default_settings_key")]
    pub settings_key: String,

    /// Base URL that local stylesheet paths are resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Settings field naming the desired theme
    #[serde(default = "default_theme_field")]
    pub theme_field: String,

    /// Settings field that enables scrollbar theming globally
    #[serde(default = "default_scrollbars_field")]
    pub scrollbars_field: String,

    /// Delay between lookups of a theme that is not registered yet
    #[serde(default = "default_request_interval_ms")]
    pub request_interval_ms: u64,

    /// Number of failed lookups before falling back to the default theme
    #[serde(default = "default_request_threshold")]
    pub request_threshold: u32,
}

fn default_settings_key() -> String {
    "@themekit/apputils:themes".to_string()
}

fn default_base_url() -> String {
    "http://localhost/".to_string()
}

fn default_theme_field() -> String {
    "theme".to_string()
}

fn default_scrollbars_field() -> String {
    "theme-scrollbars".to_string()
}

fn default_request_interval_ms() -> u64 {
    DEFAULT_REQUEST_INTERVAL_MS
}

fn default_request_threshold() -> u32 {
    DEFAULT_REQUEST_THRESHOLD
}

impl Default for ThemeManagerConfig {
    fn default() -> Self {
        Self {
            settings_key: default_settings_key(),
            base_url: default_base_url(),
            theme_field: default_theme_field(),
            scrollbars_field: default_scrollbars_field(),
            request_interval_ms: default_request_interval_ms(),
            request_threshold: default_request_threshold(),
        }
    }
}

impl ThemeManagerConfig {
    /// Config with the given base URL and defaults elsewhere
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse theme config: {}", e))
    }

    pub fn request_interval(&self) -> Duration {
        Duration::from_millis(self.request_interval_ms)
    }

    /// JSON Schema describing this configuration
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(ThemeManagerConfig);
        serde_json::to_value(&schema).unwrap_or(serde_json::Value::Null)
    }
}
