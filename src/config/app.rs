//! Application-level configuration.

use serde::Deserialize;

/// Application-level settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application name used in logs.
    pub name: String,
    /// Logging verbosity: "trace", "debug", "info", "warn", "error".
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "arb-sim".to_string(),
            log_level: None,
        }
    }
}
