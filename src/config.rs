use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Session coordination configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Quiet period after the last edit before a stream is flushed (ms)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Per-request timeout for persistence and share calls (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Base URL of the document API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Bearer token forwarded on every API call
    pub api_token: Option<String>,
}

impl SessionConfig {
    /// Load configuration from environment variables or app.env file
    pub fn load() -> Result<Self, ConfigError> {
        // Try to load from app.env file first
        if std::path::Path::new("app.env").exists() {
            dotenvy::from_filename("app.env").ok();
        } else {
            // Fallback to .env file
            dotenvy::dotenv().ok();
        }

        // Load from environment variables using envy
        match envy::prefixed("COLABRI_").from_env::<SessionConfig>() {
            Ok(config) => {
                info!("✅ Session configuration loaded successfully");
                Ok(config)
            }
            Err(e) => {
                error!("❌ Failed to load session configuration: {}", e);
                Err(ConfigError::EnvError(e))
            }
        }
    }

    /// Debounce delay as a Duration
    pub fn debounce_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }

    /// Request timeout as a Duration
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            api_base_url: default_api_base_url(),
            api_token: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    EnvError(envy::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EnvError(e) => write!(f, "Environment variable error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

// Default value functions
fn default_debounce_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_api_base_url() -> String {
    "http://localhost:3000".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timings() {
        let config = SessionConfig::default();
        assert_eq!(config.debounce_ms, 1000);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(
            config.debounce_delay(),
            std::time::Duration::from_millis(1000)
        );
        assert_eq!(config.request_timeout(), std::time::Duration::from_secs(10));
        assert!(config.api_token.is_none());
    }
}
