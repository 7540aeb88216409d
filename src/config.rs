//! Configuration management for the FMP MCP Server
//!
//! Handles environment variables and client settings. The API key is resolved
//! once at startup and injected into the client, never looked up ambiently.

use std::time::Duration;

use crate::error::Result;

/// Configuration for the FMP MCP Server
#[derive(Debug, Clone)]
pub struct Config {
    /// FMP API key appended to every request
    pub api_key: String,

    /// Base URL for the FMP stable API
    pub base_url: String,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Config {
    /// Create a new configuration from the environment
    pub fn new() -> Result<Self> {
        // An absent key is not an error: requests go out with an empty key and
        // the remote service rejects them with an HTTP error.
        let api_key = std::env::var(fmp::API_KEY_VAR).unwrap_or_default();

        let base_url = std::env::var("FMP_BASE_URL")
            .unwrap_or_else(|_| fmp::API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = std::env::var("FMP_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(fmp::DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_key,
            base_url,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Build a configuration with an injected key and base URL (used by tests)
    pub fn with_credentials(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(fmp::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Check whether an API key was configured
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new().expect("Failed to create default config")
    }
}

/// FMP API constants
pub mod fmp {
    /// Base URL for the FMP stable API
    pub const API_BASE_URL: &str = "https://financialmodelingprep.com/stable";

    /// Environment variable holding the API key
    pub const API_KEY_VAR: &str = "FMP_API_KEY";

    /// Query parameter the key is sent under
    pub const API_KEY_PARAM: &str = "apikey";

    /// Default per-request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = Config::new();
        assert!(config.is_ok());
    }

    #[test]
    fn test_injected_credentials() {
        let config = Config::with_credentials("test-key", "http://localhost:9999/");
        assert!(config.has_api_key());
        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_empty_key_is_allowed() {
        let config = Config::with_credentials("", fmp::API_BASE_URL);
        assert!(!config.has_api_key());
    }
}
