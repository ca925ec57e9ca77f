//! Configuration management for the client.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default backend base URL (can be overridden at compile time via CRAWLERHUB_API_BASE_URL).
pub const DEFAULT_API_BASE_URL: &str = match option_env!("CRAWLERHUB_API_BASE_URL") {
    Some(url) => url,
    None => "http://localhost:8080",
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default timeout for ordinary requests, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default timeout for long-running operations (analysis trigger, PPT
/// download), in seconds. These run on the order of tens of minutes.
pub const DEFAULT_LONG_REQUEST_TIMEOUT_SECS: u64 = 1800;

/// Main client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Backend API base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Timeout applied to ordinary requests, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Timeout applied to long-running requests, in seconds.
    #[serde(default = "default_long_request_timeout_secs")]
    pub long_request_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_long_request_timeout_secs() -> u64 {
    DEFAULT_LONG_REQUEST_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            long_request_timeout_secs: DEFAULT_LONG_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Create a new Config with default values, then override from environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    /// Load configuration from the config file, falling back to defaults.
    /// Environment variables override file values.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the config file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let config_path = paths.config_file();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Override configuration from environment variables.
    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var("CRAWLERHUB_LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Ok(base_url) = std::env::var("CRAWLERHUB_API_BASE_URL") {
            self.api_base_url = base_url;
        }
        if let Ok(timeout) = std::env::var("CRAWLERHUB_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.request_timeout_secs = secs;
            }
        }
        if let Ok(timeout) = std::env::var("CRAWLERHUB_LONG_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse() {
                self.long_request_timeout_secs = secs;
            }
        }
    }

    /// Get the API base URL as a parsed URL.
    pub fn api_base_url(&self) -> CoreResult<Url> {
        Url::parse(&self.api_base_url).map_err(CoreError::from)
    }
}
