//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default API endpoint for a locally running backend.
const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the marketplace API (no trailing slash)
    pub api_base_url: String,
    /// Per-request timeout applied by the HTTP client
    pub request_timeout: Duration,
    /// File backing the durable session storage
    pub storage_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base_url = normalize_base_url(
            &env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
        )?;

        let request_timeout = match env::var("API_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    var: "API_TIMEOUT_SECS",
                    reason: format!("expected whole seconds, got {:?}", raw),
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let storage_path = env::var("TCG_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_storage_path());

        Ok(Self {
            api_base_url,
            request_timeout,
            storage_path,
        })
    }

    /// Config for tests: local API, short timeout, throwaway storage path.
    pub fn test_default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(5),
            storage_path: env::temp_dir().join("tcg-marketplace-test").join("session.json"),
        }
    }

    /// Same config pointed at a different API.
    pub fn with_api_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.api_base_url = normalize_base_url(url)?;
        Ok(self)
    }
}

/// Check that `raw` is an http(s) URL and strip any trailing slash.
fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(trimmed).map_err(|e| ConfigError::Invalid {
        var: "API_BASE_URL",
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            var: "API_BASE_URL",
            reason: format!("unsupported scheme {:?}", parsed.scheme()),
        });
    }

    Ok(trimmed.to_string())
}

/// Platform data directory, or a dot-directory under the working directory.
fn default_storage_path() -> PathBuf {
    directories::ProjectDirs::from("com", "tcg", "tcg-marketplace")
        .map(|dirs| dirs.data_dir().join("session.json"))
        .unwrap_or_else(|| PathBuf::from(".tcg-marketplace").join("session.json"))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}
