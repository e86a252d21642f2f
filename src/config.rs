//! Portal configuration parsed from environment variables.
//!
//! SYSTEM CONTEXT
//! ==============
//! Built once at startup and handed to [`crate::app::AppContext`]; nothing
//! below the root reads the environment directly.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_FIREBASE_AUTH_BASE_URL: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const TOKEN_FILE_NAME: &str = "vendor_auth_token";

const APP_DIR_NAME: &str = "kriyado-vendor";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("no config directory available; set VENDOR_TOKEN_PATH")]
    NoConfigDir,
}

/// Per-request HTTP timeouts shared by the backend and identity clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Timeouts {
    #[must_use]
    pub fn request(self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    #[must_use]
    pub fn connect(self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    pub api_base_url: String,
    /// Firebase Web API key. `None` disables identity operations.
    pub firebase_api_key: Option<String>,
    pub firebase_auth_base_url: String,
    pub token_path: PathBuf,
    pub timeouts: Timeouts,
}

impl PortalConfig {
    /// Build typed portal config from environment variables.
    ///
    /// Optional:
    /// - `VENDOR_API_BASE_URL`: default `http://localhost:8000`
    /// - `FIREBASE_API_KEY`: required only by login/signup
    /// - `FIREBASE_AUTH_BASE_URL`: default Google identity toolkit host
    /// - `VENDOR_TOKEN_PATH`: default `<config dir>/kriyado-vendor/vendor_auth_token`
    /// - `VENDOR_REQUEST_TIMEOUT_SECS`: default 30
    /// - `VENDOR_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] when no token path is set and the
    /// platform has no config directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = trim_url(
            std::env::var("VENDOR_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned()),
        );
        let firebase_api_key = std::env::var("FIREBASE_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let firebase_auth_base_url = trim_url(
            std::env::var("FIREBASE_AUTH_BASE_URL").unwrap_or_else(|_| DEFAULT_FIREBASE_AUTH_BASE_URL.to_owned()),
        );
        let token_path = match std::env::var("VENDOR_TOKEN_PATH") {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_token_path()?,
        };
        let timeouts = Timeouts {
            request_secs: env_parse_u64("VENDOR_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("VENDOR_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_base_url, firebase_api_key, firebase_auth_base_url, token_path, timeouts })
    }

    /// Return the Firebase API key or the typed "missing" error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `FIREBASE_API_KEY` was not set.
    pub fn require_firebase_key(&self) -> Result<&str, ConfigError> {
        self.firebase_api_key
            .as_deref()
            .ok_or(ConfigError::Missing("FIREBASE_API_KEY"))
    }
}

fn default_token_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(TOKEN_FILE_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

fn trim_url(raw: String) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
