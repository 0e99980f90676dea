//! # Client Configuration
//!
//! The credentials and settings every request is built from.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     VOUCHERIFY_APPLICATION_ID=...                                      │
//! │     VOUCHERIFY_CLIENT_TOKEN=...                                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/voucherify/client.toml (Linux)                           │
//! │     ~/Library/Application Support/io.voucherify.voucherify/ (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     api.voucherify.io, 5000 ms timeout, no credentials                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! application_id = "my-client-app-id"
//! token = "my-client-secret-token"
//! timeout_ms = 5000
//! api_base = "https://api.voucherify.io"
//! tracking_id = "customer-42"
//! ```
//!
//! Credentials are not required at load time. Each call checks them and
//! fails locally when they are missing.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.voucherify.io";

/// Channel marker sent in `X-Voucherify-Channel` and as the default publish
/// channel.
pub const DEFAULT_CHANNEL: &str = "Voucherify.js";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_channel() -> String {
    DEFAULT_CHANNEL.to_string()
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Settings shared by every request a client makes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Client application id (`X-Client-Application-Id`).
    #[serde(default)]
    pub application_id: String,

    /// Client secret token (`X-Client-Token`).
    #[serde(default)]
    pub token: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Tracking identity used when a call carries no customer source id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,

    /// Base URL the endpoint paths are joined onto.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Channel marker for `X-Voucherify-Channel`.
    #[serde(default = "default_channel")]
    pub channel: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            application_id: String::new(),
            token: String::new(),
            timeout_ms: default_timeout_ms(),
            tracking_id: None,
            api_base: default_api_base(),
            channel: default_channel(),
        }
    }
}

impl ClientConfig {
    /// Builds a config from credentials, the way `initialize` does.
    ///
    /// A missing or zero timeout falls back to 5000 ms.
    pub fn new(
        application_id: impl Into<String>,
        token: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Self {
        let timeout_ms = timeout
            .map(|t| t.as_millis() as u64)
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        ClientConfig {
            application_id: application_id.into(),
            token: token.into(),
            timeout_ms,
            ..Self::default()
        }
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the non-credential settings.
    pub fn validate(&self) -> ClientResult<()> {
        self.base_url()?;

        if self.timeout_ms == 0 {
            return Err(ClientError::Configuration(
                "timeout_ms must be greater than 0".into(),
            ));
        }

        if self.channel.trim().is_empty() {
            return Err(ClientError::Configuration("channel must not be empty".into()));
        }

        Ok(())
    }

    /// Checks both credentials are present.
    pub fn ensure_credentials(&self) -> ClientResult<()> {
        if self.application_id.trim().is_empty() {
            return Err(ClientError::Configuration(
                "Missing Client Application ID".into(),
            ));
        }
        if self.token.trim().is_empty() {
            return Err(ClientError::Configuration(
                "Missing Client Token (Secret Key)".into(),
            ));
        }
        Ok(())
    }

    /// Parses `api_base`, requiring an http(s) scheme.
    pub fn base_url(&self) -> ClientResult<Url> {
        let url = Url::parse(&self.api_base)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ClientError::InvalidUrl(format!(
                "API base must start with http:// or https://, got scheme '{}'",
                other
            ))),
        }
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(id) = std::env::var("VOUCHERIFY_APPLICATION_ID") {
            debug!("Overriding application id from environment");
            self.application_id = id;
        }

        if let Ok(token) = std::env::var("VOUCHERIFY_CLIENT_TOKEN") {
            debug!("Overriding client token from environment");
            self.token = token;
        }

        if let Ok(base) = std::env::var("VOUCHERIFY_API_BASE") {
            debug!(api_base = %base, "Overriding API base from environment");
            self.api_base = base;
        }

        if let Ok(timeout) = std::env::var("VOUCHERIFY_TIMEOUT_MS") {
            match timeout.parse::<u64>() {
                Ok(ms) => self.timeout_ms = ms,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric VOUCHERIFY_TIMEOUT_MS"),
            }
        }

        if let Ok(tracking_id) = std::env::var("VOUCHERIFY_TRACKING_ID") {
            self.tracking_id = Some(tracking_id);
        }

        if let Ok(channel) = std::env::var("VOUCHERIFY_CHANNEL") {
            self.channel = channel;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("io", "voucherify", "voucherify")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }
}
