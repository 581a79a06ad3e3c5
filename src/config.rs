//! Client configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Environment variable that overrides the configured server URL.
pub const SERVER_URL_ENV: &str = "STRICTLY_CHESS_SERVER_URL";

/// Configuration for the terminal client.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_", into)]
pub struct ClientConfig {
    /// Base URL of the game service API, e.g. `http://localhost:5001/api`.
    #[serde(default = "default_server_url")]
    server_url: String,

    /// How long a success message stays on screen, in milliseconds.
    #[serde(default = "default_message_ttl_ms")]
    message_ttl_ms: u64,

    /// Per-request timeout, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,

    /// Where the TUI writes its log (stdout belongs to the terminal UI).
    #[serde(default = "default_log_file")]
    log_file: PathBuf,

    /// Ask before abandoning the current game via the keyboard shortcut.
    #[serde(default = "default_confirm_new_game")]
    confirm_new_game: bool,
}

#[instrument]
fn default_server_url() -> String {
    "http://localhost:5001/api".to_string()
}

#[instrument]
fn default_message_ttl_ms() -> u64 {
    3000
}

#[instrument]
fn default_request_timeout_secs() -> u64 {
    10
}

#[instrument]
fn default_log_file() -> PathBuf {
    PathBuf::from("strictly_chess.log")
}

#[instrument]
fn default_confirm_new_game() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            message_ttl_ms: default_message_ttl_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            log_file: default_log_file(),
            confirm_new_game: default_confirm_new_game(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file. Missing keys take their defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(server_url = %config.server_url, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when it exists, otherwise falls back to defaults, then
    /// applies the [`SERVER_URL_ENV`] override.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };

        match std::env::var(SERVER_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => {
                info!(server_url = %url, "Server URL overridden from environment");
                Ok(config.with_server_url(url))
            }
            _ => Ok(config),
        }
    }

    /// Success-message lifetime.
    pub fn message_ttl(&self) -> Duration {
        Duration::from_millis(self.message_ttl_ms)
    }

    /// HTTP request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[instrument(skip(self))]
    fn validate(&self) -> Result<(), ConfigError> {
        if self.server_url.trim().is_empty() {
            return Err(ConfigError::new("server_url must not be empty".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::new(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
