//! Client configuration struct
//!
//! Loads configuration from environment variables, with a `.env` file picked
//! up when present.

use std::env;

/// Configuration for a chatwire session
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API (e.g. `https://chat.example.com/api`)
    pub api_base: String,
    /// Gateway protocol version sent in the identify handshake
    pub protocol_version: u8,
    /// Request compressed push frames (transport-level, decoded before dispatch)
    pub compress: bool,
    /// Client identification metadata sent in the identify handshake
    pub client_name: String,
    /// Quiet window after a typing signal before a typing-stop fires (ms)
    pub typing_quiet_ms: u64,
    /// Notification broadcast buffer size
    pub notification_buffer: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            protocol_version: default_protocol_version(),
            compress: false,
            client_name: default_client_name(),
            typing_quiet_ms: default_typing_quiet_ms(),
            notification_buffer: default_notification_buffer(),
        }
    }
}

// Default value functions
fn default_api_base() -> String {
    "http://127.0.0.1:8080/api".to_string()
}

fn default_protocol_version() -> u8 {
    3
}

fn default_client_name() -> String {
    "chatwire".to_string()
}

fn default_typing_quiet_ms() -> u64 {
    6000
}

fn default_notification_buffer() -> usize {
    256
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if `CHATWIRE_API_BASE` is missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            api_base: env::var("CHATWIRE_API_BASE")
                .map_err(|_| ConfigError::MissingVar("CHATWIRE_API_BASE"))?,
            protocol_version: env::var("CHATWIRE_PROTOCOL_VERSION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_protocol_version),
            compress: env::var("CHATWIRE_COMPRESS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
            client_name: env::var("CHATWIRE_CLIENT_NAME").unwrap_or_else(|_| default_client_name()),
            typing_quiet_ms: env::var("CHATWIRE_TYPING_QUIET_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_typing_quiet_ms),
            notification_buffer: env::var("CHATWIRE_NOTIFICATION_BUFFER")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_notification_buffer),
        })
    }

    /// Configuration pointed at an explicit API base, defaults elsewhere
    #[must_use]
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Self::default()
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = ClientConfig::default();
        assert_eq!(config.protocol_version, 3);
        assert_eq!(config.typing_quiet_ms, 6000);
        assert_eq!(config.notification_buffer, 256);
        assert!(!config.compress);
    }

    #[test]
    fn test_with_api_base() {
        let config = ClientConfig::with_api_base("https://example.org/api");
        assert_eq!(config.api_base, "https://example.org/api");
        assert_eq!(config.client_name, "chatwire");
    }
}
