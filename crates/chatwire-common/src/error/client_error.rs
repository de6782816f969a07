//! Client error types
//!
//! Unified error surface for every command a session exposes. Protocol
//! anomalies on the push stream are not errors: the dispatcher degrades them
//! to warning notifications and the session stays live.

use std::fmt;

/// Errors surfaced to callers of session commands
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    // Resolution errors - a loose input could not be mapped to a cached entity
    #[error("Could not resolve destination: {0}")]
    Resolution(String),

    // Transport errors - an outbound call failed or returned non-success
    #[error("Transport error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    // State misuse - rejected immediately, no network call issued
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Already logging in or logged in")]
    AlreadyConnected,

    // Push connection failures (open/handshake/send)
    #[error("Gateway error: {0}")]
    Gateway(String),

    // Handshake-level decode failures
    #[error("Protocol error: {0}")]
    Protocol(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl ClientError {
    /// Get an error code string for diagnostics
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Resolution(_) => "RESOLUTION_FAILED",
            Self::Transport { .. } => "TRANSPORT_ERROR",
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::AlreadyConnected => "ALREADY_CONNECTED",
            Self::Gateway(_) => "GATEWAY_ERROR",
            Self::Protocol(_) => "PROTOCOL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this error was rejected before any network call
    #[must_use]
    pub fn is_state_misuse(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::AlreadyConnected)
    }

    /// Check if this is a resolution failure
    #[must_use]
    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution(_))
    }

    /// Create a resolution error
    #[must_use]
    pub fn resolution(msg: impl fmt::Display) -> Self {
        Self::Resolution(msg.to_string())
    }

    /// Create a transport error carrying the remote error text
    #[must_use]
    pub fn transport(status: Option<u16>, message: impl fmt::Display) -> Self {
        Self::Transport {
            status,
            message: message.to_string(),
        }
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
