//! Connection state machine
//!
//! Linear lifecycle: Idle, Authenticating, Authenticated, Live, Disconnected.
//! Disconnected re-enters the machine as an idle-equivalent state, so a
//! session object can log in again after a teardown.

use std::sync::Arc;

use parking_lot::RwLock;

use chatwire_common::{ClientError, ClientResult};

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No login attempted yet
    #[default]
    Idle,
    /// Credential exchange in flight
    Authenticating,
    /// Token held, push connection being established
    Authenticated,
    /// Push connection open and READY applied
    Live,
    /// Torn down after a close or logout
    Disconnected,
}

impl ConnectionState {
    /// States from which a login attempt may begin
    #[must_use]
    pub const fn can_begin_login(self) -> bool {
        matches!(self, Self::Idle | Self::Disconnected)
    }

    /// States in which commands requiring credentials are accepted
    #[must_use]
    pub const fn is_command_ready(self) -> bool {
        matches!(self, Self::Authenticated | Self::Live)
    }

    /// Get the name of this state
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Authenticating => "Authenticating",
            Self::Authenticated => "Authenticated",
            Self::Live => "Live",
            Self::Disconnected => "Disconnected",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Shared, cloneable view of the session state
///
/// Shared between the session's command layer and the dispatcher; transitions
/// are logged at debug level.
#[derive(Debug, Clone, Default)]
pub struct StateHandle {
    inner: Arc<RwLock<ConnectionState>>,
}

impl StateHandle {
    /// Create a handle starting at Idle
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state
    #[must_use]
    pub fn current(&self) -> ConnectionState {
        *self.inner.read()
    }

    /// Set the state unconditionally
    pub fn set(&self, state: ConnectionState) {
        let mut guard = self.inner.write();
        if *guard != state {
            tracing::debug!(from = %*guard, to = %state, "Connection state transition");
            *guard = state;
        }
    }

    /// Enter Authenticating; rejected while a login is in progress or done
    pub fn begin_login(&self) -> ClientResult<()> {
        let mut guard = self.inner.write();
        if !guard.can_begin_login() {
            return Err(ClientError::AlreadyConnected);
        }
        tracing::debug!(from = %*guard, to = %ConnectionState::Authenticating, "Connection state transition");
        *guard = ConnectionState::Authenticating;
        Ok(())
    }

    /// Reject a command unless credentials are held
    pub fn require_command_ready(&self) -> ClientResult<()> {
        if self.current().is_command_ready() {
            Ok(())
        } else {
            Err(ClientError::NotAuthenticated)
        }
    }

    /// Enter Live (READY applied)
    pub fn mark_live(&self) {
        self.set(ConnectionState::Live);
    }

    /// Enter Disconnected; returns false if already there
    pub fn mark_disconnected(&self) -> bool {
        let mut guard = self.inner.write();
        if *guard == ConnectionState::Disconnected {
            return false;
        }
        tracing::debug!(from = %*guard, to = %ConnectionState::Disconnected, "Connection state transition");
        *guard = ConnectionState::Disconnected;
        true
    }
}
