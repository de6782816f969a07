//! User entity - a remote account mirrored into the session cache

use serde::{Deserialize, Serialize};

use crate::collections::Keyed;
use crate::value_objects::Snowflake;

/// Presence status as delivered by the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Idle,
    #[default]
    Offline,
}

impl PresenceStatus {
    /// String form used on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Idle => "idle",
            Self::Offline => "offline",
        }
    }
}

/// Typing state for a user
///
/// `since_ms` is the millisecond stamp of the most recent typing signal. The
/// delayed quiet-window check compares its captured stamp against this value
/// before firing, so a newer signal supersedes an older pending check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypingState {
    pub since_ms: Option<i64>,
    pub channel_id: Option<Snowflake>,
}

impl TypingState {
    /// Check whether a typing signal is currently recorded
    #[inline]
    #[must_use]
    pub fn is_typing(&self) -> bool {
        self.since_ms.is_some()
    }

    /// Clear the typing state
    pub fn clear(&mut self) {
        self.since_ms = None;
        self.channel_id = None;
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub discriminator: String,
    pub avatar: Option<String>,
    pub status: PresenceStatus,
    pub game_id: Option<u64>,
    pub typing: TypingState,
}

impl User {
    /// Create a new User with required fields
    pub fn new(id: Snowflake, username: String, discriminator: String) -> Self {
        Self {
            id,
            username,
            discriminator,
            avatar: None,
            status: PresenceStatus::default(),
            game_id: None,
            typing: TypingState::default(),
        }
    }

    /// Get the full tag: username#discriminator
    pub fn tag(&self) -> String {
        format!("{}#{}", self.username, self.discriminator)
    }

    /// Structured mention marker referencing this user
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }

    /// Get avatar URL or default avatar URL
    pub fn avatar_url(&self) -> String {
        match &self.avatar {
            Some(hash) => format!("/avatars/{}/{}.png", self.id, hash),
            None => format!("/embed/avatars/{}.png", self.default_avatar_index()),
        }
    }

    /// Get default avatar index (0-4) based on discriminator
    fn default_avatar_index(&self) -> u8 {
        self.discriminator.parse::<u16>().unwrap_or(0) as u8 % 5
    }

    /// Compare identity-affecting fields (name, discriminator, avatar)
    ///
    /// Presence updates that leave these untouched mutate status in place;
    /// any identity change replaces the cached value instead.
    #[must_use]
    pub fn same_identity(&self, other: &User) -> bool {
        self.username == other.username
            && self.discriminator == other.discriminator
            && self.avatar == other.avatar
    }

    /// Apply a status/game change in place
    pub fn set_presence(&mut self, status: PresenceStatus, game_id: Option<u64>) {
        self.status = status;
        self.game_id = game_id;
    }
}

impl Keyed for User {
    fn key(&self) -> Snowflake {
        self.id
    }
}
