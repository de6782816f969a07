//! Channel entity - text, voice, or direct conversation
//!
//! Channel variants share identity but differ in behavior, so the variant is
//! a tagged union dispatched on `kind` rather than separate types.

use crate::collections::{Keyed, Store};
use crate::entities::Message;
use crate::value_objects::Snowflake;

/// Channel variant tag with the variant-specific reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// Text channel owned by a server
    Text { server_id: Snowflake },
    /// Voice channel owned by a server
    Voice { server_id: Snowflake },
    /// Two-party direct conversation, not owned by any server
    Direct { recipient_id: Snowflake },
}

/// Channel entity
///
/// `messages` is only populated for text and direct channels; voice channels
/// keep it empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub kind: ChannelKind,
    pub name: Option<String>,
    pub topic: Option<String>,
    pub position: i32,
    pub messages: Store<Message>,
}

impl Channel {
    /// Create a new server text channel
    #[must_use]
    pub fn new_text(id: Snowflake, server_id: Snowflake, name: String) -> Self {
        Self {
            id,
            kind: ChannelKind::Text { server_id },
            name: Some(name),
            topic: None,
            position: 0,
            messages: Store::new(),
        }
    }

    /// Create a new server voice channel
    #[must_use]
    pub fn new_voice(id: Snowflake, server_id: Snowflake, name: String) -> Self {
        Self {
            id,
            kind: ChannelKind::Voice { server_id },
            name: Some(name),
            topic: None,
            position: 0,
            messages: Store::new(),
        }
    }

    /// Create a new direct conversation channel
    #[must_use]
    pub fn new_direct(id: Snowflake, recipient_id: Snowflake) -> Self {
        Self {
            id,
            kind: ChannelKind::Direct { recipient_id },
            name: None,
            topic: None,
            position: 0,
            messages: Store::new(),
        }
    }

    /// The owning server, absent for direct conversations
    #[inline]
    #[must_use]
    pub fn server_id(&self) -> Option<Snowflake> {
        match self.kind {
            ChannelKind::Text { server_id } | ChannelKind::Voice { server_id } => Some(server_id),
            ChannelKind::Direct { .. } => None,
        }
    }

    /// The other party of a direct conversation
    #[inline]
    #[must_use]
    pub fn recipient_id(&self) -> Option<Snowflake> {
        match self.kind {
            ChannelKind::Direct { recipient_id } => Some(recipient_id),
            _ => None,
        }
    }

    /// Check if this is a text channel
    #[inline]
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, ChannelKind::Text { .. })
    }

    /// Check if this is a voice channel
    #[inline]
    #[must_use]
    pub fn is_voice(&self) -> bool {
        matches!(self.kind, ChannelKind::Voice { .. })
    }

    /// Check if this is a direct conversation
    #[inline]
    #[must_use]
    pub fn is_direct(&self) -> bool {
        matches!(self.kind, ChannelKind::Direct { .. })
    }

    /// Channels that carry a message history (text and direct)
    #[inline]
    #[must_use]
    pub fn carries_messages(&self) -> bool {
        !self.is_voice()
    }

    /// Get display name (channel name or fallback for direct conversations)
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Direct Message")
    }

    /// Structured mention marker referencing this channel
    pub fn mention(&self) -> String {
        format!("<#{}>", self.id)
    }

    /// Carry forward another channel's message history
    ///
    /// Used when rebuilding a channel value from an update payload.
    #[must_use]
    pub fn with_messages(mut self, messages: Store<Message>) -> Self {
        self.messages = messages;
        self
    }
}

impl Keyed for Channel {
    fn key(&self) -> Snowflake {
        self.id
    }
}
