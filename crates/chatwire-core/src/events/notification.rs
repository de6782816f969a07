//! Notifications emitted when the session mirror changes
//!
//! A single broadcast channel per session carries this closed set of tagged
//! payloads; listeners filter per tag. Payloads are clones of cached entities
//! taken after the triggering mutation, so a listener re-entering the session
//! observes a mirror that already reflects the event.

use crate::entities::{Channel, Message, PresenceStatus, Role, Server, User};
use crate::value_objects::Snowflake;

/// All notifications a session can emit
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Initial full-sync applied; the mirror is populated and live
    Ready,
    /// A message arrived in a cached channel
    Message(Message),
    /// A cached message was edited; carries (new, old)
    MessageUpdated { new: Message, old: Message },
    /// A message was deleted; the old value is absent if never fetched
    MessageDeleted {
        channel_id: Snowflake,
        message: Option<Message>,
    },
    ServerCreated(Server),
    ServerUpdated { old: Server, new: Server },
    ServerDeleted(Server),
    ChannelCreated(Channel),
    ChannelUpdated { old: Channel, new: Channel },
    ChannelDeleted(Channel),
    ServerRoleCreated(Role),
    ServerRoleUpdated { old: Role, new: Role },
    ServerRoleDeleted(Role),
    ServerNewMember { server_id: Snowflake, user: User },
    ServerMemberRemoved { server_id: Snowflake, user: User },
    ServerMemberUpdated { server_id: Snowflake, user: User },
    /// Status/game changed without touching identity fields
    Presence {
        user: User,
        status: PresenceStatus,
        game_id: Option<u64>,
    },
    /// Identity-affecting fields changed; carries (old, new)
    UserUpdated { old: User, new: User },
    UserTypingStart {
        user_id: Snowflake,
        channel_id: Snowflake,
    },
    UserTypingStop {
        user_id: Snowflake,
        channel_id: Snowflake,
    },
    UserBanned { user: User, server_id: Snowflake },
    UserUnbanned { user: User, server_id: Snowflake },
    /// The push connection closed; session is no longer live
    Disconnected,
    /// Diagnostic: an inbound event could not be fully applied
    Warning(String),
    /// Diagnostic: non-actionable internal detail
    Debug(String),
    /// Raw decoded frame passthrough, emitted before typed handling
    Raw(serde_json::Value),
}

impl Notification {
    /// Get the topic name for this notification
    pub fn topic(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Message(_) => "message",
            Self::MessageUpdated { .. } => "messageUpdated",
            Self::MessageDeleted { .. } => "messageDeleted",
            Self::ServerCreated(_) => "serverCreated",
            Self::ServerUpdated { .. } => "serverUpdated",
            Self::ServerDeleted(_) => "serverDeleted",
            Self::ChannelCreated(_) => "channelCreated",
            Self::ChannelUpdated { .. } => "channelUpdated",
            Self::ChannelDeleted(_) => "channelDeleted",
            Self::ServerRoleCreated(_) => "serverRoleCreated",
            Self::ServerRoleUpdated { .. } => "serverRoleUpdated",
            Self::ServerRoleDeleted(_) => "serverRoleDeleted",
            Self::ServerNewMember { .. } => "serverNewMember",
            Self::ServerMemberRemoved { .. } => "serverMemberRemoved",
            Self::ServerMemberUpdated { .. } => "serverMemberUpdated",
            Self::Presence { .. } => "presence",
            Self::UserUpdated { .. } => "userUpdate",
            Self::UserTypingStart { .. } => "userTypingStart",
            Self::UserTypingStop { .. } => "userTypingStop",
            Self::UserBanned { .. } => "userBanned",
            Self::UserUnbanned { .. } => "userUnbanned",
            Self::Disconnected => "disconnected",
            Self::Warning(_) => "warning",
            Self::Debug(_) => "debug",
            Self::Raw(_) => "raw",
        }
    }

    /// Check if this is a diagnostic notification (warning or debug)
    #[must_use]
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Self::Warning(_) | Self::Debug(_))
    }
}
