//! Event payload definitions
//!
//! Wire-shaped structs for each dispatch event, with conversions into the
//! cache entities. Fields the remote end may omit are defaulted so a sparse
//! payload still decodes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chatwire_core::{
    Channel, MemberState, Message, MessagePatch, Permissions, PresenceStatus, Role, Server, Snowflake,
    User,
};

// === User payload ===

/// User data included in events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserData {
    pub id: Snowflake,
    pub username: String,
    #[serde(default)]
    pub discriminator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub status: PresenceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<u64>,
}

impl UserData {
    /// Convert into a cache entity
    #[must_use]
    pub fn into_user(self) -> User {
        let mut user = User::new(self.id, self.username, self.discriminator);
        user.avatar = self.avatar;
        user.set_presence(self.status, self.game_id);
        user
    }
}

// === READY ===

/// READY event payload - the initial full sync
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyData {
    /// Heartbeat interval in milliseconds, dictated by the remote end
    pub heartbeat_interval: u64,

    /// The authenticated user
    pub user: UserData,

    #[serde(default)]
    pub guilds: Vec<GuildData>,

    #[serde(default)]
    pub private_channels: Vec<DirectChannelData>,
}

/// Direct conversation entry in the READY payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectChannelData {
    pub id: Snowflake,
    pub recipient: UserData,
}

// === Guild events ===

/// GUILD_CREATE / GUILD_UPDATE event payload
///
/// Update payloads carry the same top-level fields but no collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildData {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Snowflake>,
    #[serde(default)]
    pub channels: Vec<ChannelData>,
    #[serde(default)]
    pub roles: Vec<RoleData>,
    #[serde(default)]
    pub members: Vec<GuildMemberData>,
}

impl GuildData {
    /// Convert into a server, its channels, and every user carried along
    #[must_use]
    pub fn into_parts(self) -> (Server, Vec<Channel>, Vec<User>) {
        let mut server = Server::new(self.id, self.name, self.region);
        server.icon = self.icon;
        server.owner_id = self.owner_id;

        for role in self.roles {
            server.roles.add(role.into_role(self.id));
        }

        let mut users = Vec::with_capacity(self.members.len());
        for member in self.members {
            let mut state = MemberState::new(member.roles, member.joined_at);
            state.set_voice(member.mute, member.deaf);
            let user_id = member.user.id;
            users.push(member.user.into_user());
            server.put_member(user_id, state);
        }

        let mut channels = Vec::with_capacity(self.channels.len());
        for data in self.channels {
            let channel = data.into_server_channel_of(self.id);
            server.add_channel(channel.id);
            channels.push(channel);
        }

        (server, channels, users)
    }
}

/// GUILD_DELETE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildDeleteData {
    pub id: Snowflake,
}

// === Channel events ===

/// CHANNEL_CREATE / CHANNEL_UPDATE / CHANNEL_DELETE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelData {
    pub id: Snowflake,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guild_id: Option<Snowflake>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub channel_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub is_private: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<UserData>,
}

impl ChannelData {
    /// Convert into a server-owned channel; `None` when no owning server is named
    #[must_use]
    pub fn into_server_channel(self) -> Option<Channel> {
        let server_id = self.guild_id?;
        Some(self.into_server_channel_of(server_id))
    }

    /// Convert into a channel owned by a known server
    #[must_use]
    pub fn into_server_channel_of(self, server_id: Snowflake) -> Channel {
        let name = self.name.unwrap_or_default();
        let mut channel = if self.channel_type.as_deref() == Some("voice") {
            Channel::new_voice(self.id, server_id, name)
        } else {
            Channel::new_text(self.id, server_id, name)
        };
        channel.topic = self.topic;
        channel.position = self.position;
        channel
    }
}

// === Message events ===

/// MESSAGE_CREATE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageData {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub author: UserData,
    #[serde(default)]
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tts: bool,
    #[serde(default)]
    pub mentions: Vec<UserData>,
    #[serde(default)]
    pub mention_everyone: bool,
}

impl MessageData {
    /// Convert into the message, its author, and the mentioned users
    #[must_use]
    pub fn into_parts(self) -> (Message, User, Vec<User>) {
        let author = self.author.into_user();
        let mentioned: Vec<User> = self.mentions.into_iter().map(UserData::into_user).collect();

        let mut message = Message::new(self.id, self.channel_id, author.id, self.content);
        message.timestamp = self.timestamp;
        message.edited_at = self.edited_timestamp;
        message.tts = self.tts;
        message.mentions = mentioned.iter().map(|u| u.id).collect();
        message.everyone_mentioned = self.mention_everyone;

        (message, author, mentioned)
    }
}

/// MESSAGE_UPDATE event payload (partial)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageUpdateData {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentions: Option<Vec<UserData>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mention_everyone: Option<bool>,
}

impl MessageUpdateData {
    /// Convert into a merge patch; absent fields keep the cached value
    #[must_use]
    pub fn into_patch(self) -> MessagePatch {
        MessagePatch {
            author_id: None,
            content: self.content,
            timestamp: None,
            edited_at: self.edited_timestamp,
            tts: self.tts,
            mentions: self
                .mentions
                .map(|users| users.into_iter().map(|u| u.id).collect()),
            everyone_mentioned: self.mention_everyone,
        }
    }
}

/// MESSAGE_DELETE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDeleteData {
    pub id: Snowflake,
    pub channel_id: Snowflake,
}

// === Role events ===

/// Role data included in events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleData {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub permissions: Permissions,
    #[serde(default)]
    pub color: u32,
    #[serde(default)]
    pub hoist: bool,
    #[serde(default)]
    pub position: i32,
}

impl RoleData {
    /// Convert into a cache entity owned by a server
    #[must_use]
    pub fn into_role(self, server_id: Snowflake) -> Role {
        Role {
            id: self.id,
            server_id,
            name: self.name,
            permissions: self.permissions,
            color: self.color,
            hoist: self.hoist,
            position: self.position,
        }
    }
}

/// GUILD_ROLE_CREATE / GUILD_ROLE_UPDATE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleEventData {
    pub guild_id: Snowflake,
    pub role: RoleData,
}

/// GUILD_ROLE_DELETE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDeleteData {
    pub guild_id: Snowflake,
    pub role_id: Snowflake,
}

// === Member events ===

/// Member data nested in the GUILD_CREATE payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildMemberData {
    pub user: UserData,
    #[serde(default)]
    pub roles: Vec<Snowflake>,
    #[serde(default)]
    pub mute: bool,
    #[serde(default)]
    pub deaf: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<DateTime<Utc>>,
}

/// GUILD_MEMBER_ADD / GUILD_MEMBER_UPDATE / GUILD_MEMBER_REMOVE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberEventData {
    pub guild_id: Snowflake,
    pub user: UserData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Snowflake>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mute: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deaf: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<DateTime<Utc>>,
}

// === Presence and typing ===

/// Partial user carried by PRESENCE_UPDATE
///
/// Identity fields are only present when they changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceUserData {
    pub id: Snowflake,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// PRESENCE_UPDATE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceData {
    pub user: PresenceUserData,
    #[serde(default)]
    pub status: PresenceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<u64>,
}

/// TYPING_START event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypingData {
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

// === Ban events ===

/// GUILD_BAN_ADD / GUILD_BAN_REMOVE event payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BanData {
    pub guild_id: Snowflake,
    pub user: UserData,
}
