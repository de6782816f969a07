//! Resolution against the mirror
//!
//! User, server, and message resolution are synchronous cache lookups.
//! Channel resolution lives on the session because a user target may need to
//! start a direct conversation over HTTP.

use chatwire_cache::StateMirror;
use chatwire_common::{ClientError, ClientResult};
use chatwire_core::{Channel, Message, Server, Snowflake, User};

use super::{ChannelRef, ContentRef, MessageRef, ServerRef, UserRef};
use crate::session::Session;

/// Resolve a user reference against the mirror
pub fn resolve_user(mirror: &StateMirror, target: UserRef) -> ClientResult<User> {
    match target {
        UserRef::User(user) => Ok(user),
        UserRef::Id(id) => mirror
            .get_user(id)
            .ok_or_else(|| ClientError::resolution(format!("no cached user {id}"))),
    }
}

/// Resolve a server reference against the mirror
pub fn resolve_server(mirror: &StateMirror, target: ServerRef) -> ClientResult<Server> {
    match target {
        ServerRef::Server(server) => Ok(server),
        ServerRef::Id(id) => mirror
            .get_server(id)
            .ok_or_else(|| ClientError::resolution(format!("no cached server {id}"))),
    }
}

/// Resolve a message reference against the mirror
pub fn resolve_message(mirror: &StateMirror, target: MessageRef) -> ClientResult<Message> {
    match target {
        MessageRef::Message(message) => Ok(message),
        MessageRef::Id {
            channel_id,
            message_id,
        } => mirror
            .get_message(channel_id, message_id)
            .ok_or_else(|| {
                ClientError::resolution(format!("no cached message {message_id} in channel {channel_id}"))
            }),
    }
}

/// Extract `<@id>` mention markers from message content
///
/// The referenced identities need not be cached; malformed markers are
/// skipped.
#[must_use]
pub fn resolve_mentions(content: &str) -> Vec<Snowflake> {
    let mut mentions = Vec::new();
    let mut rest = content;

    while let Some(start) = rest.find("<@") {
        rest = &rest[start + 2..];
        let Some(end) = rest.find('>') else {
            break;
        };
        let digits = &rest[..end];
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(raw) = digits.parse::<i64>() {
                mentions.push(Snowflake::new(raw));
            }
        }
        rest = &rest[end + 1..];
    }

    mentions
}

/// Render message content from a loose input
#[must_use]
pub fn resolve_string(content: ContentRef) -> String {
    match content {
        ContentRef::Text(text) => text,
        ContentRef::Parts(parts) => parts.concat(),
    }
}

impl Session {
    /// Resolve a channel reference, starting a direct conversation if needed
    ///
    /// An entity the caller already holds is refreshed from the mirror when
    /// cached; a bare identity must be cached.
    pub async fn resolve_channel(&self, target: impl Into<ChannelRef> + Send) -> ClientResult<Channel> {
        match target.into() {
            ChannelRef::Channel(channel) => Ok(self.mirror().get_channel(channel.id).unwrap_or(channel)),
            ChannelRef::Id(id) => self
                .mirror()
                .get_channel(id)
                .ok_or_else(|| ClientError::resolution(format!("no cached channel {id}"))),
            ChannelRef::User(target) => {
                let user = resolve_user(self.mirror(), target)?;
                if let Some(existing) = self.mirror().find_direct_channel_with(user.id) {
                    return Ok(existing);
                }
                self.start_direct(UserRef::User(user)).await
            }
            ChannelRef::Message(target) => {
                let message = resolve_message(self.mirror(), target)?;
                self.mirror().get_channel(message.channel_id).ok_or_else(|| {
                    ClientError::resolution(format!("no cached channel {}", message.channel_id))
                })
            }
        }
    }
}
