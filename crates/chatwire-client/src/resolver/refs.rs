//! Loose-input reference types
//!
//! Commands accept any of these shapes and resolve them against the mirror,
//! so callers can pass an entity they already hold, a bare identity, or for
//! channels a user or message that implies one.

use chatwire_core::{Channel, Message, Server, Snowflake, User};

/// A user, loosely referenced
#[derive(Debug, Clone)]
pub enum UserRef {
    User(User),
    Id(Snowflake),
}

impl UserRef {
    /// The referenced identity
    #[must_use]
    pub fn id(&self) -> Snowflake {
        match self {
            Self::User(user) => user.id,
            Self::Id(id) => *id,
        }
    }
}

impl From<User> for UserRef {
    fn from(user: User) -> Self {
        Self::User(user)
    }
}

impl From<Snowflake> for UserRef {
    fn from(id: Snowflake) -> Self {
        Self::Id(id)
    }
}

/// A server, loosely referenced
#[derive(Debug, Clone)]
pub enum ServerRef {
    Server(Server),
    Id(Snowflake),
}

impl ServerRef {
    /// The referenced identity
    #[must_use]
    pub fn id(&self) -> Snowflake {
        match self {
            Self::Server(server) => server.id,
            Self::Id(id) => *id,
        }
    }
}

impl From<Server> for ServerRef {
    fn from(server: Server) -> Self {
        Self::Server(server)
    }
}

impl From<Snowflake> for ServerRef {
    fn from(id: Snowflake) -> Self {
        Self::Id(id)
    }
}

/// A message, loosely referenced
///
/// A bare identity needs its channel to be findable.
#[derive(Debug, Clone)]
pub enum MessageRef {
    Message(Message),
    Id {
        channel_id: Snowflake,
        message_id: Snowflake,
    },
}

impl From<Message> for MessageRef {
    fn from(message: Message) -> Self {
        Self::Message(message)
    }
}

/// A channel, loosely referenced
///
/// A user reference resolves to the direct conversation with that user,
/// starting one when none is cached. A message reference resolves to the
/// channel that holds it.
#[derive(Debug, Clone)]
pub enum ChannelRef {
    Channel(Channel),
    Id(Snowflake),
    User(UserRef),
    Message(MessageRef),
}

impl From<Channel> for ChannelRef {
    fn from(channel: Channel) -> Self {
        Self::Channel(channel)
    }
}

impl From<Snowflake> for ChannelRef {
    fn from(id: Snowflake) -> Self {
        Self::Id(id)
    }
}

impl From<User> for ChannelRef {
    fn from(user: User) -> Self {
        Self::User(UserRef::User(user))
    }
}

impl From<UserRef> for ChannelRef {
    fn from(user: UserRef) -> Self {
        Self::User(user)
    }
}

impl From<Message> for ChannelRef {
    fn from(message: Message) -> Self {
        Self::Message(MessageRef::Message(message))
    }
}

impl From<MessageRef> for ChannelRef {
    fn from(message: MessageRef) -> Self {
        Self::Message(message)
    }
}

/// Message content, either a single string or parts to join
#[derive(Debug, Clone)]
pub enum ContentRef {
    Text(String),
    Parts(Vec<String>),
}

impl From<&str> for ContentRef {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ContentRef {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<String>> for ContentRef {
    fn from(parts: Vec<String>) -> Self {
        Self::Parts(parts)
    }
}
