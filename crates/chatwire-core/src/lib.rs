//! # chatwire-core
//!
//! Domain layer containing entities, value objects, the ordered keyed store,
//! and the notification surface. This crate has zero dependencies on
//! transports (HTTP client, WebSocket, etc.).

pub mod collections;
pub mod entities;
pub mod events;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use collections::{Keyed, Store};
pub use entities::{
    Channel, ChannelKind, MemberState, Message, MessagePatch, PresenceStatus, Role, Server,
    TypingState, User,
};
pub use events::Notification;
pub use value_objects::{Permissions, Snowflake, SnowflakeParseError};
