//! Gateway events
//!
//! Event type tags and the typed payload structs they carry.

mod event_types;
mod payloads;

pub use event_types::GatewayEventType;
pub use payloads::{
    BanData, ChannelData, DirectChannelData, GuildData, GuildDeleteData, GuildMemberData, MemberEventData,
    MessageData, MessageDeleteData, MessageUpdateData, PresenceData, PresenceUserData, ReadyData,
    RoleData, RoleDeleteData, RoleEventData, TypingData, UserData,
};
