//! Domain entities - the mirrored remote state

mod channel;
mod member;
mod message;
mod role;
mod server;
mod user;

pub use channel::{Channel, ChannelKind};
pub use member::MemberState;
pub use message::{Message, MessagePatch};
pub use role::Role;
pub use server::Server;
pub use user::{PresenceStatus, TypingState, User};
