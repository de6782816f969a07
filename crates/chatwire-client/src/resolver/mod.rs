//! Identity resolution
//!
//! Loose-input references and the functions that map them onto cached
//! entities. Failures are resolution errors, never panics.

mod refs;
mod resolve;

pub use refs::{ChannelRef, ContentRef, MessageRef, ServerRef, UserRef};
pub use resolve::{resolve_mentions, resolve_message, resolve_server, resolve_string, resolve_user};
