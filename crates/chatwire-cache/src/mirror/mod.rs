//! State mirror - the four session caches and their mutation helpers

mod presence;
mod state_mirror;
mod typing;

pub use presence::PresenceChange;
pub use state_mirror::{MirrorStats, StateMirror};
