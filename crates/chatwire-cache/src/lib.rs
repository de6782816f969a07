//! # chatwire-cache
//!
//! The in-process state mirror: a single owning set of entity caches shared
//! by the event dispatcher and the command layer. Both paths converge here,
//! making the mirror the single source of truth for resolution and for
//! application-facing notifications.
//!
//! Locking: every cache sits behind a `parking_lot::RwLock` scoped inside a
//! helper method, so no lock is ever held across an `.await`.

pub mod mirror;

pub use mirror::{MirrorStats, PresenceChange, StateMirror};
