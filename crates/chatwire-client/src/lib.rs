//! # chatwire-client
//!
//! The application-facing surface of a session: login and the push handshake,
//! identity resolution over loose inputs, and the command layer that folds
//! HTTP responses back into the state mirror.

pub mod commands;
pub mod resolver;
pub mod rest;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use resolver::{ChannelRef, ContentRef, MessageRef, ServerRef, UserRef};
pub use rest::{Endpoints, HttpTransport, Method, RestTransport};
pub use session::Session;
