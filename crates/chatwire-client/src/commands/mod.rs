//! Session commands
//!
//! Every command is state-gated and folds its HTTP response back into the
//! mirror before returning, so the caller and any notification listeners
//! observe the same state.

mod auth;
mod direct;
mod history;
mod message;
mod server;

pub use message::{DeleteOptions, MessageOptions};
