//! Event dispatch
//!
//! Applies inbound push frames to the state mirror and fans out
//! notifications.

mod dispatcher;

pub use dispatcher::Dispatcher;
