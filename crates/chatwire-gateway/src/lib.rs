//! # chatwire-gateway
//!
//! Push-connection plumbing for a session: the wire protocol (op codes and
//! frame format), the connection state machine, the WebSocket transport with
//! its heartbeat task, and the event dispatcher that applies inbound events
//! to the state mirror.

pub mod connection;
pub mod dispatch;
pub mod events;
pub mod protocol;
