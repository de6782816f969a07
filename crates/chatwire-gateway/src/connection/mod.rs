//! Connection lifecycle
//!
//! The session state machine, the push transport boundary with its WebSocket
//! implementation, and the heartbeat task.

pub mod heartbeat;
mod state;
mod transport;

pub use state::{ConnectionState, StateHandle};
pub use transport::{PushHandle, PushInbound, PushTransport, WebSocketTransport};
