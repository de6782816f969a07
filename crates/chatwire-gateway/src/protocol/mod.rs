//! Gateway wire protocol
//!
//! Frame format and op codes shared by everything that touches the push
//! connection.

mod frame;
mod opcodes;

pub use frame::{ClientProperties, GatewayMessage, IdentifyPayload};
pub use opcodes::OpCode;
