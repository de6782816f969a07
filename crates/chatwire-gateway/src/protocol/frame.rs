//! Gateway frame format
//!
//! Every message on the push connection is a single JSON object with an op
//! code, an event type tag and sequence number for dispatches, and an opaque
//! data payload.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::OpCode;

/// Gateway frame format
///
/// All messages sent over the WebSocket connection follow this format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Operation code
    pub op: OpCode,

    /// Event type (only for op=0 Dispatch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Sequence number (only for op=0 Dispatch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Event data payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

impl GatewayMessage {
    /// Create an Identify frame (op=2)
    #[must_use]
    pub fn identify(payload: &IdentifyPayload) -> Self {
        Self {
            op: OpCode::Identify,
            t: None,
            s: None,
            d: Some(serde_json::to_value(payload).unwrap_or_default()),
        }
    }

    /// Create a Heartbeat frame (op=1) carrying a millisecond timestamp
    #[must_use]
    pub fn heartbeat(now_ms: i64) -> Self {
        Self {
            op: OpCode::Heartbeat,
            t: None,
            s: None,
            d: Some(Value::Number(now_ms.into())),
        }
    }

    /// Deserialize the data payload into a typed event struct
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.d.clone().unwrap_or(Value::Null))
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(t) = &self.t {
            write!(f, "GatewayMessage(op={}, t={}", self.op, t)?;
            if let Some(s) = self.s {
                write!(f, ", s={s}")?;
            }
            write!(f, ")")
        } else {
            write!(f, "GatewayMessage(op={})", self.op)
        }
    }
}

/// Identify payload sent as the first client frame after the socket opens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyPayload {
    /// Session token obtained from the login endpoint
    pub token: String,

    /// Protocol version
    pub v: u8,

    /// Whether the client accepts compressed dispatch payloads
    pub compress: bool,

    /// Client identification properties
    pub properties: ClientProperties,
}

impl IdentifyPayload {
    #[must_use]
    pub fn new(token: impl Into<String>, version: u8, compress: bool, client_name: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            v: version,
            compress,
            properties: ClientProperties {
                os: std::env::consts::OS.to_string(),
                client: client_name.into(),
            },
        }
    }
}

/// Client identification properties carried in the Identify payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientProperties {
    pub os: String,
    pub client: String,
}
