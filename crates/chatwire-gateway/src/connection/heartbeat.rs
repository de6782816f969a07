//! Heartbeat task
//!
//! A single interval task per live connection, writing heartbeat frames at
//! the interval the READY payload dictated. The task ends when the outbound
//! channel closes or the session aborts its handle.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::protocol::GatewayMessage;

/// Spawn the heartbeat interval task
///
/// The first beat is sent immediately, then one per interval.
pub fn spawn_heartbeat(interval_ms: u64, outbound: mpsc::Sender<String>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
        loop {
            interval.tick().await;

            let frame = match GatewayMessage::heartbeat(Utc::now().timestamp_millis()).to_json() {
                Ok(json) => json,
                Err(err) => {
                    tracing::warn!(error = %err, "Failed to encode heartbeat frame");
                    continue;
                }
            };

            tracing::trace!(interval_ms, "Sending heartbeat");
            if outbound.send(frame).await.is_err() {
                tracing::debug!("Outbound channel closed, stopping heartbeat");
                break;
            }
        }
    })
}
