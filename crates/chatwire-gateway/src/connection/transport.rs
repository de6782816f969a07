//! Push transport boundary
//!
//! The session only sees a pair of channels: outbound frames to write and
//! inbound frames to dispatch. The WebSocket details (handshake, pumps,
//! binary decoding) stay behind the trait, and tests substitute a mock.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use chatwire_common::{ClientError, ClientResult};

/// Inbound items delivered by a push connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushInbound {
    /// A complete text frame
    Frame(String),
    /// The connection closed; no further frames will arrive
    Closed,
}

/// An open push connection as seen by the session
#[derive(Debug)]
pub struct PushHandle {
    /// Frames to write to the remote end
    pub outbound: mpsc::Sender<String>,
    /// Frames read from the remote end, terminated by `Closed`
    pub inbound: mpsc::Receiver<PushInbound>,
}

/// Opens push connections
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Open a connection to the given gateway URL
    async fn open(&self, url: &str) -> ClientResult<PushHandle>;
}

/// Default transport over tokio-tungstenite
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketTransport;

impl WebSocketTransport {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PushTransport for WebSocketTransport {
    async fn open(&self, url: &str) -> ClientResult<PushHandle> {
        let (stream, _) = connect_async(url)
            .await
            .map_err(|err| ClientError::Gateway(format!("handshake with {url} failed: {err}")))?;

        tracing::info!(%url, "Push connection open");

        let (mut sink, mut source) = stream.split();
        let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(64);
        let (inbound_tx, inbound_rx) = mpsc::channel::<PushInbound>(256);

        // Write pump: outbound channel to socket
        tokio::spawn(async move {
            while let Some(frame) = outbound_rx.recv().await {
                if let Err(err) = sink.send(WsMessage::Text(frame)).await {
                    tracing::warn!(error = %err, "Push write failed, stopping write pump");
                    break;
                }
            }
            let _ = sink.close().await;
        });

        // Read pump: socket to inbound channel, Closed as the last item
        tokio::spawn(async move {
            while let Some(item) = source.next().await {
                let forwarded = match item {
                    Ok(WsMessage::Text(text)) => inbound_tx.send(PushInbound::Frame(text)).await,
                    Ok(WsMessage::Binary(bytes)) => match String::from_utf8(bytes) {
                        Ok(text) => inbound_tx.send(PushInbound::Frame(text)).await,
                        Err(err) => {
                            tracing::warn!(error = %err, "Dropping undecodable binary frame");
                            Ok(())
                        }
                    },
                    Ok(WsMessage::Close(_)) => break,
                    Ok(_) => Ok(()),
                    Err(err) => {
                        tracing::warn!(error = %err, "Push read failed");
                        break;
                    }
                };
                if forwarded.is_err() {
                    // Session dropped its receiver
                    return;
                }
            }
            let _ = inbound_tx.send(PushInbound::Closed).await;
            tracing::info!("Push connection closed");
        });

        Ok(PushHandle {
            outbound: outbound_tx,
            inbound: inbound_rx,
        })
    }
}
