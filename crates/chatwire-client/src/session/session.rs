//! Session - one authenticated client with at most one live push connection
//!
//! Owns the mirror, the state machine, the notification channel, and both
//! transports. Commands live in `crate::commands` as impl blocks; this module
//! holds construction and the push wiring shared by the login flow.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use chatwire_cache::StateMirror;
use chatwire_common::{ClientConfig, ClientError, ClientResult};
use chatwire_core::{Notification, Snowflake};
use chatwire_gateway::connection::{
    ConnectionState, PushHandle, PushInbound, PushTransport, StateHandle, WebSocketTransport,
};
use chatwire_gateway::dispatch::Dispatcher;
use chatwire_gateway::protocol::{GatewayMessage, IdentifyPayload};

use crate::rest::{Endpoints, HttpTransport, Method, RestTransport};

/// One authenticated client session
pub struct Session {
    pub(crate) config: ClientConfig,
    pub(crate) mirror: Arc<StateMirror>,
    pub(crate) state: StateHandle,
    pub(crate) notifier: broadcast::Sender<Notification>,
    pub(crate) rest: Arc<dyn RestTransport>,
    pub(crate) push: Arc<dyn PushTransport>,
    pub(crate) token: RwLock<Option<String>>,
    pub(crate) dispatcher: RwLock<Option<Arc<Dispatcher>>>,
    pub(crate) read_task: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    /// Create a session with the default HTTP and WebSocket transports
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let rest = Arc::new(HttpTransport::new(config.api_base.clone()));
        Self::with_transports(config, rest, Arc::new(WebSocketTransport::new()))
    }

    /// Create a session with explicit transports
    #[must_use]
    pub fn with_transports(
        config: ClientConfig,
        rest: Arc<dyn RestTransport>,
        push: Arc<dyn PushTransport>,
    ) -> Self {
        let (notifier, _) = broadcast::channel(config.notification_buffer);
        Self {
            config,
            mirror: Arc::new(StateMirror::new()),
            state: StateHandle::new(),
            notifier,
            rest,
            push,
            token: RwLock::new(None),
            dispatcher: RwLock::new(None),
            read_task: Mutex::new(None),
        }
    }

    /// Subscribe to session notifications
    ///
    /// Each receiver sees every notification emitted after it subscribed.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifier.subscribe()
    }

    /// The session's state mirror
    #[must_use]
    pub fn mirror(&self) -> &StateMirror {
        &self.mirror
    }

    /// The current lifecycle state
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state.current()
    }

    /// The authenticated user's identity, known after READY
    #[must_use]
    pub fn self_id(&self) -> Option<Snowflake> {
        self.dispatcher.read().as_ref().and_then(|d| d.self_id())
    }

    /// Get the held token after gating on session state
    pub(crate) fn auth(&self) -> ClientResult<String> {
        self.state.require_command_ready()?;
        self.token.read().clone().ok_or(ClientError::NotAuthenticated)
    }

    /// Discover the push URL, open the socket, identify, and start dispatch
    pub(crate) async fn connect_push(&self, token: &str) -> ClientResult<()> {
        let response = self
            .rest
            .request(Method::Get, Endpoints::gateway(), Some(token), None)
            .await?;
        let url = response
            .get("url")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ClientError::Protocol("gateway response missing url".to_string()))?
            .to_string();

        let PushHandle { outbound, mut inbound } = self.push.open(&url).await?;

        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&self.mirror),
            self.state.clone(),
            self.notifier.clone(),
            outbound.clone(),
            self.config.typing_quiet_ms,
        ));
        *self.dispatcher.write() = Some(Arc::clone(&dispatcher));

        let identify = GatewayMessage::identify(&IdentifyPayload::new(
            token,
            self.config.protocol_version,
            self.config.compress,
            self.config.client_name.clone(),
        ));
        let frame = identify
            .to_json()
            .map_err(|err| ClientError::Protocol(format!("failed to encode identify: {err}")))?;
        outbound
            .send(frame)
            .await
            .map_err(|_| ClientError::Gateway("push connection closed before identify".to_string()))?;

        // The single read loop: each frame fully applied before the next
        let read_task = tokio::spawn(async move {
            while let Some(item) = inbound.recv().await {
                match item {
                    PushInbound::Frame(raw) => dispatcher.handle_frame(&raw),
                    PushInbound::Closed => break,
                }
            }
            dispatcher.disconnect();
        });
        *self.read_task.lock() = Some(read_task);

        Ok(())
    }

    /// Drop credentials and tear down the push connection
    ///
    /// Emits the disconnected notification when a dispatcher was live.
    pub(crate) fn teardown(&self) {
        *self.token.write() = None;
        if let Some(task) = self.read_task.lock().take() {
            task.abort();
        }
        let dispatcher = self.dispatcher.read().clone();
        if let Some(dispatcher) = dispatcher {
            dispatcher.disconnect();
        } else {
            self.state.mark_disconnected();
        }
    }
}
