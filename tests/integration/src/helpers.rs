//! Test helpers for integration tests
//!
//! Provides mock REST and push transports plus a harness that brings a
//! session to the live state and injects frames as if a server pushed them.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::{broadcast, mpsc};

use chatwire_client::{Method, RestTransport, Session};
use chatwire_common::{ClientConfig, ClientError, ClientResult};
use chatwire_core::Notification;
use chatwire_gateway::connection::{ConnectionState, PushHandle, PushInbound, PushTransport};

use crate::fixtures;

/// One recorded REST call
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// Recording REST transport with queued responses
pub struct MockRest {
    responses: Mutex<VecDeque<Result<Value, (Option<u16>, String)>>>,
    pub calls: Mutex<Vec<RecordedCall>>,
}

impl MockRest {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Queue a successful response
    pub fn respond(&self, value: Value) {
        self.responses.lock().push_back(Ok(value));
    }

    /// Queue a transport failure
    pub fn fail(&self, status: u16, message: &str) {
        self.responses
            .lock()
            .push_back(Err((Some(status), message.to_string())));
    }

    fn next(&self) -> ClientResult<Value> {
        match self.responses.lock().pop_front() {
            Some(Ok(value)) => Ok(value),
            Some(Err((status, message))) => Err(ClientError::transport(status, message)),
            None => Ok(Value::Null),
        }
    }
}

#[async_trait]
impl RestTransport for MockRest {
    async fn request(
        &self,
        method: Method,
        path: &str,
        _token: Option<&str>,
        body: Option<Value>,
    ) -> ClientResult<Value> {
        self.calls.lock().push(RecordedCall {
            method,
            path: path.to_string(),
            body,
        });
        self.next()
    }

    async fn upload(
        &self,
        path: &str,
        _token: Option<&str>,
        filename: &str,
        _bytes: Vec<u8>,
    ) -> ClientResult<Value> {
        self.calls.lock().push(RecordedCall {
            method: Method::Post,
            path: path.to_string(),
            body: Some(json!({"filename": filename})),
        });
        self.next()
    }
}

/// Push transport double that can inject frames after the socket opens
pub struct MockPush {
    pub sent: Arc<Mutex<Vec<String>>>,
    queued: Mutex<Vec<String>>,
    senders: Mutex<Vec<mpsc::Sender<PushInbound>>>,
}

impl MockPush {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            queued: Mutex::new(Vec::new()),
            senders: Mutex::new(Vec::new()),
        })
    }

    /// Queue a frame for delivery as soon as the socket opens
    pub fn queue_frame(&self, frame: String) {
        self.queued.lock().push(frame);
    }

    /// Inject a frame into the live read loop
    pub fn push_frame(&self, frame: String) {
        let senders = self.senders.lock();
        let sender = senders.last().expect("push connection not open");
        sender.try_send(PushInbound::Frame(frame)).expect("read loop gone");
    }

    /// Simulate the server closing the connection
    pub fn close(&self) {
        let senders = self.senders.lock();
        if let Some(sender) = senders.last() {
            let _ = sender.try_send(PushInbound::Closed);
        }
    }
}

#[async_trait]
impl PushTransport for MockPush {
    async fn open(&self, _url: &str) -> ClientResult<PushHandle> {
        let (out_tx, mut out_rx) = mpsc::channel::<String>(64);
        let (in_tx, in_rx) = mpsc::channel::<PushInbound>(64);

        let sent = Arc::clone(&self.sent);
        tokio::spawn(async move {
            while let Some(frame) = out_rx.recv().await {
                sent.lock().push(frame);
            }
        });

        for frame in self.queued.lock().drain(..) {
            let _ = in_tx.try_send(PushInbound::Frame(frame));
        }
        self.senders.lock().push(in_tx);

        Ok(PushHandle {
            outbound: out_tx,
            inbound: in_rx,
        })
    }
}

/// A session wired to mocks, logged in, with READY applied
pub struct TestClient {
    pub session: Session,
    pub rest: Arc<MockRest>,
    pub push: Arc<MockPush>,
}

impl TestClient {
    /// Log in against the mocks and wait for the live state
    pub async fn start() -> Result<Self> {
        Self::start_with_config(ClientConfig::with_api_base("http://test")).await
    }

    /// Start with a custom config
    pub async fn start_with_config(config: ClientConfig) -> Result<Self> {
        let rest = MockRest::new();
        let push = MockPush::new();
        rest.respond(json!({"token": "tok"}));
        rest.respond(json!({"url": "ws://push"}));
        push.queue_frame(fixtures::ready_frame());

        let session = Session::with_transports(config, rest.clone(), push.clone());
        session.login("test@example.com", "password").await?;
        wait_until_live(&session).await;

        Ok(Self {
            session,
            rest,
            push,
        })
    }
}

/// Block until the read loop has applied READY
pub async fn wait_until_live(session: &Session) {
    for _ in 0..200 {
        if session.state() == ConnectionState::Live {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("session never reached the live state");
}

/// Receive notifications until one matches, skipping diagnostics and raw frames
pub async fn expect_notification<F>(
    rx: &mut broadcast::Receiver<Notification>,
    mut matches: F,
) -> Notification
where
    F: FnMut(&Notification) -> bool,
{
    let deadline = tokio::time::Duration::from_secs(2);
    loop {
        let notification = tokio::time::timeout(deadline, rx.recv())
            .await
            .expect("timed out waiting for notification")
            .expect("notification channel closed");
        if matches(&notification) {
            return notification;
        }
    }
}
