//! Shared test doubles for the command layer
//!
//! `MockRest` records every call and replays queued responses; `MockPush`
//! captures outbound frames and feeds queued inbound frames to the read loop.
//! Both stand in for the real transports via `Session::with_transports`.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use chatwire_common::{ClientConfig, ClientError, ClientResult};
use chatwire_gateway::connection::{ConnectionState, PushHandle, PushInbound, PushTransport};

use crate::rest::{Method, RestTransport};
use crate::session::Session;

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
            // Unqueued calls succeed with an empty body
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

/// Push transport double
///
/// Frames queued before `open` arrive as soon as the read loop starts. The
/// inbound sender is held so the loop stays alive until teardown.
pub struct MockPush {
    pub sent: Arc<Mutex<Vec<String>>>,
    frames: Mutex<Vec<String>>,
    held: Mutex<Vec<mpsc::Sender<PushInbound>>>,
}

impl MockPush {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            frames: Mutex::new(Vec::new()),
            held: Mutex::new(Vec::new()),
        })
    }

    /// Queue a frame for delivery on the next `open`
    pub fn queue_frame(&self, frame: String) {
        self.frames.lock().push(frame);
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

        for frame in self.frames.lock().drain(..) {
            let _ = in_tx.try_send(PushInbound::Frame(frame));
        }
        self.held.lock().push(in_tx);

        Ok(PushHandle {
            outbound: out_tx,
            inbound: in_rx,
        })
    }
}

/// A session wired to the given mocks
pub fn session_with(rest: Arc<MockRest>, push: Arc<MockPush>) -> Session {
    let config = ClientConfig::with_api_base("http://test");
    Session::with_transports(config, rest, push)
}

/// A READY frame with one server, one direct conversation, and self user 99
pub fn ready_frame() -> String {
    json!({
        "op": 0,
        "t": "READY",
        "s": 1,
        "d": {
            "heartbeat_interval": 45_000,
            "user": {"id": "99", "username": "me"},
            "guilds": [{
                "id": "1",
                "name": "Test",
                "region": "london",
                "owner_id": "5",
                "channels": [{"id": "10", "name": "general", "type": "text"}],
                "roles": [{"id": "20", "name": "everyone"}],
                "members": [{"user": {"id": "5", "username": "owner"}, "roles": ["20"]}]
            }],
            "private_channels": [
                {"id": "30", "recipient": {"id": "7", "username": "carol"}}
            ]
        }
    })
    .to_string()
}

/// Block until the read loop has applied READY
pub async fn wait_until_live(session: &Session) {
    for _ in 0..200 {
        if session.state() == ConnectionState::Live {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("session never reached the live state");
}

/// A fully logged-in session backed by mocks, READY already applied
pub async fn logged_in_session() -> (Session, Arc<MockRest>, Arc<MockPush>) {
    let rest = MockRest::new();
    let push = MockPush::new();
    rest.respond(json!({"token": "tok"}));
    rest.respond(json!({"url": "ws://push"}));
    push.queue_frame(ready_frame());

    let session = session_with(rest.clone(), push.clone());
    session
        .login("test@example.com", "password")
        .await
        .expect("login");
    wait_until_live(&session).await;

    (session, rest, push)
}
