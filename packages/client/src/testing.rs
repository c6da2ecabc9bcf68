// Mock implementations for testing
//
// Scripted stand-ins for the infra traits, injectable wherever the real
// backend/transport/store would go. Each records the calls it receives so
// tests can assert on traffic, not just outcomes.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::http::{BaseHttpBackend, HttpRequest, HttpResponse};
use crate::realtime::protocol::{ClientEvent, ServerEvent};
use crate::realtime::transport::{BaseSocketTransport, SocketPair, SocketSink, SocketStream};
use crate::storage::BaseTokenStore;
use crate::types::{Role, TokenPair, User};

/// A plausible user for tests.
pub fn user_fixture(role: Role) -> User {
    User {
        id: Uuid::new_v4(),
        email: "ada@example.org".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        role,
        blood_type: Some(crate::types::BloodType::ONegative),
        phone: Some("+15551234567".to_string()),
        city: Some("Minneapolis".to_string()),
        email_verified: true,
        phone_verified: true,
        medical_verified: true,
        created_at: Utc::now(),
    }
}

// =============================================================================
// Mock Token Store
// =============================================================================

pub struct MemoryTokenStore {
    inner: Mutex<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Pre-populate the store, as if a previous run had persisted a pair.
    pub fn seed(&self, tokens: TokenPair) {
        *self.inner.lock().unwrap() = Some(tokens);
    }

    /// What the store currently holds.
    pub fn stored(&self) -> Option<TokenPair> {
        self.inner.lock().unwrap().clone()
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseTokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<TokenPair>> {
        Ok(self.inner.lock().unwrap().clone())
    }

    async fn save(&self, tokens: &TokenPair) -> Result<()> {
        *self.inner.lock().unwrap() = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.inner.lock().unwrap() = None;
        Ok(())
    }
}

// =============================================================================
// Mock HTTP Backend
// =============================================================================

/// A request as the mock saw it.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
struct MockResponse {
    status: u16,
    body: Value,
    delay: Option<Duration>,
}

/// Scripted HTTP backend. Responses are keyed by method plus path suffix
/// and consumed in order; a repeated response serves as the fallback once
/// the queue for its key is empty. Unscripted requests get a 404.
#[derive(Clone)]
pub struct MockHttpBackend {
    queues: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    repeated: Arc<Mutex<HashMap<String, MockResponse>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockHttpBackend {
    pub fn new() -> Self {
        Self {
            queues: Arc::new(Mutex::new(HashMap::new())),
            repeated: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn key(method: &str, path: &str) -> String {
        format!("{} {}", method, path)
    }

    /// Queue one response for `method` + `path`.
    pub fn with_response(self, method: &str, path: &str, status: u16, body: Value) -> Self {
        self.queues
            .lock()
            .unwrap()
            .entry(Self::key(method, path))
            .or_default()
            .push_back(MockResponse {
                status,
                body,
                delay: None,
            });
        self
    }

    /// Queue a response that is held back for `delay` before returning.
    pub fn with_delayed_response(
        self,
        method: &str,
        path: &str,
        status: u16,
        body: Value,
        delay: Duration,
    ) -> Self {
        self.queues
            .lock()
            .unwrap()
            .entry(Self::key(method, path))
            .or_default()
            .push_back(MockResponse {
                status,
                body,
                delay: Some(delay),
            });
        self
    }

    /// Serve the same response every time the key is requested.
    pub fn with_repeated_response(self, method: &str, path: &str, status: u16, body: Value) -> Self {
        self.repeated.lock().unwrap().insert(
            Self::key(method, path),
            MockResponse {
                status,
                body,
                delay: None,
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// How many recorded calls match `method` + `path` suffix.
    pub fn count_calls(&self, method: &str, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.method == method && c.url.ends_with(path))
            .count()
    }

    fn next_response(&self, method: &str, url: &str) -> Option<MockResponse> {
        let mut queues = self.queues.lock().unwrap();
        for (key, queue) in queues.iter_mut() {
            let (m, path) = key.split_once(' ').unwrap_or(("", ""));
            if m == method && url.ends_with(path) {
                if let Some(response) = queue.pop_front() {
                    return Some(response);
                }
            }
        }
        drop(queues);

        let repeated = self.repeated.lock().unwrap();
        for (key, response) in repeated.iter() {
            let (m, path) = key.split_once(' ').unwrap_or(("", ""));
            if m == method && url.ends_with(path) {
                return Some(response.clone());
            }
        }
        None
    }
}

impl Default for MockHttpBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseHttpBackend for MockHttpBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, crate::error::ApiError> {
        let method = request.method.as_str().to_string();
        self.calls.lock().unwrap().push(RecordedCall {
            method: method.clone(),
            url: request.url.clone(),
            bearer: request.bearer.clone(),
            body: request.body.clone(),
        });

        match self.next_response(&method, &request.url) {
            Some(response) => {
                if let Some(delay) = response.delay {
                    tokio::time::sleep(delay).await;
                }
                Ok(HttpResponse {
                    status: response.status,
                    body: response.body,
                })
            }
            None => Ok(HttpResponse {
                status: 404,
                body: Value::Null,
            }),
        }
    }
}

// =============================================================================
// Mock Socket Transport
// =============================================================================

/// Scripted socket transport. Each successful connect yields a channel-
/// backed connection; [`MockSocketTransport::push`] feeds server events
/// into the most recent one, and every client emit is recorded.
#[derive(Clone)]
pub struct MockSocketTransport {
    fail_all: Arc<AtomicBool>,
    fail_next: Arc<AtomicU32>,
    connects: Arc<AtomicU32>,
    sent: Arc<Mutex<Vec<ClientEvent>>>,
    server_tx: Arc<Mutex<Option<mpsc::UnboundedSender<ServerEvent>>>>,
}

impl MockSocketTransport {
    pub fn new() -> Self {
        Self {
            fail_all: Arc::new(AtomicBool::new(false)),
            fail_next: Arc::new(AtomicU32::new(0)),
            connects: Arc::new(AtomicU32::new(0)),
            sent: Arc::new(Mutex::new(Vec::new())),
            server_tx: Arc::new(Mutex::new(None)),
        }
    }

    /// A transport where every handshake is refused.
    pub fn failing() -> Self {
        let transport = Self::new();
        transport.fail_all.store(true, Ordering::SeqCst);
        transport
    }

    /// Refuse the next `n` handshakes, then succeed.
    pub fn fail_next_connects(&self, n: u32) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    pub fn connect_count(&self) -> u32 {
        self.connects.load(Ordering::SeqCst)
    }

    /// Everything the client emitted across all connections.
    pub fn sent_events(&self) -> Vec<ClientEvent> {
        self.sent.lock().unwrap().clone()
    }

    /// Push a server event into the live connection. Silently dropped when
    /// nothing is connected, like a real server push would be.
    pub fn push(&self, event: ServerEvent) {
        if let Some(tx) = self.server_tx.lock().unwrap().as_ref() {
            let _ = tx.send(event);
        }
    }

    /// Sever the live connection; the client observes a closed stream.
    pub fn drop_connection(&self) {
        *self.server_tx.lock().unwrap() = None;
    }
}

impl Default for MockSocketTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseSocketTransport for MockSocketTransport {
    async fn connect(&self, _url: &str, _token: &str) -> Result<SocketPair> {
        self.connects.fetch_add(1, Ordering::SeqCst);

        if self.fail_all.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        let remaining = self.fail_next.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_next.store(remaining - 1, Ordering::SeqCst);
            anyhow::bail!("connection refused");
        }

        let (tx, rx) = mpsc::unbounded_channel();
        *self.server_tx.lock().unwrap() = Some(tx);

        Ok(SocketPair {
            sink: Box::new(MockSink {
                sent: self.sent.clone(),
            }),
            stream: Box::new(MockStream { rx }),
        })
    }
}

struct MockSink {
    sent: Arc<Mutex<Vec<ClientEvent>>>,
}

#[async_trait]
impl SocketSink for MockSink {
    async fn send(&mut self, event: &ClientEvent) -> Result<()> {
        self.sent.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

struct MockStream {
    rx: mpsc::UnboundedReceiver<ServerEvent>,
}

#[async_trait]
impl SocketStream for MockStream {
    async fn next_event(&mut self) -> Option<Result<ServerEvent>> {
        self.rx.recv().await.map(Ok)
    }
}
