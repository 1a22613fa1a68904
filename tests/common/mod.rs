//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    Router,
};
use receive_forwarder::config::{ForwarderConfig, TenantTokenConfig};
use receive_forwarder::{HttpServer, Shutdown};
use futures_util::StreamExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

pub const TOKEN_A: &str = "token-a";
pub const TENANT_A: &str = "team-a";

/// A request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub tenant: Option<String>,
    pub body: Bytes,
}

/// Programmable upstream that records every request it receives.
#[derive(Clone)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<Captured>>>,
    status: Arc<AtomicU16>,
    delay_ms: Arc<AtomicU64>,
    aborted: Arc<AtomicUsize>,
}

impl MockUpstream {
    pub fn url(&self) -> String {
        format!("http://{}/api/v1/receive", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.captured.lock().unwrap().len()
    }

    pub fn captured(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }

    /// Requests whose handler was dropped before it answered.
    pub fn aborted(&self) -> usize {
        self.aborted.load(Ordering::SeqCst)
    }

    pub fn set_status(&self, status: u16) {
        self.status.store(status, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

async fn capture(
    State(upstream): State<MockUpstream>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let tenant = headers
        .get("thanos-tenant")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    upstream
        .captured
        .lock()
        .unwrap()
        .push(Captured { method, tenant, body });

    let mut in_flight = InFlight {
        aborted: upstream.aborted.clone(),
        answered: false,
    };

    let delay = upstream.delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    in_flight.answered = true;
    let status = StatusCode::from_u16(upstream.status.load(Ordering::SeqCst)).unwrap();
    (status, "upstream says hello")
}

/// Counts handler futures dropped before they produced a response.
struct InFlight {
    aborted: Arc<AtomicUsize>,
    answered: bool,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.answered {
            self.aborted.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Start a mock upstream answering every request with `status`.
pub async fn start_mock_upstream(status: u16) -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let upstream = MockUpstream {
        addr: listener.local_addr().unwrap(),
        captured: Arc::new(Mutex::new(Vec::new())),
        status: Arc::new(AtomicU16::new(status)),
        delay_ms: Arc::new(AtomicU64::new(0)),
        aborted: Arc::new(AtomicUsize::new(0)),
    };

    let app = Router::new().fallback(capture).with_state(upstream.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    upstream
}

async fn relay_chunks(State(chunks): State<mpsc::UnboundedSender<Bytes>>, body: Body) -> StatusCode {
    let mut stream = body.into_data_stream();
    while let Some(Ok(chunk)) = stream.next().await {
        let _ = chunks.send(chunk);
    }
    StatusCode::NO_CONTENT
}

/// Start an upstream that reports each body chunk the moment it arrives.
pub async fn start_streaming_upstream() -> (SocketAddr, mpsc::UnboundedReceiver<Bytes>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    let app = Router::new().fallback(relay_chunks).with_state(tx);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, rx)
}

/// An address nothing is listening on.
pub fn unreachable_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// Config forwarding to `forward_url` with a single known tenant token.
pub fn config(forward_url: &str) -> ForwarderConfig {
    let mut config = ForwarderConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.forward.url = forward_url.into();
    config.tenants.push(TenantTokenConfig {
        token: TOKEN_A.into(),
        tenant: TENANT_A.into(),
    });
    config
}

/// Start the forwarder on an ephemeral port.
pub async fn start_server(config: ForwarderConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let signal = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
