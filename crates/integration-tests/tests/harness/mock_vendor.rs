//! Mock vendor backend for integration tests
//!
//! Serves every dialect endpoint from one router with canned responses,
//! failure injection and request recording, so engine behavior can be
//! asserted end-to-end without network access.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use bytes::Bytes;
use futures_util::StreamExt;
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;

use chorus_config::{Config, VendorSettings, VendorsConfig};

/// Mock vendor server returning predictable responses
pub struct MockVendor {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    request_count: AtomicU32,
    /// Requests to fail with 503 before succeeding (0 = never fail)
    fail_count: AtomicU32,
    /// Recorded request bodies, in arrival order
    bodies: Mutex<Vec<serde_json::Value>>,
    /// Canned SSE payload for streaming endpoints
    sse_body: Option<String>,
    /// Canned JSON payload for non-streaming endpoints
    json_body: Option<serde_json::Value>,
    /// Send one SSE chunk then hang until the connection drops
    stall_after_first_chunk: bool,
}

/// Configures a [`MockVendor`] before starting it
#[derive(Default)]
pub struct MockVendorBuilder {
    fail_count: u32,
    sse_body: Option<String>,
    json_body: Option<serde_json::Value>,
    stall_after_first_chunk: bool,
}

impl MockVendorBuilder {
    /// Fail the first `n` requests with 503
    #[must_use]
    pub fn fail_first(mut self, n: u32) -> Self {
        self.fail_count = n;
        self
    }

    /// Serve this SSE payload from streaming endpoints
    #[must_use]
    pub fn sse(mut self, body: impl Into<String>) -> Self {
        self.sse_body = Some(body.into());
        self
    }

    /// Serve this JSON payload from non-streaming endpoints
    #[must_use]
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.json_body = Some(body);
        self
    }

    /// Send one chunk then stall until the client goes away
    #[must_use]
    pub fn stall(mut self) -> Self {
        self.stall_after_first_chunk = true;
        self
    }

    /// Bind and serve on an ephemeral port
    pub async fn start(self) -> anyhow::Result<MockVendor> {
        let state = Arc::new(MockState {
            request_count: AtomicU32::new(0),
            fail_count: AtomicU32::new(self.fail_count),
            bodies: Mutex::new(Vec::new()),
            sse_body: self.sse_body,
            json_body: self.json_body,
            stall_after_first_chunk: self.stall_after_first_chunk,
        });

        let app = Router::new()
            .route("/v1/responses", routing::post(handle))
            .route("/v1/messages", routing::post(handle))
            .route("/v1/chat/completions", routing::post(handle))
            .route("/v1beta/models/{model_call}", routing::post(handle))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(MockVendor { addr, shutdown, state })
    }
}

impl MockVendor {
    /// Builder for a configured mock
    pub fn builder() -> MockVendorBuilder {
        MockVendorBuilder::default()
    }

    /// Base URL with the `/v1` prefix used by most dialects
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Base URL with the Gemini `/v1beta` prefix
    pub fn gemini_base_url(&self) -> String {
        format!("http://{}/v1beta", self.addr)
    }

    /// Total requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// Request body at `index`, as recorded
    pub fn body(&self, index: usize) -> Option<serde_json::Value> {
        self.state.bodies.lock().unwrap().get(index).cloned()
    }

    /// Engine configuration pointing every vendor at this mock
    pub fn config(&self) -> Config {
        let settings = |base: &str| VendorSettings {
            api_key: Some(SecretString::from("sk-mock")),
            base_url: Some(url::Url::parse(base).unwrap()),
            ..VendorSettings::default()
        };

        Config {
            vendors: VendorsConfig {
                openai: Some(settings(&self.base_url())),
                anthropic: Some(settings(&self.base_url())),
                gemini: Some(settings(&self.gemini_base_url())),
                grok: Some(settings(&self.base_url())),
                openrouter: Some(settings(&self.base_url())),
            },
            transport: chorus_config::TransportConfig::default(),
        }
    }
}

impl Drop for MockVendor {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle(State(state): State<Arc<MockState>>, Json(body): Json<serde_json::Value>) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    let requested_stream = body.get("stream").and_then(serde_json::Value::as_bool).unwrap_or(false);
    state.bodies.lock().unwrap().push(body);

    // Failure injection: 503 until the counter drains
    let remaining = state.fail_count.load(Ordering::Relaxed);
    if remaining > 0 {
        state.fail_count.store(remaining - 1, Ordering::Relaxed);
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({"error": {"message": "mock overloaded", "type": "overloaded"}})),
        )
            .into_response();
    }

    if state.stall_after_first_chunk {
        let first = Bytes::from_static(b"data: {\"stalling\":true}\n\n");
        let chunks = futures_util::stream::once(async move { Ok::<_, std::convert::Infallible>(first) })
            .chain(futures_util::stream::pending::<Result<Bytes, std::convert::Infallible>>());
        return Response::builder()
            .header(header::CONTENT_TYPE, "text/event-stream")
            .body(axum::body::Body::from_stream(chunks))
            .unwrap();
    }

    // Streaming requests declare themselves in the body (Gemini selects by
    // endpoint instead, so a mock configured with only an SSE payload serves
    // it unconditionally)
    let wants_stream = requested_stream || state.json_body.is_none();
    if wants_stream && let Some(sse) = &state.sse_body {
        return Response::builder()
            .header(header::CONTENT_TYPE, "text/event-stream")
            .body(axum::body::Body::from(sse.clone()))
            .unwrap();
    }

    if let Some(json) = &state.json_body {
        return Json(json.clone()).into_response();
    }

    // No canned response: reject as a malformed request so tests exercising
    // non-retryable statuses need no extra setup
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": {"message": "mock has no canned response", "type": "invalid_request_error"}})),
    )
        .into_response()
}
