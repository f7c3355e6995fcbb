//! Public entry points
//!
//! One network call is in flight per logical conversation turn. Nothing is
//! cached between turns: the [`ContinuationState`] handed back to the caller
//! is the only state that crosses turn boundaries, and the caller owns it.

use std::sync::Arc;

use http::HeaderMap;
use http::header::{AUTHORIZATION, HeaderName, HeaderValue};
use secrecy::ExposeSecret;
use tokio_util::sync::CancellationToken;

use chorus_config::{Config, VendorSettings};

use crate::continuation;
use crate::convert;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::Error;
use crate::sse;
use crate::transport::{ChunkSink, PreparedRequest, Transport, TransportOptions};
use crate::types::{ChatRequest, ChatResponse, ContinuationState, ToolResult};
use crate::vendor::Vendor;

/// Anthropic API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Engine client over all supported vendors
pub struct Client {
    config: Config,
    transport: Transport,
    diagnostics: Arc<dyn Diagnostics>,
}

impl Client {
    /// Create a client from configuration
    pub fn new(config: Config) -> Self {
        let options = TransportOptions {
            max_retries: config.transport.max_retries,
            request_timeout: std::time::Duration::from_secs(config.transport.request_timeout_secs),
            stream_timeout: std::time::Duration::from_secs(config.transport.stream_timeout_secs),
            ..TransportOptions::default()
        };
        Self {
            config,
            transport: Transport::new(options),
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    /// Replace the diagnostics sink
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Override transport options (retries, timeouts, backoff)
    #[must_use]
    pub fn with_transport_options(mut self, options: TransportOptions) -> Self {
        self.transport = Transport::new(options);
        self
    }

    /// Single non-streaming call
    ///
    /// # Errors
    ///
    /// See [`Error`]; transient transport failures are retried internally.
    pub async fn request(&self, vendor: Vendor, request: &ChatRequest) -> Result<ChatResponse, Error> {
        validate(request)?;

        let mut request = request.clone();
        request.stream = false;

        let prepared = self.prepare(vendor, &request)?;
        let body = self
            .transport
            .send(vendor, &prepared, None, &CancellationToken::new())
            .await?;

        convert::decode(vendor, &body)
    }

    /// Streaming call: raw vendor bytes flow to `sink` as they arrive, and
    /// the decoded canonical response is returned at completion
    ///
    /// # Errors
    ///
    /// See [`Error`]; a failure after bytes reached the sink surfaces as
    /// [`Error::StreamInterrupted`].
    pub async fn stream_request(
        &self,
        vendor: Vendor,
        request: &ChatRequest,
        sink: &mut ChunkSink<'_>,
    ) -> Result<ChatResponse, Error> {
        self.stream_request_with_cancel(vendor, request, sink, &CancellationToken::new())
            .await
    }

    /// Streaming call with caller-controlled cancellation
    ///
    /// # Errors
    ///
    /// As [`stream_request`](Self::stream_request), plus [`Error::Cancelled`]
    /// when the token fires before completion.
    pub async fn stream_request_with_cancel(
        &self,
        vendor: Vendor,
        request: &ChatRequest,
        sink: &mut ChunkSink<'_>,
        cancel: &CancellationToken,
    ) -> Result<ChatResponse, Error> {
        validate(request)?;

        let mut request = request.clone();
        request.stream = true;

        let prepared = self.prepare(vendor, &request)?;
        let bytes = self.transport.send(vendor, &prepared, Some(sink), cancel).await?;

        // Conclusive re-parse over the accumulated stream: the live sink saw
        // raw bytes, the canonical response comes from the full sequence
        let events = sse::parse_all(&bytes);
        for event in &events {
            if !event.is_done() && event.json::<serde_json::Value>().is_err() {
                self.diagnostics.decode_error(vendor, &event.data);
            }
        }

        let outcome = convert::collect_stream(vendor, &events)?;
        for warning in &outcome.warnings {
            self.diagnostics.extraction_warning(vendor, warning);
        }

        Ok(outcome.response)
    }

    /// Derive the continuation state after a completed turn
    pub fn after_turn(vendor: Vendor, request: &ChatRequest, response: &ChatResponse) -> ContinuationState {
        continuation::after_turn(vendor, request, response)
    }

    /// Build the next-turn request from prior state and tool results
    ///
    /// # Errors
    ///
    /// See [`continuation::continue_with_tool_results`].
    pub fn continue_with_tool_results(
        state: &ContinuationState,
        results: &[ToolResult],
    ) -> Result<ChatRequest, Error> {
        continuation::continue_with_tool_results(state, results)
    }

    /// Encode, resolve endpoint and build headers for one call
    fn prepare(&self, vendor: Vendor, request: &ChatRequest) -> Result<PreparedRequest, Error> {
        let settings = self
            .config
            .vendor(vendor.name())
            .ok_or_else(|| Error::Configuration(format!("vendor {vendor} is not configured")))?;

        let base_url = settings
            .base_url
            .as_ref()
            .map_or_else(|| vendor.default_base_url().to_owned(), |u| u.as_str().to_owned());

        Ok(PreparedRequest {
            url: vendor.endpoint(&base_url, &request.model, request.stream),
            headers: build_headers(vendor, settings)?,
            body: convert::encode(vendor, request)?,
            streaming: request.stream,
        })
    }
}

/// Canonical-model invariants checked at the boundary
fn validate(request: &ChatRequest) -> Result<(), Error> {
    if request.messages.is_empty() {
        return Err(Error::InvalidRequest("messages must be non-empty".to_owned()));
    }
    if let Some(t) = request.params.temperature
        && !(0.0..=2.0).contains(&t)
    {
        return Err(Error::InvalidRequest(format!("temperature {t} outside [0, 2]")));
    }
    if request.params.max_tokens == Some(0) {
        return Err(Error::InvalidRequest("max_tokens must be at least 1".to_owned()));
    }
    Ok(())
}

/// Authentication and vendor-specific headers for one call
fn build_headers(vendor: Vendor, settings: &VendorSettings) -> Result<HeaderMap, Error> {
    let api_key = settings
        .api_key
        .as_ref()
        .ok_or_else(|| Error::Configuration(format!("missing api key for {vendor}")))?;

    let mut headers = HeaderMap::new();
    let mut insert = |name: HeaderName, value: &str, sensitive: bool| -> Result<(), Error> {
        let mut value = HeaderValue::from_str(value)
            .map_err(|_| Error::Configuration(format!("invalid header value for {name}")))?;
        value.set_sensitive(sensitive);
        headers.insert(name, value);
        Ok(())
    };

    match vendor {
        Vendor::OpenAi => {
            insert(AUTHORIZATION, &format!("Bearer {}", api_key.expose_secret()), true)?;
            if let Some(org) = &settings.organization {
                insert(HeaderName::from_static("openai-organization"), org, false)?;
            }
        }
        Vendor::Anthropic => {
            insert(HeaderName::from_static("x-api-key"), api_key.expose_secret(), true)?;
            insert(HeaderName::from_static("anthropic-version"), ANTHROPIC_VERSION, false)?;
        }
        Vendor::Gemini => {
            insert(HeaderName::from_static("x-goog-api-key"), api_key.expose_secret(), true)?;
        }
        Vendor::Grok => {
            insert(AUTHORIZATION, &format!("Bearer {}", api_key.expose_secret()), true)?;
        }
        Vendor::OpenRouter => {
            insert(AUTHORIZATION, &format!("Bearer {}", api_key.expose_secret()), true)?;
            if let Some(referer) = &settings.referer {
                insert(HeaderName::from_static("http-referer"), referer, false)?;
            }
            if let Some(title) = &settings.title {
                insert(HeaderName::from_static("x-title"), title, false)?;
            }
        }
    }

    Ok(headers)
}
