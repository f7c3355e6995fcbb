//! HTTP transport with retry, timeout and cancellation
//!
//! The transport is the sole owner of retry decisions. Streaming calls
//! forward every received chunk to the caller's sink on the I/O path while
//! accumulating the full byte sequence, which is returned at completion so
//! the extractor can run conclusively over the whole buffer.
//!
//! Partial output already forwarded to the sink is never rolled back; when a
//! turn ultimately fails after bytes were streamed, the error says so
//! explicitly since that content has had observable side effects.

use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use http::HeaderMap;
use tokio_util::sync::CancellationToken;

use crate::convert;
use crate::error::Error;
use crate::vendor::Vendor;

/// Tuning knobs for the transport layer
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Additional attempts after the first failure
    pub max_retries: u32,
    /// Per-attempt timeout for non-streaming calls
    pub request_timeout: Duration,
    /// Per-attempt timeout for streaming calls
    pub stream_timeout: Duration,
    /// Backoff unit; the delay before retry `n` is `base * 2^n`
    pub backoff_base: Duration,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            max_retries: 2,
            request_timeout: Duration::from_secs(30),
            stream_timeout: Duration::from_secs(120),
            backoff_base: Duration::from_secs(1),
        }
    }
}

/// A fully prepared vendor HTTP request
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// Request URL
    pub url: String,
    /// Headers including authentication
    pub headers: HeaderMap,
    /// JSON body
    pub body: serde_json::Value,
    /// Whether the response is an SSE stream
    pub streaming: bool,
}

/// Callback receiving raw vendor bytes as they arrive
///
/// Invoked synchronously on the transport's I/O path: long-blocking work here
/// stalls ingestion and risks the vendor connection timing out.
pub type ChunkSink<'a> = dyn FnMut(&[u8]) + Send + 'a;

/// HTTP transport shared across calls
#[derive(Debug, Clone)]
pub struct Transport {
    client: reqwest::Client,
    options: TransportOptions,
}

impl Transport {
    /// Create a transport with the given options
    pub fn new(options: TransportOptions) -> Self {
        Self {
            client: reqwest::Client::new(),
            options,
        }
    }

    /// Send a prepared request, retrying transient failures
    ///
    /// Returns the complete response body. In streaming mode every chunk is
    /// forwarded to `sink` before being accumulated.
    ///
    /// # Errors
    ///
    /// [`Error::Provider`]/[`Error::Transport`] after retries are exhausted,
    /// [`Error::StreamInterrupted`] when bytes had already reached the sink,
    /// [`Error::Cancelled`] when the token fires first.
    pub async fn send(
        &self,
        vendor: Vendor,
        request: &PreparedRequest,
        mut sink: Option<&mut ChunkSink<'_>>,
        cancel: &CancellationToken,
    ) -> Result<Bytes, Error> {
        let mut attempt: u32 = 0;
        let mut streamed_total: usize = 0;

        loop {
            let result = tokio::select! {
                result = self.attempt(vendor, request, sink.as_deref_mut(), &mut streamed_total) => result,
                () = cancel.cancelled() => Err(Error::Cancelled),
            };

            match result {
                Ok(bytes) => return Ok(bytes),
                Err(err) => {
                    if !err.is_retryable() || attempt >= self.options.max_retries {
                        return Err(finalize_error(err, streamed_total));
                    }

                    attempt += 1;
                    let delay = backoff_delay(attempt, self.options.backoff_base);
                    tracing::warn!(
                        vendor = %vendor,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "transient failure, retrying"
                    );

                    tokio::select! {
                        () = tokio::time::sleep(delay) => {}
                        () = cancel.cancelled() => return Err(Error::Cancelled),
                    }
                }
            }
        }
    }

    /// One attempt: send, check status, drain the body
    async fn attempt(
        &self,
        vendor: Vendor,
        request: &PreparedRequest,
        mut sink: Option<&mut ChunkSink<'_>>,
        streamed_total: &mut usize,
    ) -> Result<Bytes, Error> {
        let timeout = if request.streaming {
            self.options.stream_timeout
        } else {
            self.options.request_timeout
        };

        let response = self
            .client
            .post(&request.url)
            .headers(request.headers.clone())
            .timeout(timeout)
            .json(&request.body)
            .send()
            .await
            .map_err(classify_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(Error::Provider {
                status: status.as_u16(),
                message: convert::error_message(vendor, &body),
            });
        }

        if request.streaming {
            let mut stream = response.bytes_stream();
            let mut buffer = BytesMut::new();

            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(classify_reqwest)?;
                if let Some(sink) = sink.as_mut() {
                    sink(&chunk);
                    *streamed_total += chunk.len();
                }
                buffer.extend_from_slice(&chunk);
            }

            Ok(buffer.freeze())
        } else {
            response.bytes().await.map_err(classify_reqwest)
        }
    }
}

/// Delay before retry number `attempt` (1-based)
fn backoff_delay(attempt: u32, base: Duration) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}

/// Map a reqwest failure onto the error taxonomy
fn classify_reqwest(err: reqwest::Error) -> Error {
    Error::Transport(err.to_string())
}

/// Attach streamed-bytes context to a terminal failure
fn finalize_error(err: Error, streamed_total: usize) -> Error {
    if streamed_total == 0 {
        return err;
    }
    match err {
        // Cancellation is the caller's own doing, not an interrupted turn
        Error::Cancelled => Error::Cancelled,
        other => Error::StreamInterrupted {
            streamed_bytes: streamed_total,
            message: other.to_string(),
        },
    }
}
