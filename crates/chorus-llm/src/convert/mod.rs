//! Conversion between the canonical model and vendor wire formats
//!
//! One module per vendor; Grok and OpenRouter build on the shared
//! chat-completions dialect in [`chat`]. All conversion functions are pure:
//! no I/O, no logging — extraction problems come back as warning values.

pub mod anthropic;
pub mod chat;
pub mod gemini;
pub mod grok;
pub mod openai;
pub mod openrouter;

use crate::error::Error;
use crate::extract::ExtractionWarning;
use crate::sse::SseEvent;
use crate::types::{ChatRequest, ChatResponse};
use crate::vendor::Vendor;

/// Result of decoding a complete event stream
#[derive(Debug)]
pub struct StreamOutcome {
    /// The canonical response assembled from the stream
    pub response: ChatResponse,
    /// Non-fatal extraction problems, for the diagnostics sink
    pub warnings: Vec<ExtractionWarning>,
}

/// Encode a canonical request into the vendor's wire JSON
///
/// # Errors
///
/// Returns [`Error::InvalidRequest`] when the request violates a canonical
/// invariant the vendor cannot express.
pub fn encode(vendor: Vendor, request: &ChatRequest) -> Result<serde_json::Value, Error> {
    match vendor {
        Vendor::OpenAi => openai::encode(request),
        Vendor::Anthropic => anthropic::encode(request),
        Vendor::Gemini => gemini::encode(request),
        Vendor::Grok => grok::encode(request),
        Vendor::OpenRouter => openrouter::encode(request),
    }
}

/// Decode a non-streaming response body into the canonical model
///
/// # Errors
///
/// Returns [`Error::ResponseFormat`] when the body does not match the
/// vendor's documented envelope.
pub fn decode(vendor: Vendor, body: &[u8]) -> Result<ChatResponse, Error> {
    match vendor {
        Vendor::OpenAi => openai::decode(body),
        Vendor::Anthropic => anthropic::decode(body),
        Vendor::Gemini => gemini::decode(body),
        Vendor::Grok => grok::decode(body),
        Vendor::OpenRouter => openrouter::decode(body),
    }
}

/// Assemble a canonical response from the full ordered event sequence
///
/// # Errors
///
/// Returns [`Error::ResponseFormat`] only for structural failures of the
/// stream as a whole; individual undecodable events degrade to warnings.
pub fn collect_stream(vendor: Vendor, events: &[SseEvent]) -> Result<StreamOutcome, Error> {
    match vendor {
        Vendor::OpenAi => openai::collect_stream(events),
        Vendor::Anthropic => anthropic::collect_stream(events),
        Vendor::Gemini => gemini::collect_stream(events),
        Vendor::Grok => grok::collect_stream(events),
        Vendor::OpenRouter => openrouter::collect_stream(events),
    }
}

/// Extract the vendor's error message from an error response body
///
/// Falls back to the raw body when the error envelope is unrecognized.
pub fn error_message(vendor: Vendor, body: &[u8]) -> String {
    let parsed = match vendor {
        Vendor::OpenAi => serde_json::from_slice::<crate::protocol::openai::ResponsesErrorBody>(body)
            .ok()
            .map(|b| b.error.message),
        Vendor::Anthropic => serde_json::from_slice::<crate::protocol::anthropic::AnthropicErrorBody>(body)
            .ok()
            .map(|b| b.error.message),
        Vendor::Gemini => serde_json::from_slice::<crate::protocol::gemini::GeminiErrorBody>(body)
            .ok()
            .map(|b| b.error.message),
        Vendor::Grok | Vendor::OpenRouter => serde_json::from_slice::<crate::protocol::chat::ChatErrorBody>(body)
            .ok()
            .map(|b| b.error.message),
    };

    parsed.unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
}

/// Clamp the requested temperature into the vendor's valid range
pub(crate) fn clamp_temperature(vendor: Vendor, temperature: Option<f64>) -> Option<f64> {
    temperature.map(|t| {
        let (lo, hi) = vendor.temperature_range();
        t.clamp(lo, hi)
    })
}

/// Structural decode error for a response envelope
pub(crate) fn envelope_error(vendor: Vendor, err: &serde_json::Error) -> Error {
    Error::ResponseFormat(format!("{vendor} response envelope: {err}"))
}
