//! OpenRouter adapter
//!
//! Chat-completions dialect plus two quirks: usage accounting must be opted
//! into per request, and attribution headers (handled at the transport
//! layer) identify the calling app.

use crate::convert::{StreamOutcome, chat};
use crate::error::Error;
use crate::sse::SseEvent;
use crate::types::{ChatRequest, ChatResponse};
use crate::vendor::Vendor;

/// Encode a canonical request for OpenRouter
pub fn encode(request: &ChatRequest) -> Result<serde_json::Value, Error> {
    let mut wire = chat::encode(Vendor::OpenRouter, request)?;

    // OpenRouter only reports token usage when asked
    if let Some(object) = wire.as_object_mut() {
        object.insert("usage".to_owned(), serde_json::json!({"include": true}));
    }

    Ok(wire)
}

/// Decode a non-streaming OpenRouter response body
pub fn decode(body: &[u8]) -> Result<ChatResponse, Error> {
    chat::decode(Vendor::OpenRouter, body)
}

/// Assemble a canonical response from an OpenRouter SSE stream
pub fn collect_stream(events: &[SseEvent]) -> Result<StreamOutcome, Error> {
    chat::collect_stream(events)
}
