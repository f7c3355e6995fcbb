//! Grok (xAI) adapter
//!
//! Grok speaks the chat-completions dialect unmodified; only endpoints and
//! credentials differ, and those live in the vendor metadata.

use crate::convert::{StreamOutcome, chat};
use crate::error::Error;
use crate::sse::SseEvent;
use crate::types::{ChatRequest, ChatResponse};
use crate::vendor::Vendor;

/// Encode a canonical request for Grok
pub fn encode(request: &ChatRequest) -> Result<serde_json::Value, Error> {
    chat::encode(Vendor::Grok, request)
}

/// Decode a non-streaming Grok response body
pub fn decode(body: &[u8]) -> Result<ChatResponse, Error> {
    chat::decode(Vendor::Grok, body)
}

/// Assemble a canonical response from a Grok SSE stream
pub fn collect_stream(events: &[SseEvent]) -> Result<StreamOutcome, Error> {
    chat::collect_stream(events)
}
