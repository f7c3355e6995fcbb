//! Core normalization-and-streaming engine for chorus
//!
//! Provides a unified interface over multiple LLM vendors (`OpenAI`,
//! Anthropic, Gemini, Grok, OpenRouter) from a single canonical
//! request/response model: per-vendor wire encoding/decoding, incremental
//! SSE parsing, tool-call extraction, retrying transport, and multi-turn
//! continuation.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod client;
pub mod continuation;
pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod protocol;
pub mod sse;
pub mod transport;
pub mod types;
pub mod vendor;

pub use client::Client;
pub use continuation::{after_turn, continue_with_tool_results};
pub use diagnostics::{Diagnostics, NullDiagnostics, TracingDiagnostics};
pub use error::Error;
pub use sse::{SseEvent, SseParser};
pub use transport::{ChunkSink, Transport, TransportOptions};
pub use types::{
    ChatRequest, ChatResponse, ContinuationState, FinishReason, Message, Role, ToolCall, ToolDefinition, ToolResult,
    Usage,
};
pub use vendor::Vendor;
