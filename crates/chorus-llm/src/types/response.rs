use serde::{Deserialize, Serialize};

use super::message::ToolCall;

/// Reason the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of generation
    Stop,
    /// Hit the `max_tokens` limit
    Length,
    /// Model requested tool execution; the turn needs continuation
    ToolCalls,
    /// Content was filtered by safety systems
    ContentFilter,
    /// Vendor-reported value with no canonical mapping, passed through
    Other(String),
}

impl FinishReason {
    /// Map a vendor finish/stop reason string to the canonical variant
    pub fn from_vendor(s: &str) -> Self {
        match s {
            "stop" | "end_turn" | "completed" | "STOP" => Self::Stop,
            "length" | "max_tokens" | "MAX_TOKENS" => Self::Length,
            "tool_calls" | "tool_use" => Self::ToolCalls,
            "content_filter" | "SAFETY" => Self::ContentFilter,
            other => Self::Other(other.to_owned()),
        }
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens consumed by the prompt
    pub prompt_tokens: u32,
    /// Tokens generated in the completion
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion)
    pub total_tokens: u32,
}

impl Usage {
    /// Build usage from prompt/completion counts, deriving the total
    pub const fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Canonical chat completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Accumulated text content
    pub content: String,
    /// Model that produced the response
    pub model: String,
    /// Why generation stopped
    pub finish_reason: FinishReason,
    /// Token usage statistics
    pub usage: Usage,
    /// Tool calls requested by the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Opaque vendor continuation token (e.g. a response id), when the
    /// vendor supports server-side resumption
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation: Option<String>,
}

impl ChatResponse {
    /// Whether the caller must execute tools and continue the turn
    pub fn needs_continuation(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|calls| !calls.is_empty())
    }
}
