//! `OpenAI` Responses API wire format types

use serde::{Deserialize, Serialize};

// -- Request types --

/// Responses API request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsesRequest {
    /// Model identifier
    pub model: String,
    /// Ordered input items (messages, function call outputs)
    pub input: Vec<InputItem>,
    /// System instructions (top-level, not an input item)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Tool definitions (flat shape, unlike chat completions)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ResponsesTool>>,
    /// Tool choice configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<serde_json::Value>,
    /// Whether to stream the response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    /// Id of the prior response to continue from (server-side state)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_response_id: Option<String>,
}

/// Item in the `input` array
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputItem {
    /// Conversation message
    Message {
        /// Message role
        role: String,
        /// Message content (string or typed parts)
        content: serde_json::Value,
    },
    /// Result of a function call from a prior turn
    FunctionCallOutput {
        /// The `call_id` of the function call being answered
        call_id: String,
        /// Tool output text
        output: String,
    },
    /// A function call echoed back when rebuilding history
    FunctionCall {
        /// Item id
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Call id referenced by the matching output
        call_id: String,
        /// Function name
        name: String,
        /// JSON-encoded arguments
        arguments: String,
    },
}

/// Flat tool definition in the Responses dialect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsesTool {
    /// Always "function"
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function name
    pub name: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

// -- Response types --

/// Responses API response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsesResponse {
    /// Response identifier; doubles as the continuation token
    pub id: String,
    /// Generation status (e.g. "completed", "incomplete")
    #[serde(default)]
    pub status: Option<String>,
    /// Model used
    #[serde(default)]
    pub model: Option<String>,
    /// Typed output items
    #[serde(default)]
    pub output: Vec<OutputItem>,
    /// Token usage
    #[serde(default)]
    pub usage: Option<ResponsesUsage>,
    /// Why generation stopped early, when it did
    #[serde(default)]
    pub incomplete_details: Option<IncompleteDetails>,
}

/// Detail on an incomplete response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncompleteDetails {
    /// Reason generation stopped (e.g. "max_output_tokens")
    #[serde(default)]
    pub reason: Option<String>,
}

/// Typed item in the `output` array
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    /// Assistant message with typed content parts
    Message {
        /// Item id
        #[serde(default)]
        id: Option<String>,
        /// Content parts; only `output_text` carries text
        content: Vec<OutputContent>,
    },
    /// Completed function call
    FunctionCall {
        /// Item id
        #[serde(default)]
        id: Option<String>,
        /// Call id the caller must echo in the result
        call_id: String,
        /// Function name
        name: String,
        /// JSON-encoded arguments, complete at this point
        arguments: String,
        /// Item status ("completed" when final)
        #[serde(default)]
        status: Option<String>,
    },
    /// Reasoning item (ignored by this engine)
    Reasoning {
        /// Item id
        #[serde(default)]
        id: Option<String>,
    },
    /// Forward-compatible catch-all for item types added later
    #[serde(other)]
    Unknown,
}

/// Content part within an output message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputContent {
    /// Generated text
    OutputText {
        /// The text string
        text: String,
    },
    /// Refusal message
    Refusal {
        /// Refusal text
        refusal: String,
    },
    /// Forward-compatible catch-all
    #[serde(other)]
    Unknown,
}

/// Token usage in the Responses dialect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsesUsage {
    /// Prompt tokens
    #[serde(default)]
    pub input_tokens: u32,
    /// Completion tokens
    #[serde(default)]
    pub output_tokens: u32,
    /// Total tokens
    #[serde(default)]
    pub total_tokens: u32,
}

// -- Streaming types --

/// SSE event payload in a Responses stream
///
/// Events are discriminated by the SSE `event:` line (or the `type` field);
/// one flat struct covers the fields used across event types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsesStreamEvent {
    /// Event type (mirrors the SSE event name)
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    /// Incremental text for `response.output_text.delta`
    #[serde(default)]
    pub delta: Option<String>,
    /// Output item for `response.output_item.added` / `.done`
    #[serde(default)]
    pub item: Option<OutputItem>,
    /// Full response for `response.completed` / `response.failed`
    #[serde(default)]
    pub response: Option<ResponsesResponse>,
}

// -- Error response --

/// Error body returned with a non-2xx status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsesErrorBody {
    /// Error details
    pub error: ResponsesErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsesErrorDetail {
    /// Error message
    pub message: String,
    /// Error type
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    /// Error code
    #[serde(default)]
    pub code: Option<String>,
}
