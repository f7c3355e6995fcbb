use serde::{Deserialize, Serialize};

use super::message::Message;
use super::tool::{ToolChoice, ToolDefinition};

/// Parameters controlling text generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature (0.0 to 2.0; clamped to each vendor's range on encode)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Stop sequences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

/// Canonical chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Conversation messages; must be non-empty
    pub messages: Vec<Message>,
    /// Generation parameters
    #[serde(default)]
    pub params: GenerationParams,
    /// Tool definitions available to the model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    /// How the model should select tools
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    /// Whether to stream the response
    #[serde(default)]
    pub stream: bool,
    /// Opaque token of the prior turn, for vendors that resume server-side.
    /// Encoders for history-rebuild vendors ignore it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_response: Option<String>,
}

impl ChatRequest {
    /// Create a request with a single user message
    pub fn user(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![Message::text(super::Role::User, content)],
            params: GenerationParams::default(),
            tools: None,
            tool_choice: None,
            stream: false,
            previous_response: None,
        }
    }
}
