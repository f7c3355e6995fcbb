use serde::{Deserialize, Serialize};

use super::message::Message;
use super::request::GenerationParams;
use super::tool::{ToolChoice, ToolDefinition};
use crate::vendor::Vendor;

/// How a vendor resumes a multi-turn tool-calling conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Continuation {
    /// The vendor reconstructs context server-side from an opaque response id;
    /// the follow-up request carries only the token and new tool results
    StatefulId,
    /// No server-side state; the full message history is resent with tool
    /// results appended
    HistoryRebuild,
}

/// Everything needed to build the next turn after tool execution
///
/// Derived fresh after each turn and owned by the caller between turns. A new
/// state is produced per turn rather than mutating in place, so the previous
/// turn's token survives a failed follow-up call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContinuationState {
    /// Vendor the conversation is bound to
    pub vendor: Vendor,
    /// Model used for the conversation
    pub model: String,
    /// Resumption strategy registered for the vendor
    pub strategy: Continuation,
    /// Opaque continuation token (stateful-id vendors only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Prior message history including the assistant tool-call turn
    /// (history-rebuild vendors only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<Message>,
    /// Tool definitions carried into the next turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    /// Tool choice carried into the next turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    /// Generation parameters carried into the next turn
    #[serde(default)]
    pub params: GenerationParams,
}
