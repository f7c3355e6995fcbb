//! Canonical types for vendor-agnostic LLM requests and responses
//!
//! Every vendor wire format converts to and from these types. Nothing in this
//! module knows about any particular vendor.

pub mod continuation;
pub mod message;
pub mod request;
pub mod response;
pub mod tool;

pub use continuation::{Continuation, ContinuationState};
pub use message::{Content, ContentPart, Message, Role, ToolCall, ToolResult};
pub use request::{ChatRequest, GenerationParams};
pub use response::{ChatResponse, FinishReason, Usage};
pub use tool::{ToolChoice, ToolChoiceMode, ToolDefinition};
