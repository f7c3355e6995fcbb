//! Vendor wire-format types
//!
//! Pure serde structs mirroring each dialect exactly; no conversion logic
//! lives here. Grok and OpenRouter share the chat-completions dialect.

pub mod anthropic;
pub mod chat;
pub mod gemini;
pub mod openai;
