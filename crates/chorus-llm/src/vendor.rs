//! The closed set of supported vendors and their capability flags
//!
//! Adding a vendor means adding a variant here plus a protocol/convert module
//! pair; the dispatch sites never change shape.

use serde::{Deserialize, Serialize};

use crate::types::Continuation;

/// A supported LLM vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    /// OpenAI Responses API
    OpenAi,
    /// Anthropic Messages API
    Anthropic,
    /// Google Gemini Generative Language API
    Gemini,
    /// xAI Grok (OpenAI-chat-compatible)
    Grok,
    /// OpenRouter aggregator (OpenAI-chat-compatible)
    OpenRouter,
}

/// How tool calls are recovered from a vendor's event stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// The vendor emits one event per completed call carrying full arguments
    CompletedItem,
    /// Arguments arrive as text fragments keyed by a positional index and
    /// must be accumulated until the stream finishes
    DeltaAccumulation,
}

impl Vendor {
    /// All supported vendors
    pub const ALL: [Self; 5] = [
        Self::OpenAi,
        Self::Anthropic,
        Self::Gemini,
        Self::Grok,
        Self::OpenRouter,
    ];

    /// Lowercase identifier used in configuration and logs
    pub const fn name(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
            Self::Grok => "grok",
            Self::OpenRouter => "openrouter",
        }
    }

    /// Parse a configuration identifier
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name() == s)
    }

    /// Default API base URL
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Anthropic => "https://api.anthropic.com/v1",
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Self::Grok => "https://api.x.ai/v1",
            Self::OpenRouter => "https://openrouter.ai/api/v1",
        }
    }

    /// Tool-call extraction strategy for this vendor's stream format
    ///
    /// Verified against each vendor's current streaming format; there is no
    /// uniform rule across vendors.
    pub const fn extraction(self) -> Extraction {
        match self {
            Self::OpenAi | Self::Gemini => Extraction::CompletedItem,
            Self::Anthropic | Self::Grok | Self::OpenRouter => Extraction::DeltaAccumulation,
        }
    }

    /// Conversation resumption strategy for this vendor
    pub const fn continuation(self) -> Continuation {
        match self {
            Self::OpenAi => Continuation::StatefulId,
            Self::Anthropic | Self::Gemini | Self::Grok | Self::OpenRouter => Continuation::HistoryRebuild,
        }
    }

    /// Valid sampling temperature range
    pub const fn temperature_range(self) -> (f64, f64) {
        match self {
            Self::Anthropic => (0.0, 1.0),
            _ => (0.0, 2.0),
        }
    }

    /// Full request URL for a completion call
    ///
    /// Gemini routes per model and selects streaming by endpoint; the other
    /// vendors use a fixed path and a `stream` flag in the body.
    pub fn endpoint(self, base_url: &str, model: &str, stream: bool) -> String {
        let base = base_url.trim_end_matches('/');
        match self {
            Self::OpenAi => format!("{base}/responses"),
            Self::Anthropic => format!("{base}/messages"),
            Self::Gemini => {
                if stream {
                    format!("{base}/models/{model}:streamGenerateContent?alt=sse")
                } else {
                    format!("{base}/models/{model}:generateContent")
                }
            }
            Self::Grok | Self::OpenRouter => format!("{base}/chat/completions"),
        }
    }
}

impl std::fmt::Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
