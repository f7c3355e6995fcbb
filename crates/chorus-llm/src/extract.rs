//! Tool-call extraction from heterogeneous stream events
//!
//! Vendors signal function calls in two ways: a single event carrying the
//! completed call (id-bearing), or a trickle of argument fragments keyed by a
//! positional index that only becomes a call once the stream finishes. The
//! [`ToolCallAccumulator`] owns the state for the second shape; it is created
//! at stream start, finalized exactly once, then discarded.

use std::collections::HashMap;

use crate::types::ToolCall;

/// Non-fatal problem encountered while extracting tool calls
///
/// Extraction degrades instead of failing: a malformed fragment produces a
/// call with empty arguments plus one of these, reported to the diagnostics
/// sink by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionWarning {
    /// Accumulated argument text was not valid JSON; arguments degraded to `{}`
    MalformedArguments {
        /// Tool call the degradation applies to
        tool_call_id: String,
        /// Name of the tool, when known
        name: String,
    },
    /// A fragment referenced an index that never announced a tool name
    UnnamedCall {
        /// Positional index of the orphaned fragments
        index: u32,
    },
}

impl std::fmt::Display for ExtractionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedArguments { tool_call_id, name } => {
                write!(f, "arguments for {name} ({tool_call_id}) were not valid JSON; degraded to empty")
            }
            Self::UnnamedCall { index } => {
                write!(f, "tool call at index {index} never received a name; dropped")
            }
        }
    }
}

/// Per-call state while fragments are still arriving
#[derive(Debug, Default)]
struct PendingCall {
    id: Option<String>,
    name: Option<String>,
    fragments: Vec<String>,
}

/// Accumulates index-keyed tool-call fragments from a stream
///
/// Some vendors deliver function arguments as incremental text tied to a
/// positional index rather than a stable id, so the map is keyed by index and
/// ids are resolved (or generated) at finalization.
#[derive(Debug, Default)]
pub struct ToolCallAccumulator {
    calls: HashMap<u32, PendingCall>,
    /// First-seen order of indices, so finalization preserves stream order
    order: Vec<u32>,
}

impl ToolCallAccumulator {
    /// Create an empty accumulator for one stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any fragments were observed
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Record the start of a call at `index`, carrying id and/or name
    pub fn start(&mut self, index: u32, id: Option<&str>, name: Option<&str>) {
        let call = self.entry(index);
        if let Some(id) = id {
            call.id = Some(id.to_owned());
        }
        if let Some(name) = name {
            call.name = Some(name.to_owned());
        }
    }

    /// Append an argument text fragment for the call at `index`
    pub fn append(&mut self, index: u32, fragment: &str) {
        self.entry(index).fragments.push(fragment.to_owned());
    }

    /// Concatenate and parse all accumulated calls, consuming the accumulator
    ///
    /// Fragments are joined and parsed as JSON; parse failure degrades the
    /// call to empty arguments with a warning. No fragments at all is a valid
    /// zero-argument call. Calls that never received a name are dropped with
    /// a warning rather than fabricated.
    pub fn finish(mut self) -> (Vec<ToolCall>, Vec<ExtractionWarning>) {
        let mut calls = Vec::new();
        let mut warnings = Vec::new();

        for index in std::mem::take(&mut self.order) {
            let Some(pending) = self.calls.remove(&index) else {
                continue;
            };
            let Some(name) = pending.name else {
                warnings.push(ExtractionWarning::UnnamedCall { index });
                continue;
            };

            let id = pending.id.unwrap_or_else(generated_call_id);
            let raw = pending.fragments.concat();
            let arguments = normalize_arguments(&raw).unwrap_or_else(|| {
                warnings.push(ExtractionWarning::MalformedArguments {
                    tool_call_id: id.clone(),
                    name: name.clone(),
                });
                "{}".to_owned()
            });

            calls.push(ToolCall { id, name, arguments });
        }

        (calls, warnings)
    }

    fn entry(&mut self, index: u32) -> &mut PendingCall {
        if !self.calls.contains_key(&index) {
            self.order.push(index);
        }
        self.calls.entry(index).or_default()
    }
}

/// Collects completed-item tool calls, deduplicating by id
///
/// Duplicate completion events for the same id are idempotent: the last write
/// wins and exactly one entry appears in the final list.
#[derive(Debug, Default)]
pub struct CompletedCalls {
    calls: Vec<ToolCall>,
}

impl CompletedCalls {
    /// Create an empty collector for one stream
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed call; replaces any earlier call with the same id
    pub fn record(&mut self, call: ToolCall) {
        if let Some(existing) = self.calls.iter_mut().find(|c| c.id == call.id) {
            *existing = call;
        } else {
            self.calls.push(call);
        }
    }

    /// Whether any calls were recorded
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// The final ordered call list
    pub fn finish(self) -> Vec<ToolCall> {
        self.calls
    }
}

/// Validate accumulated argument text, mapping empty input to `{}`
fn normalize_arguments(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some("{}".to_owned());
    }
    serde_json::from_str::<serde_json::Value>(trimmed)
        .ok()
        .map(|_| trimmed.to_owned())
}

/// Generate an id for vendors that do not assign one
pub fn generated_call_id() -> String {
    format!("call_{}", uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_concatenate_in_order() {
        let mut acc = ToolCallAccumulator::new();
        acc.start(0, Some("call_1"), Some("get_weather"));
        acc.append(0, "{\"ci");
        acc.append(0, "ty\":\"Paris\"}");

        let (calls, warnings) = acc.finish();
        assert!(warnings.is_empty());
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "call_1");
        assert_eq!(calls[0].name, "get_weather");
        assert_eq!(calls[0].arguments, "{\"city\":\"Paris\"}");
    }

    #[test]
    fn zero_argument_call_is_valid() {
        let mut acc = ToolCallAccumulator::new();
        acc.start(0, Some("call_1"), Some("list_files"));

        let (calls, warnings) = acc.finish();
        assert!(warnings.is_empty());
        assert_eq!(calls[0].arguments, "{}");
    }

    #[test]
    fn malformed_arguments_degrade_to_empty_with_warning() {
        let mut acc = ToolCallAccumulator::new();
        acc.start(0, Some("call_1"), Some("get_weather"));
        acc.append(0, "{\"city\": \"Par");

        let (calls, warnings) = acc.finish();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].arguments, "{}");
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0],
            ExtractionWarning::MalformedArguments { tool_call_id, .. } if tool_call_id == "call_1"
        ));
    }

    #[test]
    fn multiple_indices_preserve_stream_order() {
        let mut acc = ToolCallAccumulator::new();
        acc.start(1, Some("call_b"), Some("second"));
        acc.start(0, Some("call_a"), Some("first"));
        acc.append(0, "{}");
        acc.append(1, "{}");

        let (calls, _) = acc.finish();
        assert_eq!(calls[0].id, "call_b");
        assert_eq!(calls[1].id, "call_a");
    }

    #[test]
    fn missing_id_gets_generated() {
        let mut acc = ToolCallAccumulator::new();
        acc.start(0, None, Some("lookup"));

        let (calls, warnings) = acc.finish();
        assert!(warnings.is_empty());
        assert!(calls[0].id.starts_with("call_"));
    }

    #[test]
    fn unnamed_call_dropped_with_warning() {
        let mut acc = ToolCallAccumulator::new();
        acc.append(3, "{\"orphan\":true}");

        let (calls, warnings) = acc.finish();
        assert!(calls.is_empty());
        assert_eq!(warnings, vec![ExtractionWarning::UnnamedCall { index: 3 }]);
    }

    #[test]
    fn duplicate_completion_events_are_idempotent() {
        let mut completed = CompletedCalls::new();
        completed.record(ToolCall {
            id: "call_1".into(),
            name: "get_weather".into(),
            arguments: "{\"city\":\"Paris\"}".into(),
        });
        completed.record(ToolCall {
            id: "call_1".into(),
            name: "get_weather".into(),
            arguments: "{\"city\":\"Lyon\"}".into(),
        });

        let calls = completed.finish();
        assert_eq!(calls.len(), 1);
        // Last write wins
        assert_eq!(calls[0].arguments, "{\"city\":\"Lyon\"}");
    }
}
