//! Continuation management for multi-turn tool calling
//!
//! After a turn that produced tool calls, the caller executes the tools and
//! asks for the next-turn request. Two strategies exist, selected by vendor
//! capability: an opaque server-side token (the vendor reconstructs context),
//! or a full rebuild of the message history with tool results appended.

use crate::error::Error;
use crate::types::{
    ChatRequest, ChatResponse, Content, Continuation, ContinuationState, Message, Role, ToolResult,
};
use crate::vendor::Vendor;

/// Derive the continuation state after a completed turn
///
/// Produces a fresh value; the prior state (if any) stays valid, so a failed
/// follow-up call can be rebuilt from it.
pub fn after_turn(vendor: Vendor, request: &ChatRequest, response: &ChatResponse) -> ContinuationState {
    let strategy = vendor.continuation();

    let history = match strategy {
        Continuation::StatefulId => Vec::new(),
        Continuation::HistoryRebuild => {
            let mut history = request.messages.clone();
            history.push(assistant_turn(response));
            history
        }
    };

    ContinuationState {
        vendor,
        model: request.model.clone(),
        strategy,
        token: response.continuation.clone(),
        history,
        tools: request.tools.clone(),
        tool_choice: request.tool_choice.clone(),
        params: request.params.clone(),
    }
}

/// Build the next-turn request from prior state and tool execution results
///
/// # Errors
///
/// [`Error::MissingContinuationState`] when the stateful strategy has no
/// token, [`Error::InvalidRequest`] when no tool results were supplied.
pub fn continue_with_tool_results(
    state: &ContinuationState,
    results: &[ToolResult],
) -> Result<ChatRequest, Error> {
    if results.is_empty() {
        return Err(Error::InvalidRequest(
            "continuation requires at least one tool result".to_owned(),
        ));
    }

    let result_messages = results
        .iter()
        .map(|r| Message::tool_result(r.tool_call_id.clone(), r.content.clone()));

    let (messages, previous_response) = match state.strategy {
        Continuation::StatefulId => {
            let token = state
                .token
                .as_ref()
                .filter(|t| !t.is_empty())
                .ok_or(Error::MissingContinuationState)?;
            // Minimal follow-up: the vendor replays the context server-side
            (result_messages.collect(), Some(token.clone()))
        }
        Continuation::HistoryRebuild => {
            let mut messages = state.history.clone();
            messages.extend(result_messages);
            (messages, None)
        }
    };

    Ok(ChatRequest {
        model: state.model.clone(),
        messages,
        params: state.params.clone(),
        tools: state.tools.clone(),
        tool_choice: state.tool_choice.clone(),
        stream: false,
        previous_response,
    })
}

/// The assistant message recording a tool-calling turn in rebuilt history
fn assistant_turn(response: &ChatResponse) -> Message {
    Message {
        role: Role::Assistant,
        content: Content::Text(response.content.clone()),
        tool_calls: response.tool_calls.clone(),
        tool_call_id: None,
    }
}
