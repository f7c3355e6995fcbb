//! Anthropic Messages API adapter
//!
//! The system instruction travels as a top-level `system` field, tool results
//! ride inside user messages as `tool_result` blocks, and streamed tool
//! arguments arrive as `input_json_delta` fragments tied to a content block —
//! the delta-accumulation extraction strategy.

use crate::convert::{StreamOutcome, clamp_temperature, envelope_error};
use crate::error::Error;
use crate::extract::ToolCallAccumulator;
use crate::protocol::anthropic::{
    AnthropicContent, AnthropicMessage, AnthropicTool, AnthropicToolChoice, BlockDelta, ContentBlock, ImageSource,
    MessagesRequest, MessagesResponse, MessagesStreamEvent,
};
use crate::sse::SseEvent;
use crate::types::{
    ChatRequest, ChatResponse, Content, ContentPart, FinishReason, Message, Role, ToolCall, ToolChoice,
    ToolChoiceMode, Usage,
};
use crate::vendor::Vendor;

/// The API requires `max_tokens`; applied when the caller leaves it unset
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Encode a canonical request into Messages API wire JSON
pub fn encode(request: &ChatRequest) -> Result<serde_json::Value, Error> {
    let mut system = Vec::new();
    let mut messages = Vec::new();

    for msg in &request.messages {
        match msg.role {
            Role::System => system.push(msg.content.as_text()),
            _ => messages.push(encode_message(msg)?),
        }
    }

    let tools = request.tools.as_ref().map(|tools| {
        tools
            .iter()
            .map(|t| AnthropicTool {
                name: t.name.clone(),
                description: t.description.clone(),
                input_schema: t
                    .parameters
                    .clone()
                    .unwrap_or_else(|| serde_json::json!({"type": "object"})),
            })
            .collect()
    });

    let wire = MessagesRequest {
        model: request.model.clone(),
        max_tokens: request.params.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        system: if system.is_empty() { None } else { Some(system.join("\n\n")) },
        messages,
        temperature: clamp_temperature(Vendor::Anthropic, request.params.temperature),
        top_p: request.params.top_p,
        stop_sequences: request.params.stop.clone(),
        stream: request.stream.then_some(true),
        tools,
        tool_choice: request.tool_choice.as_ref().map(encode_tool_choice),
    };

    serde_json::to_value(&wire).map_err(|e| Error::InvalidRequest(e.to_string()))
}

fn encode_message(msg: &Message) -> Result<AnthropicMessage, Error> {
    // Tool results become user messages carrying a tool_result block
    if msg.role == Role::Tool {
        let tool_use_id = msg.tool_call_id.clone().ok_or_else(|| {
            Error::InvalidRequest("tool message is missing tool_call_id".to_owned())
        })?;
        return Ok(AnthropicMessage {
            role: "user".to_owned(),
            content: AnthropicContent::Blocks(vec![ContentBlock::ToolResult {
                tool_use_id,
                content: Some(msg.content.as_text()),
            }]),
        });
    }

    let role = if msg.role == Role::Assistant { "assistant" } else { "user" };

    // An assistant tool-call turn becomes text + tool_use blocks
    if let Some(calls) = &msg.tool_calls {
        let mut blocks = Vec::new();
        let text = msg.content.as_text();
        if !text.is_empty() {
            blocks.push(ContentBlock::Text { text });
        }
        for call in calls {
            let input = serde_json::from_str(&call.arguments).unwrap_or_else(|_| serde_json::json!({}));
            blocks.push(ContentBlock::ToolUse {
                id: call.id.clone(),
                name: call.name.clone(),
                input,
            });
        }
        return Ok(AnthropicMessage {
            role: role.to_owned(),
            content: AnthropicContent::Blocks(blocks),
        });
    }

    let content = match &msg.content {
        Content::Text(text) => AnthropicContent::Text(text.clone()),
        Content::Parts(parts) => AnthropicContent::Blocks(parts.iter().map(encode_part).collect()),
    };

    Ok(AnthropicMessage {
        role: role.to_owned(),
        content,
    })
}

fn encode_part(part: &ContentPart) -> ContentBlock {
    match part {
        ContentPart::Text { text } => ContentBlock::Text { text: text.clone() },
        ContentPart::Image { url, .. } => {
            // Data URIs become base64 sources, anything else a URL source
            if let Some(rest) = url.strip_prefix("data:")
                && let Some((mime_and_encoding, data)) = rest.split_once(',')
            {
                let media_type = mime_and_encoding.strip_suffix(";base64").unwrap_or(mime_and_encoding);
                ContentBlock::Image {
                    source: ImageSource {
                        source_type: "base64".to_owned(),
                        media_type: Some(media_type.to_owned()),
                        data: data.to_owned(),
                    },
                }
            } else {
                ContentBlock::Image {
                    source: ImageSource {
                        source_type: "url".to_owned(),
                        media_type: None,
                        data: url.clone(),
                    },
                }
            }
        }
    }
}

fn encode_tool_choice(choice: &ToolChoice) -> AnthropicToolChoice {
    match choice {
        ToolChoice::Mode(mode) => match mode {
            // The API has no "none" mode; both map to "auto"
            ToolChoiceMode::None | ToolChoiceMode::Auto => AnthropicToolChoice {
                choice_type: "auto".to_owned(),
                name: None,
            },
            ToolChoiceMode::Required => AnthropicToolChoice {
                choice_type: "any".to_owned(),
                name: None,
            },
        },
        ToolChoice::Tool { name } => AnthropicToolChoice {
            choice_type: "tool".to_owned(),
            name: Some(name.clone()),
        },
    }
}

/// Decode a non-streaming Messages API body
pub fn decode(body: &[u8]) -> Result<ChatResponse, Error> {
    let wire: MessagesResponse =
        serde_json::from_slice(body).map_err(|e| envelope_error(Vendor::Anthropic, &e))?;

    let mut content = String::new();
    let mut tool_calls = Vec::new();

    for block in &wire.content {
        match block {
            ContentBlock::Text { text } => content.push_str(text),
            ContentBlock::ToolUse { id, name, input } => {
                let arguments = serde_json::to_string(input).unwrap_or_else(|_| "{}".to_owned());
                tool_calls.push(ToolCall {
                    id: id.clone(),
                    name: name.clone(),
                    arguments,
                });
            }
            ContentBlock::Image { .. } | ContentBlock::ToolResult { .. } => {}
        }
    }

    let finish_reason = if tool_calls.is_empty() {
        wire.stop_reason
            .as_deref()
            .map_or(FinishReason::Stop, FinishReason::from_vendor)
    } else {
        FinishReason::ToolCalls
    };

    Ok(ChatResponse {
        content,
        model: wire.model,
        finish_reason,
        usage: Usage::new(wire.usage.input_tokens, wire.usage.output_tokens),
        tool_calls: if tool_calls.is_empty() { None } else { Some(tool_calls) },
        continuation: None,
    })
}

/// Assemble a canonical response from a Messages API SSE stream
///
/// Tool-use blocks open with id and name in `content_block_start`; their
/// arguments trickle in as `input_json_delta` fragments keyed by the block
/// index, accumulated until `message_stop` or end of stream.
pub fn collect_stream(events: &[SseEvent]) -> Result<StreamOutcome, Error> {
    let mut text = String::new();
    let mut accumulator = ToolCallAccumulator::new();
    let mut model = String::new();
    let mut prompt_tokens = 0;
    let mut completion_tokens = 0;
    let mut stop_reason: Option<String> = None;

    // Anthropic block indices cover text and tool blocks alike; tool calls
    // get their own dense numbering so accumulator order matches call order
    let mut block_to_call: std::collections::HashMap<u32, u32> = std::collections::HashMap::new();
    let mut next_call_index = 0u32;

    for event in events {
        if event.is_done() {
            break;
        }
        let Ok(payload) = event.json::<MessagesStreamEvent>() else {
            continue;
        };

        match payload {
            MessagesStreamEvent::MessageStart { message } => {
                model = message.model;
                if let Some(usage) = message.usage {
                    prompt_tokens = usage.input_tokens;
                    completion_tokens = usage.output_tokens;
                }
            }
            MessagesStreamEvent::ContentBlockStart { index, content_block } => {
                if let ContentBlock::ToolUse { id, name, .. } = content_block {
                    let call_index = next_call_index;
                    next_call_index += 1;
                    block_to_call.insert(index, call_index);
                    accumulator.start(call_index, Some(&id), Some(&name));
                }
            }
            MessagesStreamEvent::ContentBlockDelta { index, delta } => match delta {
                BlockDelta::TextDelta { text: t } => text.push_str(&t),
                BlockDelta::InputJsonDelta { partial_json } => {
                    if let Some(call_index) = block_to_call.get(&index) {
                        accumulator.append(*call_index, &partial_json);
                    }
                }
            },
            MessagesStreamEvent::MessageDelta { delta, usage } => {
                if delta.stop_reason.is_some() {
                    stop_reason = delta.stop_reason;
                }
                if let Some(usage) = usage {
                    completion_tokens = usage.output_tokens;
                    if usage.input_tokens > 0 {
                        prompt_tokens = usage.input_tokens;
                    }
                }
            }
            MessagesStreamEvent::ContentBlockStop { .. }
            | MessagesStreamEvent::MessageStop
            | MessagesStreamEvent::Ping => {}
        }
    }

    let (tool_calls, warnings) = accumulator.finish();

    let finish_reason = if tool_calls.is_empty() {
        stop_reason
            .as_deref()
            .map_or(FinishReason::Stop, FinishReason::from_vendor)
    } else {
        FinishReason::ToolCalls
    };

    Ok(StreamOutcome {
        response: ChatResponse {
            content: text,
            model,
            finish_reason,
            usage: Usage::new(prompt_tokens, completion_tokens),
            tool_calls: if tool_calls.is_empty() { None } else { Some(tool_calls) },
            continuation: None,
        },
        warnings,
    })
}
