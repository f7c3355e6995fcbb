//! Shared chat-completions dialect conversions
//!
//! Grok and OpenRouter both speak the OpenAI chat-completions format; their
//! adapter modules delegate here and layer vendor quirks on the encoded
//! value. Streamed tool calls arrive as index-keyed argument fragments — the
//! delta-accumulation extraction strategy.

use crate::convert::{StreamOutcome, clamp_temperature, envelope_error};
use crate::error::Error;
use crate::extract::ToolCallAccumulator;
use crate::protocol::chat::{
    ChatCompletionsRequest, ChatCompletionsResponse, ChatFunction, ChatFunctionCall, ChatMessage, ChatStreamChunk,
    ChatTool, ChatToolCall,
};
use crate::sse::SseEvent;
use crate::types::{
    ChatRequest, ChatResponse, Content, ContentPart, FinishReason, Message, Role, ToolCall, ToolChoice,
    ToolChoiceMode, Usage,
};
use crate::vendor::Vendor;

/// Encode a canonical request into chat-completions wire JSON
pub fn encode(vendor: Vendor, request: &ChatRequest) -> Result<serde_json::Value, Error> {
    let messages = request.messages.iter().map(encode_message).collect::<Result<Vec<_>, _>>()?;

    let tools = request.tools.as_ref().map(|tools| {
        tools
            .iter()
            .map(|t| ChatTool {
                tool_type: "function".to_owned(),
                function: ChatFunction {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                },
            })
            .collect()
    });

    let wire = ChatCompletionsRequest {
        model: request.model.clone(),
        messages,
        temperature: clamp_temperature(vendor, request.params.temperature),
        top_p: request.params.top_p,
        max_tokens: request.params.max_tokens,
        stop: request.params.stop.clone(),
        stream: request.stream.then_some(true),
        tools,
        tool_choice: request.tool_choice.as_ref().map(encode_tool_choice),
    };

    serde_json::to_value(&wire).map_err(|e| Error::InvalidRequest(e.to_string()))
}

fn encode_message(msg: &Message) -> Result<ChatMessage, Error> {
    let role = match msg.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    };

    if msg.role == Role::Tool && msg.tool_call_id.is_none() {
        return Err(Error::InvalidRequest("tool message is missing tool_call_id".to_owned()));
    }

    let content = match &msg.content {
        Content::Text(text) => Some(serde_json::Value::String(text.clone())),
        Content::Parts(parts) => {
            let encoded: Vec<serde_json::Value> = parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => serde_json::json!({"type": "text", "text": text}),
                    ContentPart::Image { url, detail } => serde_json::json!({
                        "type": "image_url",
                        "image_url": {"url": url, "detail": detail},
                    }),
                })
                .collect();
            Some(serde_json::Value::Array(encoded))
        }
    };

    let tool_calls = msg.tool_calls.as_ref().map(|calls| {
        calls
            .iter()
            .map(|call| ChatToolCall {
                id: call.id.clone(),
                tool_type: "function".to_owned(),
                function: ChatFunctionCall {
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                },
            })
            .collect()
    });

    Ok(ChatMessage {
        role: role.to_owned(),
        content,
        tool_calls,
        tool_call_id: msg.tool_call_id.clone(),
    })
}

fn encode_tool_choice(choice: &ToolChoice) -> serde_json::Value {
    match choice {
        ToolChoice::Mode(mode) => {
            let s = match mode {
                ToolChoiceMode::None => "none",
                ToolChoiceMode::Auto => "auto",
                ToolChoiceMode::Required => "required",
            };
            serde_json::Value::String(s.to_owned())
        }
        ToolChoice::Tool { name } => {
            serde_json::json!({"type": "function", "function": {"name": name}})
        }
    }
}

/// Decode a non-streaming chat-completions body
pub fn decode(vendor: Vendor, body: &[u8]) -> Result<ChatResponse, Error> {
    let wire: ChatCompletionsResponse =
        serde_json::from_slice(body).map_err(|e| envelope_error(vendor, &e))?;

    let choice = wire
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::ResponseFormat(format!("{vendor} response carried no choices")))?;

    let tool_calls: Vec<ToolCall> = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| ToolCall {
            id: tc.id,
            name: tc.function.name,
            arguments: tc.function.arguments,
        })
        .collect();

    let finish_reason = if tool_calls.is_empty() {
        choice
            .finish_reason
            .as_deref()
            .map_or(FinishReason::Stop, FinishReason::from_vendor)
    } else {
        FinishReason::ToolCalls
    };

    Ok(ChatResponse {
        content: choice.message.content.unwrap_or_default(),
        model: wire.model,
        finish_reason,
        usage: wire
            .usage
            .map_or_else(Usage::default, |u| Usage::new(u.prompt_tokens, u.completion_tokens)),
        tool_calls: if tool_calls.is_empty() { None } else { Some(tool_calls) },
        continuation: None,
    })
}

/// Assemble a canonical response from a chat-completions SSE stream
///
/// Fragments of `choices[].delta.tool_calls[i]` accumulate by index until a
/// `finish_reason` or the `[DONE]` sentinel closes the stream.
pub fn collect_stream(events: &[SseEvent]) -> Result<StreamOutcome, Error> {
    let mut text = String::new();
    let mut accumulator = ToolCallAccumulator::new();
    let mut model = String::new();
    let mut usage = None;
    let mut finish: Option<String> = None;

    for event in events {
        if event.is_done() {
            break;
        }
        let Ok(chunk) = event.json::<ChatStreamChunk>() else {
            continue;
        };

        if let Some(m) = chunk.model
            && model.is_empty()
        {
            model = m;
        }

        for choice in chunk.choices {
            if let Some(content) = choice.delta.content {
                text.push_str(&content);
            }
            for fragment in choice.delta.tool_calls.unwrap_or_default() {
                let name = fragment.function.as_ref().and_then(|f| f.name.as_deref());
                accumulator.start(fragment.index, fragment.id.as_deref(), name);
                if let Some(arguments) = fragment.function.as_ref().and_then(|f| f.arguments.as_deref()) {
                    accumulator.append(fragment.index, arguments);
                }
            }
            if choice.finish_reason.is_some() {
                finish = choice.finish_reason;
            }
        }

        if chunk.usage.is_some() {
            usage = chunk.usage;
        }
    }

    let (tool_calls, warnings) = accumulator.finish();

    let finish_reason = if tool_calls.is_empty() {
        finish.as_deref().map_or(FinishReason::Stop, FinishReason::from_vendor)
    } else {
        FinishReason::ToolCalls
    };

    Ok(StreamOutcome {
        response: ChatResponse {
            content: text,
            model,
            finish_reason,
            usage: usage.map_or_else(Usage::default, |u| Usage::new(u.prompt_tokens, u.completion_tokens)),
            tool_calls: if tool_calls.is_empty() { None } else { Some(tool_calls) },
            continuation: None,
        },
        warnings,
    })
}
