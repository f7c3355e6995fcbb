//! `OpenAI` Responses API adapter
//!
//! The Responses dialect renames `messages` to `input` and `max_tokens` to
//! `max_output_tokens`, hoists system messages into `instructions`, and
//! reports output as typed items. Tool calls arrive as completed
//! `function_call` items, and the response id is the continuation token for
//! server-side resumption via `previous_response_id`.

use crate::convert::{StreamOutcome, clamp_temperature, envelope_error};
use crate::error::Error;
use crate::extract::CompletedCalls;
use crate::protocol::openai::{
    InputItem, OutputContent, OutputItem, ResponsesRequest, ResponsesResponse, ResponsesStreamEvent, ResponsesTool,
};
use crate::sse::SseEvent;
use crate::types::{
    ChatRequest, ChatResponse, Content, ContentPart, FinishReason, Role, ToolCall, ToolChoice, ToolChoiceMode, Usage,
};
use crate::vendor::Vendor;

/// Encode a canonical request into Responses API wire JSON
pub fn encode(request: &ChatRequest) -> Result<serde_json::Value, Error> {
    let mut instructions = Vec::new();
    let mut input = Vec::new();

    for msg in &request.messages {
        match msg.role {
            Role::System => instructions.push(msg.content.as_text()),
            Role::Tool => {
                let call_id = msg.tool_call_id.clone().ok_or_else(|| {
                    Error::InvalidRequest("tool message is missing tool_call_id".to_owned())
                })?;
                input.push(InputItem::FunctionCallOutput {
                    call_id,
                    output: msg.content.as_text(),
                });
            }
            Role::User | Role::Assistant => {
                let role = if msg.role == Role::Assistant { "assistant" } else { "user" };

                // An assistant tool-call turn becomes explicit function_call
                // items so rebuilt history stays well-formed
                if let Some(calls) = &msg.tool_calls {
                    let text = msg.content.as_text();
                    if !text.is_empty() {
                        input.push(InputItem::Message {
                            role: role.to_owned(),
                            content: serde_json::Value::String(text),
                        });
                    }
                    for call in calls {
                        input.push(InputItem::FunctionCall {
                            id: None,
                            call_id: call.id.clone(),
                            name: call.name.clone(),
                            arguments: call.arguments.clone(),
                        });
                    }
                } else {
                    input.push(InputItem::Message {
                        role: role.to_owned(),
                        content: encode_content(&msg.content, msg.role),
                    });
                }
            }
        }
    }

    let tools = request.tools.as_ref().map(|tools| {
        tools
            .iter()
            .map(|t| ResponsesTool {
                tool_type: "function".to_owned(),
                name: t.name.clone(),
                description: t.description.clone(),
                parameters: t.parameters.clone(),
            })
            .collect()
    });

    let wire = ResponsesRequest {
        model: request.model.clone(),
        input,
        instructions: if instructions.is_empty() {
            None
        } else {
            Some(instructions.join("\n\n"))
        },
        temperature: clamp_temperature(Vendor::OpenAi, request.params.temperature),
        top_p: request.params.top_p,
        max_output_tokens: request.params.max_tokens,
        tools,
        tool_choice: request.tool_choice.as_ref().map(encode_tool_choice),
        stream: request.stream.then_some(true),
        previous_response_id: request.previous_response.clone(),
    };

    serde_json::to_value(&wire).map_err(|e| Error::InvalidRequest(e.to_string()))
}

/// Content for a message input item: plain string, or typed parts
fn encode_content(content: &Content, role: Role) -> serde_json::Value {
    match content {
        Content::Text(text) => serde_json::Value::String(text.clone()),
        Content::Parts(parts) => {
            let text_type = if role == Role::Assistant { "output_text" } else { "input_text" };
            let encoded: Vec<serde_json::Value> = parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => serde_json::json!({"type": text_type, "text": text}),
                    ContentPart::Image { url, detail } => serde_json::json!({
                        "type": "input_image",
                        "image_url": url,
                        "detail": detail.as_deref().unwrap_or("auto"),
                    }),
                })
                .collect();
            serde_json::Value::Array(encoded)
        }
    }
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
        ToolChoice::Tool { name } => serde_json::json!({"type": "function", "name": name}),
    }
}

/// Decode a non-streaming Responses API body
pub fn decode(body: &[u8]) -> Result<ChatResponse, Error> {
    let wire: ResponsesResponse =
        serde_json::from_slice(body).map_err(|e| envelope_error(Vendor::OpenAi, &e))?;
    Ok(response_from_wire(&wire))
}

/// Assemble a canonical response from a Responses API SSE stream
pub fn collect_stream(events: &[SseEvent]) -> Result<StreamOutcome, Error> {
    let mut text = String::new();
    let mut completed_calls = CompletedCalls::new();
    let mut final_response: Option<ResponsesResponse> = None;

    for event in events {
        if event.is_done() {
            break;
        }
        // Undecodable events are skipped; the stream keeps going
        let Ok(payload) = event.json::<ResponsesStreamEvent>() else {
            continue;
        };
        let event_type = payload.event_type.as_deref().unwrap_or(event.event.as_str());

        match event_type {
            "response.output_text.delta" => {
                if let Some(delta) = &payload.delta {
                    text.push_str(delta);
                }
            }
            "response.output_item.done" => {
                if let Some(OutputItem::FunctionCall { call_id, name, arguments, status, .. }) = payload.item
                    && status.as_deref() != Some("in_progress")
                {
                    completed_calls.record(ToolCall {
                        id: call_id,
                        name,
                        arguments,
                    });
                }
            }
            "response.completed" | "response.failed" | "response.incomplete" => {
                final_response = payload.response;
            }
            _ => {}
        }
    }

    let Some(wire) = final_response else {
        return Err(Error::ResponseFormat(
            "openai stream ended without a terminal response event".to_owned(),
        ));
    };

    let mut response = response_from_wire(&wire);

    // Prefer incrementally streamed text; the completed envelope is the
    // fallback for responses without text deltas
    if !text.is_empty() {
        response.content = text;
    }

    // Completion events already observed win over the envelope copy
    if !completed_calls.is_empty() {
        for call in extract_tool_calls(&wire) {
            completed_calls.record(call);
        }
        let calls = completed_calls.finish();
        response.finish_reason = FinishReason::ToolCalls;
        response.tool_calls = Some(calls);
    }

    Ok(StreamOutcome {
        response,
        warnings: Vec::new(),
    })
}

/// Map a wire envelope to the canonical response
fn response_from_wire(wire: &ResponsesResponse) -> ChatResponse {
    let mut text = String::new();
    for item in &wire.output {
        if let OutputItem::Message { content, .. } = item {
            for part in content {
                match part {
                    OutputContent::OutputText { text: t } => text.push_str(t),
                    OutputContent::Refusal { refusal } => text.push_str(refusal),
                    OutputContent::Unknown => {}
                }
            }
        }
    }

    let tool_calls = extract_tool_calls(wire);

    let finish_reason = if tool_calls.is_empty() {
        match wire.status.as_deref() {
            Some("completed") | None => FinishReason::Stop,
            Some("incomplete") => {
                let reason = wire.incomplete_details.as_ref().and_then(|d| d.reason.as_deref());
                if reason == Some("max_output_tokens") {
                    FinishReason::Length
                } else {
                    FinishReason::Other(reason.unwrap_or("incomplete").to_owned())
                }
            }
            Some(other) => FinishReason::Other(other.to_owned()),
        }
    } else {
        FinishReason::ToolCalls
    };

    let usage = wire
        .usage
        .as_ref()
        .map_or_else(Usage::default, |u| Usage::new(u.input_tokens, u.output_tokens));

    ChatResponse {
        content: text,
        model: wire.model.clone().unwrap_or_default(),
        finish_reason,
        usage,
        tool_calls: if tool_calls.is_empty() { None } else { Some(tool_calls) },
        continuation: Some(wire.id.clone()),
    }
}

/// Completed function-call items within a response envelope
fn extract_tool_calls(wire: &ResponsesResponse) -> Vec<ToolCall> {
    let mut completed = CompletedCalls::new();
    for item in &wire.output {
        if let OutputItem::FunctionCall { call_id, name, arguments, status, .. } = item
            && status.as_deref() != Some("in_progress")
        {
            completed.record(ToolCall {
                id: call_id.clone(),
                name: name.clone(),
                arguments: arguments.clone(),
            });
        }
    }
    completed.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GenerationParams, Message, ToolDefinition};

    fn weather_request() -> ChatRequest {
        ChatRequest {
            model: "gpt-4o".to_owned(),
            messages: vec![
                Message::text(Role::System, "Be terse."),
                Message::text(Role::User, "What's the weather in Paris?"),
            ],
            params: GenerationParams {
                temperature: Some(3.0),
                max_tokens: Some(256),
                ..GenerationParams::default()
            },
            tools: Some(vec![ToolDefinition {
                name: "get_weather".to_owned(),
                description: Some("Current weather for a city".to_owned()),
                parameters: Some(serde_json::json!({"type": "object"})),
            }]),
            tool_choice: None,
            stream: false,
            previous_response: None,
        }
    }

    #[test]
    fn encode_renames_fields_and_extracts_instructions() {
        let wire = encode(&weather_request()).unwrap();

        assert_eq!(wire["instructions"], "Be terse.");
        assert_eq!(wire["max_output_tokens"], 256);
        assert_eq!(wire["temperature"], 2.0); // clamped
        assert!(wire.get("messages").is_none());
        assert!(wire.get("max_tokens").is_none());
        // System message is not an input item
        assert_eq!(wire["input"].as_array().unwrap().len(), 1);
        assert_eq!(wire["tools"][0]["name"], "get_weather");
        assert_eq!(wire["tools"][0]["type"], "function");
    }

    #[test]
    fn encode_carries_previous_response_id() {
        let mut request = weather_request();
        request.previous_response = Some("resp_123".to_owned());
        request.messages = vec![Message::tool_result("call_1", "15°C, cloudy")];

        let wire = encode(&request).unwrap();
        assert_eq!(wire["previous_response_id"], "resp_123");
        let input = wire["input"].as_array().unwrap();
        assert_eq!(input.len(), 1);
        assert_eq!(input[0]["type"], "function_call_output");
        assert_eq!(input[0]["call_id"], "call_1");
        assert_eq!(input[0]["output"], "15°C, cloudy");
    }

    #[test]
    fn encode_rejects_tool_message_without_call_id() {
        let mut request = weather_request();
        request.messages = vec![Message {
            role: Role::Tool,
            content: Content::Text("orphan".to_owned()),
            tool_calls: None,
            tool_call_id: None,
        }];
        assert!(matches!(encode(&request), Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn decode_filters_typed_output_items() {
        let body = serde_json::json!({
            "id": "resp_abc",
            "status": "completed",
            "model": "gpt-4o",
            "output": [
                {"type": "reasoning", "id": "rs_1"},
                {"type": "message", "id": "msg_1", "content": [
                    {"type": "output_text", "text": "Hello "},
                    {"type": "output_text", "text": "world"}
                ]}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5, "total_tokens": 15}
        });

        let response = decode(serde_json::to_vec(&body).unwrap().as_slice()).unwrap();
        assert_eq!(response.content, "Hello world");
        assert_eq!(response.usage, Usage::new(10, 5));
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.continuation.as_deref(), Some("resp_abc"));
        assert!(response.tool_calls.is_none());
    }

    #[test]
    fn decode_extracts_completed_function_calls() {
        let body = serde_json::json!({
            "id": "resp_abc",
            "status": "completed",
            "model": "gpt-4o",
            "output": [
                {"type": "function_call", "id": "fc_1", "call_id": "call_1",
                 "name": "get_weather", "arguments": "{\"city\":\"Paris\"}",
                 "status": "completed"}
            ]
        });

        let response = decode(serde_json::to_vec(&body).unwrap().as_slice()).unwrap();
        assert_eq!(response.finish_reason, FinishReason::ToolCalls);
        let calls = response.tool_calls.unwrap();
        assert_eq!(calls[0].id, "call_1");
        assert_eq!(calls[0].name, "get_weather");
        assert_eq!(calls[0].arguments, "{\"city\":\"Paris\"}");
    }

    #[test]
    fn decode_rejects_unrecognized_envelope() {
        assert!(matches!(decode(b"[1,2,3]"), Err(Error::ResponseFormat(_))));
    }

    fn sse(event: &str, data: serde_json::Value) -> SseEvent {
        SseEvent {
            event: event.to_owned(),
            data: data.to_string(),
        }
    }

    #[test]
    fn stream_accumulates_deltas_and_completed_items() {
        let completed = serde_json::json!({
            "type": "response.completed",
            "response": {
                "id": "resp_1",
                "status": "completed",
                "model": "gpt-4o",
                "output": [],
                "usage": {"input_tokens": 7, "output_tokens": 3, "total_tokens": 10}
            }
        });
        let events = vec![
            sse("response.output_text.delta", serde_json::json!({"type": "response.output_text.delta", "delta": "Par"})),
            sse("response.output_text.delta", serde_json::json!({"type": "response.output_text.delta", "delta": "is"})),
            sse("response.completed", completed),
        ];

        let outcome = collect_stream(&events).unwrap();
        assert_eq!(outcome.response.content, "Paris");
        assert_eq!(outcome.response.usage, Usage::new(7, 3));
        assert_eq!(outcome.response.continuation.as_deref(), Some("resp_1"));
    }

    #[test]
    fn duplicate_completion_events_yield_one_call() {
        let item = serde_json::json!({
            "type": "response.output_item.done",
            "item": {"type": "function_call", "id": "fc_1", "call_id": "call_1",
                     "name": "get_weather", "arguments": "{}", "status": "completed"}
        });
        let completed = serde_json::json!({
            "type": "response.completed",
            "response": {"id": "resp_1", "status": "completed", "model": "gpt-4o", "output": []}
        });
        let events = vec![
            sse("response.output_item.done", item.clone()),
            sse("response.output_item.done", item),
            sse("response.completed", completed),
        ];

        let outcome = collect_stream(&events).unwrap();
        let calls = outcome.response.tool_calls.unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "call_1");
    }

    #[test]
    fn stream_without_terminal_event_is_structural_error() {
        let events = vec![sse(
            "response.output_text.delta",
            serde_json::json!({"type": "response.output_text.delta", "delta": "x"}),
        )];
        assert!(matches!(collect_stream(&events), Err(Error::ResponseFormat(_))));
    }
}
