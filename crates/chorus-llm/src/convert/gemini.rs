//! Gemini Generative Language API adapter
//!
//! Roles map to "user"/"model", the system instruction is a top-level
//! role-less content, and function calls arrive complete inside a single
//! part — the completed-item extraction strategy. Gemini assigns no call
//! ids, so ids are generated at extraction and mapped back to function
//! names on encode.

use std::collections::HashMap;

use crate::convert::{StreamOutcome, clamp_temperature, envelope_error};
use crate::error::Error;
use crate::extract::{CompletedCalls, generated_call_id};
use crate::protocol::gemini::{
    FunctionCallingConfig, FunctionDeclaration, GeminiContent, GeminiFunctionCall, GeminiFunctionResponse, GeminiPart,
    GeminiTool, GenerateRequest, GenerateResponse, GenerationConfig, InlineData, ToolConfig,
};
use crate::sse::SseEvent;
use crate::types::{
    ChatRequest, ChatResponse, Content, ContentPart, FinishReason, Message, Role, ToolCall, ToolChoice,
    ToolChoiceMode, Usage,
};
use crate::vendor::Vendor;

/// Encode a canonical request into `generateContent` wire JSON
pub fn encode(request: &ChatRequest) -> Result<serde_json::Value, Error> {
    // Tool results reference calls by name, not id; recover names from the
    // assistant turns in the same history
    let call_names: HashMap<&str, &str> = request
        .messages
        .iter()
        .filter_map(|m| m.tool_calls.as_ref())
        .flatten()
        .map(|call| (call.id.as_str(), call.name.as_str()))
        .collect();

    let mut system_instruction = None;
    let mut contents = Vec::new();

    for msg in &request.messages {
        match msg.role {
            Role::System => {
                system_instruction = Some(GeminiContent {
                    role: None,
                    parts: vec![GeminiPart::Text(msg.content.as_text())],
                });
            }
            Role::User => contents.push(encode_message(msg, "user")),
            Role::Assistant => contents.push(encode_message(msg, "model")),
            Role::Tool => {
                let call_id = msg.tool_call_id.clone().ok_or_else(|| {
                    Error::InvalidRequest("tool message is missing tool_call_id".to_owned())
                })?;
                let name = call_names.get(call_id.as_str()).copied().unwrap_or(call_id.as_str());
                let text = msg.content.as_text();
                let response = serde_json::from_str(&text)
                    .unwrap_or_else(|_| serde_json::json!({"result": text}));
                contents.push(GeminiContent {
                    role: Some("function".to_owned()),
                    parts: vec![GeminiPart::FunctionResponse(GeminiFunctionResponse {
                        name: name.to_owned(),
                        response,
                    })],
                });
            }
        }
    }

    let tools = request.tools.as_ref().map(|tools| {
        vec![GeminiTool {
            function_declarations: tools
                .iter()
                .map(|t| FunctionDeclaration {
                    name: t.name.clone(),
                    description: t.description.clone(),
                    parameters: t.parameters.clone(),
                })
                .collect(),
        }]
    });

    let tool_config = request.tool_choice.as_ref().map(|tc| {
        let (mode, allowed_function_names) = match tc {
            ToolChoice::Mode(ToolChoiceMode::None) => ("NONE", None),
            ToolChoice::Mode(ToolChoiceMode::Auto) => ("AUTO", None),
            ToolChoice::Mode(ToolChoiceMode::Required) => ("ANY", None),
            ToolChoice::Tool { name } => ("ANY", Some(vec![name.clone()])),
        };
        ToolConfig {
            function_calling_config: FunctionCallingConfig {
                mode: mode.to_owned(),
                allowed_function_names,
            },
        }
    });

    let wire = GenerateRequest {
        contents,
        system_instruction,
        generation_config: Some(GenerationConfig {
            temperature: clamp_temperature(Vendor::Gemini, request.params.temperature),
            top_p: request.params.top_p,
            max_output_tokens: request.params.max_tokens,
            stop_sequences: request.params.stop.clone(),
        }),
        tools,
        tool_config,
    };

    serde_json::to_value(&wire).map_err(|e| Error::InvalidRequest(e.to_string()))
}

fn encode_message(msg: &Message, role: &str) -> GeminiContent {
    let mut parts = Vec::new();

    match &msg.content {
        Content::Text(text) => {
            if !text.is_empty() {
                parts.push(GeminiPart::Text(text.clone()));
            }
        }
        Content::Parts(content_parts) => {
            for part in content_parts {
                match part {
                    ContentPart::Text { text } => parts.push(GeminiPart::Text(text.clone())),
                    ContentPart::Image { url, .. } => {
                        // Only data URIs can be inlined; Gemini takes no image URLs here
                        if let Some(rest) = url.strip_prefix("data:")
                            && let Some((mime_and_encoding, data)) = rest.split_once(',')
                        {
                            let mime_type = mime_and_encoding.strip_suffix(";base64").unwrap_or(mime_and_encoding);
                            parts.push(GeminiPart::InlineData(InlineData {
                                mime_type: mime_type.to_owned(),
                                data: data.to_owned(),
                            }));
                        }
                    }
                }
            }
        }
    }

    if let Some(calls) = &msg.tool_calls {
        for call in calls {
            let args = serde_json::from_str(&call.arguments).unwrap_or_else(|_| serde_json::json!({}));
            parts.push(GeminiPart::FunctionCall(GeminiFunctionCall {
                name: call.name.clone(),
                args,
            }));
        }
    }

    // The API rejects empty part lists
    if parts.is_empty() {
        parts.push(GeminiPart::Text(String::new()));
    }

    GeminiContent {
        role: Some(role.to_owned()),
        parts,
    }
}

/// Decode a non-streaming `generateContent` body
pub fn decode(body: &[u8]) -> Result<ChatResponse, Error> {
    let wire: GenerateResponse =
        serde_json::from_slice(body).map_err(|e| envelope_error(Vendor::Gemini, &e))?;

    let mut content = String::new();
    let mut completed = CompletedCalls::new();
    let mut finish: Option<String> = None;

    if let Some(candidate) = wire.candidates.first() {
        for part in &candidate.content.parts {
            match part {
                GeminiPart::Text(text) => content.push_str(text),
                GeminiPart::FunctionCall(fc) => completed.record(call_from_part(fc)),
                GeminiPart::InlineData(_) | GeminiPart::FunctionResponse(_) => {}
            }
        }
        finish.clone_from(&candidate.finish_reason);
    }

    Ok(assemble(content, completed.finish(), finish, wire.usage_metadata, wire.model_version))
}

/// Assemble a canonical response from a `streamGenerateContent` SSE stream
///
/// Each event payload is a full response envelope; text parts accumulate and
/// function-call parts are complete on arrival.
pub fn collect_stream(events: &[SseEvent]) -> Result<StreamOutcome, Error> {
    let mut content = String::new();
    let mut completed = CompletedCalls::new();
    let mut finish: Option<String> = None;
    let mut usage = None;
    let mut model = None;

    for event in events {
        if event.is_done() {
            break;
        }
        let Ok(chunk) = event.json::<GenerateResponse>() else {
            continue;
        };

        for candidate in &chunk.candidates {
            for part in &candidate.content.parts {
                match part {
                    GeminiPart::Text(text) => content.push_str(text),
                    GeminiPart::FunctionCall(fc) => completed.record(call_from_part(fc)),
                    GeminiPart::InlineData(_) | GeminiPart::FunctionResponse(_) => {}
                }
            }
            if candidate.finish_reason.is_some() {
                finish.clone_from(&candidate.finish_reason);
            }
        }

        if chunk.usage_metadata.is_some() {
            usage = chunk.usage_metadata;
        }
        if chunk.model_version.is_some() {
            model = chunk.model_version;
        }
    }

    Ok(StreamOutcome {
        response: assemble(content, completed.finish(), finish, usage, model),
        warnings: Vec::new(),
    })
}

fn call_from_part(fc: &GeminiFunctionCall) -> ToolCall {
    ToolCall {
        id: generated_call_id(),
        name: fc.name.clone(),
        arguments: serde_json::to_string(&fc.args).unwrap_or_else(|_| "{}".to_owned()),
    }
}

fn assemble(
    content: String,
    tool_calls: Vec<ToolCall>,
    finish: Option<String>,
    usage: Option<crate::protocol::gemini::UsageMetadata>,
    model: Option<String>,
) -> ChatResponse {
    let finish_reason = if tool_calls.is_empty() {
        finish.as_deref().map_or(FinishReason::Stop, FinishReason::from_vendor)
    } else {
        FinishReason::ToolCalls
    };

    let usage = usage.map_or_else(Usage::default, |u| Usage {
        prompt_tokens: u.prompt_token_count,
        completion_tokens: u.candidates_token_count,
        total_tokens: u.total_token_count,
    });

    ChatResponse {
        content,
        model: model.unwrap_or_default(),
        finish_reason,
        usage,
        tool_calls: if tool_calls.is_empty() { None } else { Some(tool_calls) },
        continuation: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GenerationParams, ToolDefinition};

    #[test]
    fn encode_uses_gemini_field_names() {
        let request = ChatRequest {
            model: "gemini-2.0-flash".to_owned(),
            messages: vec![
                Message::text(Role::System, "Answer briefly."),
                Message::text(Role::User, "What's the weather in Paris?"),
            ],
            params: GenerationParams {
                temperature: Some(0.7),
                max_tokens: Some(512),
                ..GenerationParams::default()
            },
            tools: Some(vec![ToolDefinition {
                name: "get_weather".to_owned(),
                description: None,
                parameters: None,
            }]),
            tool_choice: Some(ToolChoice::Tool { name: "get_weather".to_owned() }),
            stream: false,
            previous_response: None,
        };

        let wire = encode(&request).unwrap();
        assert_eq!(wire["systemInstruction"]["parts"][0]["text"], "Answer briefly.");
        assert_eq!(wire["generationConfig"]["maxOutputTokens"], 512);
        assert_eq!(wire["contents"][0]["role"], "user");
        assert_eq!(wire["tools"][0]["functionDeclarations"][0]["name"], "get_weather");
        assert_eq!(wire["toolConfig"]["functionCallingConfig"]["mode"], "ANY");
        assert_eq!(
            wire["toolConfig"]["functionCallingConfig"]["allowedFunctionNames"][0],
            "get_weather"
        );
    }

    #[test]
    fn encode_maps_tool_result_back_to_function_name() {
        let request = ChatRequest {
            model: "gemini-2.0-flash".to_owned(),
            messages: vec![
                Message::text(Role::User, "Weather in Paris?"),
                Message {
                    role: Role::Assistant,
                    content: Content::Text(String::new()),
                    tool_calls: Some(vec![ToolCall {
                        id: "call_generated".to_owned(),
                        name: "get_weather".to_owned(),
                        arguments: "{\"city\":\"Paris\"}".to_owned(),
                    }]),
                    tool_call_id: None,
                },
                Message::tool_result("call_generated", "{\"temp\":\"15C\"}"),
            ],
            params: GenerationParams::default(),
            tools: None,
            tool_choice: None,
            stream: false,
            previous_response: None,
        };

        let wire = encode(&request).unwrap();
        let contents = wire["contents"].as_array().unwrap();

        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["functionCall"]["name"], "get_weather");

        assert_eq!(contents[2]["role"], "function");
        let fr = &contents[2]["parts"][0]["functionResponse"];
        // Name resolved from the assistant turn, not the opaque id
        assert_eq!(fr["name"], "get_weather");
        assert_eq!(fr["response"]["temp"], "15C");
    }

    #[test]
    fn decode_generates_ids_for_function_calls() {
        let body = serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"functionCall": {"name": "get_weather", "args": {"city": "Paris"}}}
                ]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 9, "candidatesTokenCount": 4, "totalTokenCount": 13}
        });

        let response = decode(serde_json::to_vec(&body).unwrap().as_slice()).unwrap();
        assert_eq!(response.finish_reason, FinishReason::ToolCalls);
        assert_eq!(response.usage, Usage::new(9, 4));
        let calls = response.tool_calls.unwrap();
        assert!(calls[0].id.starts_with("call_"));
        assert_eq!(calls[0].name, "get_weather");
    }

    fn sse(data: serde_json::Value) -> SseEvent {
        SseEvent {
            event: "message".to_owned(),
            data: data.to_string(),
        }
    }

    #[test]
    fn stream_accumulates_text_across_chunks() {
        let events = vec![
            sse(serde_json::json!({"candidates": [{"content": {"role": "model",
                "parts": [{"text": "The weather "}]}}]})),
            sse(serde_json::json!({"candidates": [{"content": {"role": "model",
                "parts": [{"text": "is mild."}]}, "finishReason": "STOP"}],
                "usageMetadata": {"promptTokenCount": 5, "candidatesTokenCount": 6,
                                  "totalTokenCount": 11}})),
        ];

        let outcome = collect_stream(&events).unwrap();
        assert_eq!(outcome.response.content, "The weather is mild.");
        assert_eq!(outcome.response.finish_reason, FinishReason::Stop);
        assert_eq!(outcome.response.usage.total_tokens, 11);
    }

    #[test]
    fn safety_finish_maps_to_content_filter() {
        let events = vec![sse(serde_json::json!({"candidates": [{
            "content": {"role": "model", "parts": []},
            "finishReason": "SAFETY"}]}))];

        let outcome = collect_stream(&events).unwrap();
        assert_eq!(outcome.response.finish_reason, FinishReason::ContentFilter);
    }
}
