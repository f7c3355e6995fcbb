mod harness;

use harness::mock_vendor::MockVendor;

use chorus_llm::types::FinishReason;
use chorus_llm::{ChatRequest, Client, ToolDefinition, ToolResult, Vendor};

fn weather_request(model: &str) -> ChatRequest {
    ChatRequest {
        tools: Some(vec![ToolDefinition {
            name: "get_weather".to_owned(),
            description: Some("Current weather for a city".to_owned()),
            parameters: Some(serde_json::json!({
                "type": "object",
                "properties": {"city": {"type": "string"}}
            })),
        }]),
        ..ChatRequest::user(model, "What's the weather in Paris?")
    }
}

#[tokio::test]
async fn openai_continuation_sends_token_and_results_only() {
    // Turn 1 (streaming): the model requests a tool call and the response id
    // becomes the continuation token
    let sse = "\
event: response.output_item.done\n\
data: {\"type\":\"response.output_item.done\",\"item\":{\"type\":\"function_call\",\"id\":\"fc_1\",\"call_id\":\"call_1\",\"name\":\"get_weather\",\"arguments\":\"{\\\"city\\\":\\\"Paris\\\"}\",\"status\":\"completed\"}}\n\n\
event: response.completed\n\
data: {\"type\":\"response.completed\",\"response\":{\"id\":\"resp_1\",\"status\":\"completed\",\"model\":\"gpt-4o\",\"output\":[],\"usage\":{\"input_tokens\":15,\"output_tokens\":8,\"total_tokens\":23}}}\n\n";

    // Turn 2 (non-streaming): the finalized answer
    let turn2 = serde_json::json!({
        "id": "resp_2",
        "status": "completed",
        "model": "gpt-4o",
        "output": [{"type": "message", "id": "msg_1", "content": [
            {"type": "output_text", "text": "15°C and cloudy in Paris."}
        ]}],
        "usage": {"input_tokens": 30, "output_tokens": 12, "total_tokens": 42}
    });

    let mock = MockVendor::builder().sse(sse).json(turn2).start().await.unwrap();
    let client = Client::new(mock.config());

    let request = weather_request("gpt-4o");
    let mut sink = |_: &[u8]| {};
    let response = client.stream_request(Vendor::OpenAi, &request, &mut sink).await.unwrap();

    assert!(response.needs_continuation());
    assert_eq!(response.continuation.as_deref(), Some("resp_1"));
    let call = &response.tool_calls.as_ref().unwrap()[0];
    assert_eq!(call.id, "call_1");

    // Execute the tool, build the follow-up, run turn 2
    let state = Client::after_turn(Vendor::OpenAi, &request, &response);
    let results = vec![ToolResult {
        tool_call_id: call.id.clone(),
        content: "15°C, cloudy".to_owned(),
    }];
    let next = Client::continue_with_tool_results(&state, &results).unwrap();
    let final_response = client.request(Vendor::OpenAi, &next).await.unwrap();

    assert_eq!(final_response.content, "15°C and cloudy in Paris.");
    assert_eq!(final_response.finish_reason, FinishReason::Stop);

    // The follow-up carried only the token and the tool result, not the
    // original user message
    let body = mock.body(1).unwrap();
    assert_eq!(body["previous_response_id"], "resp_1");
    let input = body["input"].as_array().unwrap();
    assert_eq!(input.len(), 1);
    assert_eq!(input[0]["type"], "function_call_output");
    assert_eq!(input[0]["call_id"], "call_1");
    assert_eq!(input[0]["output"], "15°C, cloudy");
}

#[tokio::test]
async fn history_rebuild_continuation_resends_the_conversation() {
    // Turn 1 (streaming) on the chat dialect: a tool call via delta fragments
    let sse = "\
data: {\"id\":\"c1\",\"model\":\"grok-3\",\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\",\"tool_calls\":[{\"index\":0,\"id\":\"call_1\",\"function\":{\"name\":\"get_weather\",\"arguments\":\"{\\\"city\\\":\\\"Paris\\\"}\"}}]}}]}\n\n\
data: {\"choices\":[{\"index\":0,\"delta\":{},\"finish_reason\":\"tool_calls\"}]}\n\n\
data: [DONE]\n\n";

    let turn2 = serde_json::json!({
        "id": "chatcmpl-2",
        "model": "grok-3",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "15°C and cloudy in Paris."},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 40, "completion_tokens": 10, "total_tokens": 50}
    });

    let mock = MockVendor::builder().sse(sse).json(turn2).start().await.unwrap();
    let client = Client::new(mock.config());

    let request = weather_request("grok-3");
    let mut sink = |_: &[u8]| {};
    let response = client.stream_request(Vendor::Grok, &request, &mut sink).await.unwrap();

    assert!(response.needs_continuation());
    assert!(response.continuation.is_none());

    let state = Client::after_turn(Vendor::Grok, &request, &response);
    let results = vec![ToolResult {
        tool_call_id: "call_1".to_owned(),
        content: "15°C, cloudy".to_owned(),
    }];
    let next = Client::continue_with_tool_results(&state, &results).unwrap();
    let final_response = client.request(Vendor::Grok, &next).await.unwrap();

    assert_eq!(final_response.content, "15°C and cloudy in Paris.");

    // The follow-up resent the whole conversation: user message, the
    // assistant tool-call turn, and the tool result
    let body = mock.body(1).unwrap();
    assert!(body.get("previous_response_id").is_none());
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "What's the weather in Paris?");
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[1]["tool_calls"][0]["id"], "call_1");
    assert_eq!(messages[2]["role"], "tool");
    assert_eq!(messages[2]["tool_call_id"], "call_1");
    assert_eq!(messages[2]["content"], "15°C, cloudy");
}
