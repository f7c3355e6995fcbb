mod harness;

use harness::mock_vendor::MockVendor;

use chorus_llm::types::FinishReason;
use chorus_llm::{ChatRequest, Client, Error, Vendor};

#[tokio::test]
async fn anthropic_blocking_call_round_trips() {
    let body = serde_json::json!({
        "id": "msg_1",
        "content": [{"type": "text", "text": "Bonjour!"}],
        "model": "claude-sonnet-4-20250514",
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 8, "output_tokens": 3}
    });

    let mock = MockVendor::builder().json(body).start().await.unwrap();
    let client = Client::new(mock.config());

    let request = ChatRequest::user("claude-sonnet-4-20250514", "Say hello in French");
    let response = client.request(Vendor::Anthropic, &request).await.unwrap();

    assert_eq!(response.content, "Bonjour!");
    assert_eq!(response.finish_reason, FinishReason::Stop);
    assert_eq!(response.usage.prompt_tokens, 8);
    assert_eq!(response.usage.total_tokens, 11);

    // The wire request used Messages API conventions
    let sent = mock.body(0).unwrap();
    assert!(sent.get("max_tokens").is_some());
    assert_eq!(sent["messages"][0]["role"], "user");
}

#[tokio::test]
async fn gemini_blocking_call_uses_model_endpoint() {
    let body = serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "Bonjour!"}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 7, "candidatesTokenCount": 2, "totalTokenCount": 9},
        "modelVersion": "gemini-2.0-flash"
    });

    let mock = MockVendor::builder().json(body).start().await.unwrap();
    let client = Client::new(mock.config());

    let request = ChatRequest::user("gemini-2.0-flash", "Say hello in French");
    let response = client.request(Vendor::Gemini, &request).await.unwrap();

    assert_eq!(response.content, "Bonjour!");
    assert_eq!(response.model, "gemini-2.0-flash");
    assert_eq!(response.usage.total_tokens, 9);

    let sent = mock.body(0).unwrap();
    assert!(sent.get("contents").is_some());
    assert!(sent.get("generationConfig").is_some());
}

#[tokio::test]
async fn unrecognized_envelope_is_a_response_format_error() {
    let mock = MockVendor::builder()
        .json(serde_json::json!({"unexpected": "shape"}))
        .start()
        .await
        .unwrap();
    let client = Client::new(mock.config());

    let request = ChatRequest::user("claude-sonnet-4-20250514", "hi");
    let err = client.request(Vendor::Anthropic, &request).await.unwrap_err();

    assert!(matches!(err, Error::ResponseFormat(_)));
}

#[tokio::test]
async fn empty_messages_rejected_before_any_network_call() {
    let mock = MockVendor::builder().start().await.unwrap();
    let client = Client::new(mock.config());

    let request = ChatRequest {
        messages: Vec::new(),
        ..ChatRequest::user("grok-3", "x")
    };
    let err = client.request(Vendor::Grok, &request).await.unwrap_err();

    assert!(matches!(err, Error::InvalidRequest(_)));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn openrouter_requests_usage_accounting() {
    let body = serde_json::json!({
        "id": "gen-1",
        "model": "openrouter/auto",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "ok"},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}
    });

    let mock = MockVendor::builder().json(body).start().await.unwrap();
    let client = Client::new(mock.config());

    let request = ChatRequest::user("openrouter/auto", "hi");
    let response = client.request(Vendor::OpenRouter, &request).await.unwrap();
    assert_eq!(response.content, "ok");

    let sent = mock.body(0).unwrap();
    assert_eq!(sent["usage"]["include"], true);
}
