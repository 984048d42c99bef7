//! Mock endpoint tests for the Bedrock `InvokeModel` round trip
//!
//! Response bodies follow the per-vendor examples in the Bedrock model
//! parameter reference.

use bedrock_llm::{
    config::models, BedrockClient, BedrockConfig, BedrockError, BedrockLlm, CallOptions,
    FinishReason, LlmOptions, Message, MessageContent, Role,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> BedrockConfig {
    BedrockConfig {
        endpoint: Some(server.uri()),
        api_key: Some("test-api-key".into()),
        ..BedrockConfig::default()
    }
}

#[tokio::test]
async fn test_anthropic_round_trip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(
            "/model/anthropic.claude-3-haiku-20240307-v1%3A0/invoke",
        ))
        .and(header("Authorization", "Bearer test-api-key"))
        .and(header("Content-Type", "application/json"))
        .and(header("Accept", "*/*"))
        .and(body_json(json!({
            "anthropic_version": "bedrock-2023-05-31",
            "max_tokens": 200,
            "system": "You are a chatbot.",
            "messages": [
                {"role": "user", "content": [{"type": "text", "text": "Explain AI in 10 words or less."}]}
            ],
            "temperature": 0.5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_bdrk_01",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": "Machines learning patterns to mimic human thinking."}],
            "stop_reason": "end_turn",
            "stop_sequence": null,
            "usage": {"input_tokens": 22, "output_tokens": 11}
        })))
        .mount(&mock_server)
        .await;

    let llm = BedrockLlm::new(
        LlmOptions::new()
            .with_config(config_for(&mock_server))
            .with_model(models::ANTHROPIC_CLAUDE_3_HAIKU),
    )
    .unwrap();

    let messages = vec![
        MessageContent::system("You are a chatbot."),
        MessageContent::human("Explain AI in 10 words or less."),
    ];
    let response = llm
        .generate_content(
            &messages,
            CallOptions::default()
                .with_max_tokens(200)
                .with_temperature(0.5),
        )
        .await
        .unwrap();

    assert_eq!(response.choices.len(), 1);
    let choice = &response.choices[0];
    assert_eq!(
        choice.content,
        "Machines learning patterns to mimic human thinking."
    );
    assert_eq!(choice.finish_reason(), FinishReason::Stop);
    assert_eq!(choice.generation_info["input_tokens"], 22);
}

#[tokio::test]
async fn test_titan_multiple_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/model/amazon.titan-text-express-v1/invoke"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "inputTextTokenCount": 10,
            "results": [
                {"tokenCount": 2, "outputText": " John Adams", "completionReason": "FINISH"},
                {"tokenCount": 5, "outputText": " The second", "completionReason": "LENGTH"}
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = BedrockClient::from_config(&config_for(&mock_server)).unwrap();
    let response = client
        .create_completion(
            models::AMAZON_TITAN_TEXT_EXPRESS_V1,
            &[Message::text(
                Role::Human,
                "Who is the second president of the United States?",
            )],
            &CallOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(response.choices.len(), 2);
    assert_eq!(response.choices[1].finish_reason(), FinishReason::Length);

    let requests = mock_server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body["inputText"],
        "User: Who is the second president of the United States?\n\nBot:"
    );
}

#[tokio::test]
async fn test_throttling_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/model/meta.llama2-70b-chat-v1/invoke"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "message": "Too many requests, please wait before trying again.",
            "__type": "ThrottlingException"
        })))
        .mount(&mock_server)
        .await;

    let client = BedrockClient::from_config(&config_for(&mock_server)).unwrap();
    let err = client
        .create_completion(
            models::META_LLAMA2_70B_CHAT_V1,
            &[Message::text(Role::Human, "Hi")],
            &CallOptions::default(),
        )
        .await
        .unwrap_err();

    match err {
        BedrockError::Throttled(message) => {
            assert_eq!(message, "Too many requests, please wait before trying again.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_keeps_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/model/cohere.command-text-v14/invoke"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "message": "Model is not ready",
            "__type": "ServiceUnavailableException"
        })))
        .mount(&mock_server)
        .await;

    let client = BedrockClient::from_config(&config_for(&mock_server)).unwrap();
    let err = client
        .create_completion(
            models::COHERE_COMMAND_TEXT_V14,
            &[Message::text(Role::Human, "Hi")],
            &CallOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        BedrockError::Api { status: 503, ref error_type, .. }
            if error_type.as_deref() == Some("ServiceUnavailableException")
    ));
}

#[tokio::test]
async fn test_malformed_response_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/model/ai21.j2-mid-v1/invoke"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = BedrockClient::from_config(&config_for(&mock_server)).unwrap();
    let err = client
        .create_completion(
            models::AI21_J2_MID_V1,
            &[Message::text(Role::Human, "Hi")],
            &CallOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, BedrockError::Json(_)));
}

#[tokio::test]
async fn test_extra_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/model/meta.llama2-13b-chat-v1/invoke"))
        .and(header("x-amz-security-token", "session-token"))
        .and(header("x-amz-date", "20240101T000000Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "generation": " Hello!",
            "prompt_token_count": 6,
            "generation_token_count": 2,
            "stop_reason": "stop"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = config_for(&mock_server);
    config.api_key = None;
    config
        .extra_headers
        .insert("x-amz-security-token".into(), "session-token".into());
    config
        .extra_headers
        .insert("x-amz-date".into(), "20240101T000000Z".into());

    let client = BedrockClient::from_config(&config).unwrap();
    let response = client
        .create_completion(
            models::META_LLAMA2_13B_CHAT_V1,
            &[Message::text(Role::Human, "Hi")],
            &CallOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(response.choices[0].content, " Hello!");

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}
