mod common;

use polytag_llm::ai21::Ai21Client;
use polytag_llm::build_ai21_client;
use polytag_llm::traits::{GenerationParams, LlmClient, LlmError};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Ai21Client {
    Ai21Client::with_endpoint(
        "test-key".into(),
        "j2-ultra".into(),
        &format!("{}/studio/v1", server.uri()),
        None,
    )
    .expect("client")
}

#[tokio::test]
async fn sends_fixed_generation_config_and_reads_completion() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/studio/v1/j2-ultra/complete"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_json(json!({
            "prompt": "\"text\" classify",
            "maxTokens": 20,
            "temperature": 0.3,
            "topP": 0.3,
            "stopSequences": [],
            "countPenalty": { "scale": 0.0 },
            "presencePenalty": { "scale": 0.0 },
            "frequencyPenalty": { "scale": 0.0 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cmpl-1",
            "completions": [
                { "data": { "text": "\nEconomy", "tokens": [{}] },
                  "finishReason": { "reason": "endoftext" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let params = GenerationParams::default().with_max_tokens(20);
    let resp = client.complete("\"text\" classify", &params).await.unwrap();

    assert_eq!(resp.text, "\nEconomy");
    assert_eq!(resp.model.as_deref(), Some("j2-ultra"));
    assert_eq!(resp.finish_reason.as_deref(), Some("endoftext"));
    assert_eq!(resp.tokens_used, Some(1));
}

#[tokio::test]
async fn missing_completions_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/studio/v1/j2-ultra/complete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "x" })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete("p", &GenerationParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::MalformedResponse(_)));
}

#[tokio::test]
async fn missing_text_field_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/studio/v1/j2-ultra/complete"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "completions": [ { "data": {} } ] })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete("p", &GenerationParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::MalformedResponse(_)));
}

#[tokio::test]
async fn service_error_is_an_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/studio/v1/j2-ultra/complete"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "detail": "upstream exploded" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete("p", &GenerationParams::default())
        .await
        .unwrap_err();
    match err {
        LlmError::Api(msg) => assert!(msg.contains("upstream exploded")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn empty_api_key_is_rejected() {
    let err = build_ai21_client(" ", "j2-ultra", "https://api.ai21.com/studio/v1", None)
        .err()
        .unwrap();
    assert!(matches!(err, LlmError::Config(_)));
}
