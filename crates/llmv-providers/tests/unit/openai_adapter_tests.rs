//! OpenAI-compatible dialect tests
//!
//! Each test runs the real executor against a mockito server.

use llmv_domain::{
    Capability, CodeLanguage, CredentialRef, ModelRef, ProbeErrorKind, ProbeExecutor, ProbeKind,
    Provider,
};
use llmv_providers::HttpProbeExecutor;
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;

const DEADLINE: Duration = Duration::from_secs(5);

fn provider(url: &str) -> Provider {
    Provider::new("openai", url).with_credential(CredentialRef::new("sk-test"))
}

fn target() -> ModelRef {
    ModelRef::new("openai", "gpt-4o")
}

fn completion(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
    .to_string()
}

#[tokio::test]
async fn test_existence_finds_listed_model() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/models")
        .match_header("authorization", "Bearer sk-test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "data": [{ "id": "gpt-3.5" }, { "id": "gpt-4o" }] }).to_string())
        .create_async()
        .await;

    let outcome = HttpProbeExecutor::default()
        .probe(&provider(&server.url()), &target(), &ProbeKind::Existence, DEADLINE)
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.http_status, Some(200));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_existence_reports_unlisted_model_as_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/models")
        .with_status(200)
        .with_body(json!({ "data": [{ "id": "gpt-3.5" }] }).to_string())
        .create_async()
        .await;

    let outcome = HttpProbeExecutor::default()
        .probe(&provider(&server.url()), &target(), &ProbeKind::Existence, DEADLINE)
        .await
        .unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.error_kind(), Some(ProbeErrorKind::NotFound));
    assert!(outcome.has_latency_sample());
}

#[tokio::test]
async fn test_responsiveness_sends_minimal_prompt() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({ "model": "gpt-4o", "max_tokens": 10 })))
        .with_status(200)
        .with_body(completion("pong"))
        .create_async()
        .await;

    let outcome = HttpProbeExecutor::default()
        .probe(&provider(&server.url()), &target(), &ProbeKind::Responsiveness, DEADLINE)
        .await
        .unwrap();

    assert!(outcome.success);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_tool_use_requires_a_tool_call() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({ "tool_choice": "auto" })))
        .with_status(200)
        .with_body(
            json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_1",
                            "type": "function",
                            "function": { "name": "get_current_weather", "arguments": "{\"location\":\"New York\"}" }
                        }]
                    }
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let outcome = HttpProbeExecutor::default()
        .probe(
            &provider(&server.url()),
            &target(),
            &ProbeKind::Feature(Capability::ToolUse),
            DEADLINE,
        )
        .await
        .unwrap();

    assert!(outcome.success);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_plain_answer_to_tool_prompt_is_unsupported() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(completion("It is sunny in New York."))
        .create_async()
        .await;

    let outcome = HttpProbeExecutor::default()
        .probe(
            &provider(&server.url()),
            &target(),
            &ProbeKind::Feature(Capability::ToolUse),
            DEADLINE,
        )
        .await
        .unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.error_kind(), Some(ProbeErrorKind::Unsupported));
    assert_eq!(outcome.http_status, Some(200));
}

#[tokio::test]
async fn test_streaming_reads_server_sent_events() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({ "stream": true })))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body("data: {\"choices\":[{\"delta\":{\"content\":\"hello\"}}]}\n\ndata: [DONE]\n\n")
        .create_async()
        .await;

    let outcome = HttpProbeExecutor::default()
        .probe(
            &provider(&server.url()),
            &target(),
            &ProbeKind::Feature(Capability::Streaming),
            DEADLINE,
        )
        .await
        .unwrap();

    assert!(outcome.success);
}

#[tokio::test]
async fn test_json_mode_requires_a_json_object() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(
            json!({ "response_format": { "type": "json_object" } }),
        ))
        .with_status(200)
        .with_body(completion(r#"{"name":"probe","value":1}"#))
        .create_async()
        .await;

    let outcome = HttpProbeExecutor::default()
        .probe(
            &provider(&server.url()),
            &target(),
            &ProbeKind::Feature(Capability::JsonMode),
            DEADLINE,
        )
        .await
        .unwrap();

    assert!(outcome.success);
}

#[tokio::test]
async fn test_reasoning_and_code_generation_judge_the_answer() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("17 \\* 23".to_string()))
        .with_status(200)
        .with_body(completion("17 * 23 = 391"))
        .create_async()
        .await;
    server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Regex("Python".to_string()))
        .with_status(200)
        .with_body(completion("I would rather not."))
        .create_async()
        .await;

    let executor = HttpProbeExecutor::default();
    let provider = provider(&server.url());

    let reasoning = executor
        .probe(&provider, &target(), &ProbeKind::Feature(Capability::Reasoning), DEADLINE)
        .await
        .unwrap();
    assert!(reasoning.success);

    let code = executor
        .probe(
            &provider,
            &target(),
            &ProbeKind::Feature(Capability::CodeGeneration(CodeLanguage::Python)),
            DEADLINE,
        )
        .await
        .unwrap();
    assert_eq!(code.error_kind(), Some(ProbeErrorKind::Unsupported));
}

#[tokio::test]
async fn test_embeddings_use_the_embeddings_endpoint() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/embeddings")
        .match_body(Matcher::PartialJson(json!({ "input": "Hello world" })))
        .with_status(200)
        .with_body(json!({ "data": [{ "embedding": [0.1, 0.2, 0.3] }] }).to_string())
        .create_async()
        .await;

    let outcome = HttpProbeExecutor::default()
        .probe(
            &provider(&server.url()),
            &target(),
            &ProbeKind::Feature(Capability::Embeddings),
            DEADLINE,
        )
        .await
        .unwrap();

    assert!(outcome.success);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unknown_capability_sends_nothing() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;

    let outcome = HttpProbeExecutor::default()
        .probe(
            &provider(&server.url()),
            &target(),
            &ProbeKind::Feature(Capability::parse("telepathy")),
            DEADLINE,
        )
        .await
        .unwrap();

    assert_eq!(outcome.error_kind(), Some(ProbeErrorKind::Unsupported));
    assert!(!outcome.has_latency_sample());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_garbage_body_is_malformed() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let outcome = HttpProbeExecutor::default()
        .probe(&provider(&server.url()), &target(), &ProbeKind::Responsiveness, DEADLINE)
        .await
        .unwrap();

    assert_eq!(outcome.error_kind(), Some(ProbeErrorKind::MalformedResponse));
}

#[tokio::test]
async fn test_model_list_returns_every_listed_id() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/models")
        .match_header("authorization", "Bearer sk-test")
        .with_status(200)
        .with_body(
            json!({ "data": [{ "id": "gpt-4o" }, { "id": "text-embedding-3-small" }, { "object": "model" }] })
                .to_string(),
        )
        .create_async()
        .await;

    let models = HttpProbeExecutor::default()
        .list_models(&provider(&server.url()), DEADLINE)
        .await
        .unwrap();

    assert_eq!(models, vec!["gpt-4o".to_string(), "text-embedding-3-small".to_string()]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rejected_model_list_is_classified() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/models")
        .with_status(401)
        .with_body(json!({ "error": { "message": "bad key" } }).to_string())
        .create_async()
        .await;

    let error = HttpProbeExecutor::default()
        .list_models(&provider(&server.url()), DEADLINE)
        .await
        .unwrap_err();

    match error {
        llmv_domain::Error::Probe(probe) => assert_eq!(probe.kind, ProbeErrorKind::AuthError),
        other => panic!("unexpected error: {other}"),
    }
}
