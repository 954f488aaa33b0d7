//! Anthropic dialect tests

use llmv_domain::{
    AuthScheme, Capability, CredentialRef, ModelRef, ProbeErrorKind, ProbeExecutor, ProbeKind,
    Provider, ProviderDialect,
};
use llmv_providers::HttpProbeExecutor;
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;

const DEADLINE: Duration = Duration::from_secs(5);

fn provider(url: &str) -> Provider {
    Provider::new("anthropic", url)
        .with_dialect(ProviderDialect::Anthropic)
        .with_auth_scheme(AuthScheme::ApiKeyHeader)
        .with_credential(CredentialRef::new("ak-test"))
}

fn target() -> ModelRef {
    ModelRef::new("anthropic", "claude-sonnet")
}

#[tokio::test]
async fn test_existence_looks_up_the_model() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/models/claude-sonnet")
        .match_header("x-api-key", "ak-test")
        .match_header("anthropic-version", "2023-06-01")
        .with_status(200)
        .with_body(json!({ "id": "claude-sonnet", "type": "model" }).to_string())
        .create_async()
        .await;

    let outcome = HttpProbeExecutor::default()
        .probe(&provider(&server.url()), &target(), &ProbeKind::Existence, DEADLINE)
        .await
        .unwrap();

    assert!(outcome.success);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_model_is_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v1/models/claude-sonnet")
        .with_status(404)
        .with_body(json!({ "type": "error", "error": { "type": "not_found_error" } }).to_string())
        .create_async()
        .await;

    let outcome = HttpProbeExecutor::default()
        .probe(&provider(&server.url()), &target(), &ProbeKind::Existence, DEADLINE)
        .await
        .unwrap();

    assert_eq!(outcome.error_kind(), Some(ProbeErrorKind::NotFound));
    assert_eq!(outcome.http_status, Some(404));
}

#[tokio::test]
async fn test_tool_use_block_passes() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/messages")
        .match_body(Matcher::PartialJson(json!({ "model": "claude-sonnet" })))
        .with_status(200)
        .with_body(
            json!({
                "content": [
                    { "type": "text", "text": "Checking." },
                    { "type": "tool_use", "id": "tu_1", "name": "get_current_weather", "input": { "location": "New York" } }
                ]
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
}

#[tokio::test]
async fn test_embeddings_are_unsupported_without_a_request() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", Matcher::Any).expect(0).create_async().await;

    let outcome = HttpProbeExecutor::default()
        .probe(
            &provider(&server.url()),
            &target(),
            &ProbeKind::Feature(Capability::Embeddings),
            DEADLINE,
        )
        .await
        .unwrap();

    assert_eq!(outcome.error_kind(), Some(ProbeErrorKind::Unsupported));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_overloaded_is_a_server_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/v1/messages")
        .with_status(529)
        .with_header("retry-after", "3")
        .with_body(json!({ "type": "error", "error": { "type": "overloaded_error" } }).to_string())
        .create_async()
        .await;

    let outcome = HttpProbeExecutor::default()
        .probe(&provider(&server.url()), &target(), &ProbeKind::Responsiveness, DEADLINE)
        .await
        .unwrap();

    let error = outcome.error.unwrap();
    assert_eq!(error.kind, ProbeErrorKind::ServerError);
    assert_eq!(error.retry_after_secs, Some(3));
}

#[tokio::test]
async fn test_model_list_asks_for_the_full_page() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/models")
        .match_query(Matcher::UrlEncoded("limit".into(), "1000".into()))
        .match_header("x-api-key", "ak-test")
        .match_header("anthropic-version", "2023-06-01")
        .with_status(200)
        .with_body(
            json!({ "data": [{ "id": "claude-haiku", "type": "model" }, { "id": "claude-sonnet", "type": "model" }] })
                .to_string(),
        )
        .create_async()
        .await;

    let models = HttpProbeExecutor::default()
        .list_models(&provider(&server.url()), DEADLINE)
        .await
        .unwrap();

    assert_eq!(models, vec!["claude-haiku".to_string(), "claude-sonnet".to_string()]);
    mock.assert_async().await;
}
