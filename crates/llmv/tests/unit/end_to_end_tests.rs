//! Full pipeline against a mock provider
//!
//! Configuration → composition root → HTTP executor → report.

use llmv::cli::{self, RouteArgs, VerifyArgs};
use llmv_domain::{CircuitState, VerificationStatus};
use llmv_infrastructure::AppContext;
use llmv_infrastructure::config::{AppConfig, ProviderConfig};
use llmv_providers::{HttpProbeExecutor, InMemoryVerificationRepository};
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn config(url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.providers.push(ProviderConfig {
        name: "mock".to_string(),
        base_url: url.to_string(),
        ..ProviderConfig::default()
    });
    config.resilience.retry.max_attempts = 1;
    config.verification.features = vec!["json_mode".parse().unwrap()];
    config.verification.targets = vec!["mock/gpt-test".to_string(), "mock/gpt-missing".to_string()];
    config.storage.in_memory = true;
    config
}

#[tokio::test]
async fn test_verify_report_against_mock_provider() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/models")
        .with_status(200)
        .with_body(json!({ "data": [{ "id": "gpt-test" }] }).to_string())
        .expect(2)
        .create_async()
        .await;
    server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({ "response_format": { "type": "json_object" } })))
        .with_status(200)
        .with_body(
            json!({ "choices": [{ "message": { "role": "assistant", "content": "{\"name\":\"a\",\"value\":1}" } }] })
                .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({ "max_tokens": 10 })))
        .with_status(200)
        .with_body(json!({ "choices": [{ "message": { "role": "assistant", "content": "pong" } }] }).to_string())
        .create_async()
        .await;

    let repository = Arc::new(InMemoryVerificationRepository::new());
    let context = AppContext::with_components(
        config(&server.url()),
        Arc::new(HttpProbeExecutor::default()),
        repository.clone(),
    )
    .unwrap();

    let report = cli::verify(&context, &VerifyArgs::default(), CancellationToken::new()).await.unwrap();

    assert_eq!(report.summary.total, 2);
    assert_eq!(report.summary.verified, 1);
    assert!(!report.all_verified());

    let found = &report.results[0];
    assert_eq!(found.status, VerificationStatus::Verified);
    assert_eq!(found.responsive, Some(true));
    assert!(found.capabilities.supports(&"json_mode".parse().unwrap()));
    assert!(found.score.is_some());

    let missing = &report.results[1];
    assert_eq!(missing.status, VerificationStatus::Failed);
    assert_eq!(missing.model_exists, Some(false));

    assert_eq!(report.circuits.len(), 1);
    assert_eq!(report.circuits[0].state, CircuitState::Closed);
    assert_eq!(repository.len(), 2);

    let scored = cli::score(&context, &cli::ScoreArgs::default()).await.unwrap();
    assert_eq!(scored.len(), 2);
}

#[tokio::test]
async fn test_verify_without_targets_is_rejected() {
    let mut config = config("http://127.0.0.1:9");
    config.verification.targets.clear();
    let context = AppContext::with_components(
        config,
        Arc::new(HttpProbeExecutor::default()),
        Arc::new(InMemoryVerificationRepository::new()),
    )
    .unwrap();

    let error = cli::verify(&context, &VerifyArgs::default(), CancellationToken::new()).await.unwrap_err();
    assert!(error.is_contract_violation());
}

#[tokio::test]
async fn test_discovery_adds_listed_models() {
    let mut server = Server::new_async().await;
    let listing = server
        .mock("GET", "/models")
        .with_status(200)
        .with_body(json!({ "data": [{ "id": "gpt-listed" }, { "id": "gpt-test" }] }).to_string())
        .expect_at_least(1)
        .create_async()
        .await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(
            json!({ "choices": [{ "message": { "role": "assistant", "content": "{\"name\":\"a\",\"value\":1}" } }] })
                .to_string(),
        )
        .create_async()
        .await;

    let mut config = config(&server.url());
    config.verification.targets = vec!["mock/gpt-test".to_string()];
    let context = AppContext::with_components(
        config,
        Arc::new(HttpProbeExecutor::default()),
        Arc::new(InMemoryVerificationRepository::new()),
    )
    .unwrap();
    let args = VerifyArgs {
        discover: true,
        providers: vec!["mock".to_string()],
        ..VerifyArgs::default()
    };

    let report = cli::verify(&context, &args, CancellationToken::new()).await.unwrap();

    let targets: Vec<String> = report.results.iter().map(|r| r.target.to_string()).collect();
    assert_eq!(targets, vec!["mock/gpt-test", "mock/gpt-listed"]);
    assert!(report.all_verified());
    listing.assert_async().await;
}

#[tokio::test]
async fn test_discovery_rejects_unknown_provider() {
    let context = AppContext::with_components(
        config("http://127.0.0.1:9"),
        Arc::new(HttpProbeExecutor::default()),
        Arc::new(InMemoryVerificationRepository::new()),
    )
    .unwrap();
    let args = VerifyArgs {
        discover: true,
        providers: vec!["ghost".to_string()],
        ..VerifyArgs::default()
    };

    let error = cli::verify(&context, &args, CancellationToken::new()).await.unwrap_err();
    assert!(error.is_contract_violation());
}

#[tokio::test]
async fn test_route_ranks_providers_serving_the_model() {
    let mut config = config("https://primary.example.com/v1");
    config.providers.push(ProviderConfig {
        name: "backup".to_string(),
        base_url: "https://backup.example.com/v1".to_string(),
        weight: 0.5,
        ..ProviderConfig::default()
    });
    config.verification.targets = vec!["mock/llama-3".to_string(), "backup/llama-3".to_string()];
    let context = AppContext::with_components(
        config,
        Arc::new(HttpProbeExecutor::default()),
        Arc::new(InMemoryVerificationRepository::new()),
    )
    .unwrap();
    let args = RouteArgs {
        model: "llama-3".to_string(),
        check: false,
    };

    let report = cli::route(&context, &args, &CancellationToken::new()).await.unwrap();

    assert_eq!(report.selected.as_ref().map(|id| id.as_str()), Some("mock"));
    let ranked: Vec<&str> = report.ranking.iter().map(|r| r.provider_id.as_str()).collect();
    assert_eq!(ranked, vec!["mock", "backup"]);
    assert!(report.ranking.iter().all(|r| r.circuit == CircuitState::Closed));

    let missing = RouteArgs {
        model: "mistral".to_string(),
        check: false,
    };
    assert!(cli::route(&context, &missing, &CancellationToken::new()).await.is_err());
}
