//! Health checker tests

use crate::support::{StubExecutor, config};
use llmv_domain::CircuitState;
use llmv_infrastructure::AppContext;
use llmv_providers::InMemoryVerificationRepository;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn context(executor: Arc<StubExecutor>) -> AppContext {
    let mut config = config();
    config.health.enabled = true;
    config.health.interval_secs = 10;
    AppContext::with_components(config, executor, Arc::new(InMemoryVerificationRepository::new()))
        .unwrap()
}

#[tokio::test]
async fn test_round_reports_each_provider() {
    let executor = Arc::new(StubExecutor::default());
    let context = context(executor.clone());

    let report = context
        .health_checker()
        .check_once(&CancellationToken::new())
        .await;

    assert_eq!(report.len(), 2);
    assert!(report[0].healthy);
    assert_eq!(report[0].model_id, "health-model");
    assert!(!report[1].healthy);
    assert!(report[1].error.as_deref().unwrap_or_default().contains("503"));
    assert_eq!(executor.calls(), 2);
    assert_eq!(context.latency().snapshot(&"up".into()).success_count, 1);
}

#[tokio::test(start_paused = true)]
async fn test_rounds_feed_the_circuit_until_cancelled() {
    let executor = Arc::new(StubExecutor::default());
    let context = context(executor.clone());
    let cancel = CancellationToken::new();
    let handle = context.health_checker().spawn(cancel.clone());

    // first tick fires immediately, the second after one interval
    tokio::time::sleep(Duration::from_secs(15)).await;
    assert_eq!(context.breakers().state("down"), CircuitState::Open);
    assert_eq!(context.breakers().state("up"), CircuitState::Closed);

    cancel.cancel();
    handle.await.unwrap();
    let calls = executor.calls();
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(executor.calls(), calls);
}
