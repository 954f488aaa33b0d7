//! Weighted router tests

use llmv_application::{
    CircuitBreakerConfig, CircuitBreakerRegistry, LatencyTracker, ProviderRegistry,
    ProviderRouter, RouterConfig, WeightedRouter, candidates_for_model,
};
use llmv_domain::{CircuitState, Error, ModelRef, ProbeErrorKind, Provider, ProviderId};
use std::sync::Arc;
use std::time::Duration;

struct Fixture {
    breakers: Arc<CircuitBreakerRegistry>,
    latency: Arc<LatencyTracker>,
    router: WeightedRouter,
}

fn fixture(providers: &[(&str, f64)]) -> Fixture {
    let registry = Arc::new(
        ProviderRegistry::new(providers.iter().map(|(id, weight)| {
            Provider::new(*id, format!("https://{id}.example.com")).with_weight(*weight)
        }))
        .unwrap(),
    );
    let breakers = Arc::new(CircuitBreakerRegistry::new(CircuitBreakerConfig::new(
        2,
        Duration::from_secs(60),
    )));
    let latency = Arc::new(LatencyTracker::default());
    let router = WeightedRouter::new(
        registry,
        Arc::clone(&breakers),
        Arc::clone(&latency),
        RouterConfig::default(),
    );
    Fixture {
        breakers,
        latency,
        router,
    }
}

fn ids(names: &[&str]) -> Vec<ProviderId> {
    names.iter().map(|name| ProviderId::new(*name)).collect()
}

fn open_circuit(breakers: &CircuitBreakerRegistry, id: &str) {
    let breaker = breakers.breaker(&ProviderId::new(id));
    for _ in 0..2 {
        breaker
            .try_acquire()
            .unwrap()
            .record_failure(ProbeErrorKind::Transport);
    }
}

fn record(latency: &LatencyTracker, id: &str, millis: u64, times: usize) {
    for _ in 0..times {
        latency.record(&ProviderId::new(id), Duration::from_millis(millis), true);
    }
}

#[tokio::test]
async fn test_declaration_order_breaks_ties_without_history() {
    let f = fixture(&[("a", 1.0), ("b", 1.0)]);
    assert_eq!(f.router.select_provider(&ids(&["b", "a"])).unwrap().as_str(), "a");
}

#[tokio::test]
async fn test_no_history_is_neutral() {
    let f = fixture(&[("fresh", 1.0), ("known", 1.0)]);
    // p95 equal to the reference latency gives the same factor as no history
    record(&f.latency, "known", 1000, 3);
    let ranked = f.router.rank(&ids(&["fresh", "known"])).unwrap();
    assert!((ranked[0].effective_score - ranked[1].effective_score).abs() < 1e-9);
    // equal scores: more recent successes wins before declaration order
    assert_eq!(ranked[0].provider_id.as_str(), "known");
}

#[tokio::test]
async fn test_faster_provider_preferred() {
    let f = fixture(&[("slow", 1.0), ("fast", 1.0)]);
    record(&f.latency, "slow", 3000, 5);
    record(&f.latency, "fast", 100, 5);
    let ranked = f.router.rank(&ids(&["slow", "fast"])).unwrap();
    assert_eq!(ranked[0].provider_id.as_str(), "fast");
    assert!(ranked[0].latency_factor > 1.0);
    assert!(ranked[1].latency_factor < 1.0);
}

#[tokio::test]
async fn test_weight_scales_score() {
    let f = fixture(&[("cheap", 1.0), ("preferred", 3.0)]);
    let best = f.router.select_provider(&ids(&["cheap", "preferred"])).unwrap();
    assert_eq!(best.as_str(), "preferred");
}

#[tokio::test]
async fn test_open_circuit_is_excluded() {
    let f = fixture(&[("a", 5.0), ("b", 1.0)]);
    open_circuit(&f.breakers, "a");
    assert_eq!(f.router.select_provider(&ids(&["a", "b"])).unwrap().as_str(), "b");

    let ranked = f.router.rank(&ids(&["a", "b"])).unwrap();
    assert_eq!(ranked[1].provider_id.as_str(), "a");
    assert!(ranked[1].effective_score.abs() < f64::EPSILON);
}

#[tokio::test(start_paused = true)]
async fn test_half_open_is_reduced() {
    let f = fixture(&[("a", 1.0)]);
    open_circuit(&f.breakers, "a");
    tokio::time::advance(Duration::from_secs(61)).await;
    let ranked = f.router.rank(&ids(&["a"])).unwrap();
    assert!((ranked[0].availability - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_all_open_is_an_error() {
    let f = fixture(&[("a", 1.0), ("b", 1.0)]);
    open_circuit(&f.breakers, "a");
    open_circuit(&f.breakers, "b");
    let result = f.router.select_provider(&ids(&["a", "b"]));
    assert!(matches!(result, Err(Error::NoAvailableProvider { .. })));
}

#[tokio::test]
async fn test_rejects_bad_candidate_lists() {
    let f = fixture(&[("a", 1.0)]);
    assert!(matches!(
        f.router.select_provider(&[]),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(matches!(
        f.router.select_provider(&ids(&["missing"])),
        Err(Error::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_router_never_mutates_health() {
    let f = fixture(&[("a", 1.0)]);
    for _ in 0..10 {
        f.router.select_provider(&ids(&["a"])).unwrap();
    }
    assert!(f.latency.snapshot(&ProviderId::new("a")).is_empty());
    assert!(f.breakers.snapshots().is_empty());
}

fn served(pairs: &[(&str, &str)]) -> Vec<ModelRef> {
    pairs
        .iter()
        .map(|(provider, model)| ModelRef::new(*provider, *model))
        .collect()
}

#[test]
fn test_candidates_are_the_providers_serving_the_model() {
    let targets = served(&[("b", "llama-3"), ("a", "gpt-4o"), ("a", "llama-3"), ("b", "llama-3")]);

    let candidates = candidates_for_model("llama-3", &targets).unwrap();

    assert_eq!(candidates, ids(&["b", "a"]));
    assert!(matches!(
        candidates_for_model("mistral", &targets),
        Err(Error::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_model_routing_skips_unhealthy_hosts() {
    let f = fixture(&[("a", 2.0), ("b", 1.0), ("c", 5.0)]);
    let targets = served(&[("a", "llama-3"), ("b", "llama-3"), ("c", "gpt-4o")]);
    open_circuit(&f.breakers, "a");
    record(&f.latency, "b", 250, 4);

    let ranked = f.router.rank_for_model("llama-3", &targets).unwrap();
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].provider_id.as_str(), "b");
    assert_eq!(ranked[0].circuit, CircuitState::Closed);
    assert_eq!(ranked[0].p95_ms, Some(250));
    assert_eq!(ranked[1].circuit, CircuitState::Open);
    assert_eq!(ranked[1].p95_ms, None);

    let best = f.router.select_for_model("llama-3", &targets).unwrap();
    assert_eq!(best.as_str(), "b");
}
