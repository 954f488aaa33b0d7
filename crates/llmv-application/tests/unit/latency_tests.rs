//! Latency history tests

use llmv_application::LatencyTracker;
use llmv_domain::{ModelRef, ProbeError, ProbeKind, ProbeOutcome, ProviderId};
use std::time::Duration;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn test_unknown_provider_has_empty_snapshot() {
    let tracker = LatencyTracker::default();
    let snapshot = tracker.snapshot(&ProviderId::new("nobody"));
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.p95, None);
}

#[test]
fn test_percentiles_use_nearest_rank() {
    let tracker = LatencyTracker::default();
    let id = ProviderId::new("openai");
    // insertion order must not matter
    for n in (1..=100).rev() {
        tracker.record(&id, ms(n), true);
    }
    let snapshot = tracker.snapshot(&id);
    assert_eq!(snapshot.sample_count, 100);
    assert_eq!(snapshot.p50, Some(ms(50)));
    assert_eq!(snapshot.p95, Some(ms(95)));
    assert_eq!(snapshot.p99, Some(ms(99)));
}

#[test]
fn test_old_samples_are_evicted() {
    let tracker = LatencyTracker::new(4);
    let id = ProviderId::new("openai");
    for n in 1..=10 {
        tracker.record(&id, ms(n * 100), n % 2 == 0);
    }
    let snapshot = tracker.snapshot(&id);
    assert_eq!(snapshot.sample_count, 4);
    assert_eq!(snapshot.success_count, 2);
    assert_eq!(snapshot.p50, Some(ms(800)));
    assert!(snapshot.last_success_at.is_some());
}

#[test]
fn test_only_round_trips_are_sampled() {
    let tracker = LatencyTracker::default();
    let target = ModelRef::new("openai", "gpt-4o");

    tracker.record_outcome(&ProbeOutcome::failed(
        target.clone(),
        ProbeKind::Existence,
        ms(5),
        ProbeError::transport("connection refused"),
    ));
    tracker.record_outcome(&ProbeOutcome::failed(
        target.clone(),
        ProbeKind::Existence,
        Duration::ZERO,
        ProbeError::circuit_open("openai"),
    ));
    assert!(tracker.snapshot(&target.provider_id).is_empty());

    tracker.record_outcome(&ProbeOutcome::succeeded(
        target.clone(),
        ProbeKind::Responsiveness,
        ms(250),
        Some(200),
    ));
    tracker.record_outcome(&ProbeOutcome::failed(
        target.clone(),
        ProbeKind::Responsiveness,
        ms(1000),
        ProbeError::timeout("deadline exceeded"),
    ));
    let snapshot = tracker.snapshot(&target.provider_id);
    assert_eq!(snapshot.sample_count, 2);
    assert_eq!(snapshot.success_count, 1);
}

#[test]
fn test_snapshots_are_sorted_by_provider() {
    let tracker = LatencyTracker::default();
    tracker.record(&ProviderId::new("zhipu"), ms(10), true);
    tracker.record(&ProviderId::new("anthropic"), ms(10), true);
    let ids: Vec<_> = tracker
        .snapshots()
        .into_iter()
        .map(|s| s.provider_id.to_string())
        .collect();
    assert_eq!(ids, vec!["anthropic", "zhipu"]);
}
