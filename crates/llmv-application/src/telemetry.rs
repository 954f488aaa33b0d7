//! Engine telemetry
//!
//! Thin wrappers over the `metrics` facade so metric names and labels stay
//! consistent. No exporter is installed here; without one the calls are
//! no-ops.

use llmv_domain::{CircuitState, ProbeOutcome, ProviderId, VerificationStatus};
use metrics::{counter, histogram};
use std::time::Duration;

/// Count one probe attempt
pub fn record_probe_attempt(provider_id: &ProviderId, outcome: &ProbeOutcome) {
    let result = match outcome.error_kind() {
        None => "success",
        Some(kind) => kind.as_str(),
    };
    counter!(
        "llmv_probe_attempts_total",
        "provider" => provider_id.to_string(),
        "kind" => outcome.kind.category(),
        "outcome" => result
    )
    .increment(1);
}

/// Record a latency sample
pub fn record_probe_latency(provider_id: &ProviderId, latency: Duration) {
    histogram!("llmv_probe_latency_seconds", "provider" => provider_id.to_string())
        .record(latency.as_secs_f64());
}

/// Count a circuit state transition
pub fn record_circuit_transition(provider_id: &ProviderId, to: CircuitState) {
    counter!(
        "llmv_circuit_transitions_total",
        "provider" => provider_id.to_string(),
        "to" => to.to_string()
    )
    .increment(1);
}

/// Count a finished verification result
pub fn record_verification_result(status: VerificationStatus) {
    counter!("llmv_verification_results_total", "status" => status.as_str()).increment(1);
}
