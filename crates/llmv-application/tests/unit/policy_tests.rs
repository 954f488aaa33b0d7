//! Verification policy tests

use chrono::NaiveDate;
use llmv_application::{VerificationMode, VerificationPolicy};
use llmv_domain::{
    Capability, ComprehensiveScore, ModelRef, ScoreComponents, ScoreWeights, VerificationResult,
    VerificationStatus,
};

fn reachable() -> VerificationResult {
    let mut result = VerificationResult::pending(ModelRef::new("openai", "gpt-4o-mini"));
    result.model_exists = Some(true);
    result.responsive = Some(true);
    result
}

fn with_score(mut result: VerificationResult, value: f64) -> VerificationResult {
    let components = ScoreComponents {
        speed: value,
        efficiency: value,
        cost: value,
        capability: value,
        recency: value,
    };
    result.score = Some(ComprehensiveScore::from_components(
        result.model_id(),
        components,
        ScoreWeights::default(),
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
    ));
    result
}

#[test]
fn test_relaxed_requires_existence_and_response() {
    let policy = VerificationPolicy::relaxed();
    assert_eq!(policy.mode, VerificationMode::Relaxed);
    assert_eq!(policy.evaluate(&reachable()), VerificationStatus::Verified);

    let mut silent = reachable();
    silent.responsive = Some(false);
    assert_eq!(policy.evaluate(&silent), VerificationStatus::Failed);

    let mut partial = reachable();
    partial.responsive = None;
    assert_eq!(policy.evaluate(&partial), VerificationStatus::Failed);
}

#[test]
fn test_strict_applies_capability_ratio() {
    let policy = VerificationPolicy::strict(7.0, 0.7);

    let mut capable = reachable();
    capable.capabilities.record(Capability::ToolUse, true);
    capable.capabilities.record(Capability::Embeddings, false);
    assert_eq!(policy.evaluate(&capable), VerificationStatus::Verified);

    let mut weak = reachable();
    weak.capabilities.record(Capability::ToolUse, false);
    weak.capabilities.record(Capability::Embeddings, true);
    assert_eq!(policy.evaluate(&weak), VerificationStatus::Failed);

    // nothing probed counts as zero capability
    assert_eq!(policy.evaluate(&reachable()), VerificationStatus::Failed);
}

#[test]
fn test_strict_applies_score_threshold_when_scored() {
    let policy = VerificationPolicy::strict(7.0, 0.0);

    assert_eq!(policy.evaluate(&reachable()), VerificationStatus::Verified);
    assert_eq!(
        policy.evaluate(&with_score(reachable(), 8.0)),
        VerificationStatus::Verified
    );
    assert_eq!(
        policy.evaluate(&with_score(reachable(), 6.5)),
        VerificationStatus::Failed
    );
}

#[test]
fn test_mode_deserializes_from_snake_case() {
    let mode: VerificationMode = serde_json::from_str("\"strict\"").unwrap();
    assert_eq!(mode, VerificationMode::Strict);
}
