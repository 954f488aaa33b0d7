//! Capability parsing and report tests

use llmv_domain::{Capability, CapabilityReport, CodeLanguage};

#[test]
fn test_parse_known_capabilities() {
    assert_eq!(Capability::parse("tool_use"), Capability::ToolUse);
    assert_eq!(Capability::parse("Function-Calling"), Capability::ToolUse);
    assert_eq!(Capability::parse("streaming"), Capability::Streaming);
    assert_eq!(Capability::parse("json"), Capability::JsonMode);
    assert_eq!(
        Capability::parse("code_generation:python"),
        Capability::CodeGeneration(CodeLanguage::Python)
    );
    assert_eq!(
        Capability::parse("code-generation:c++"),
        Capability::CodeGeneration(CodeLanguage::Cpp)
    );
}

#[test]
fn test_typo_becomes_unknown() {
    let capability = Capability::parse("tool_usee");
    assert_eq!(capability, Capability::Unknown("tool_usee".to_string()));
    assert!(!capability.is_known());
}

#[test]
fn test_display_round_trips_through_parse() {
    for capability in [
        Capability::ToolUse,
        Capability::Vision,
        Capability::Embeddings,
        Capability::CodeGeneration(CodeLanguage::TypeScript),
    ] {
        assert_eq!(Capability::parse(&capability.to_string()), capability);
    }
}

#[test]
fn test_importance_ordering() {
    assert!(Capability::ToolUse.importance() > Capability::Embeddings.importance());
    assert!(
        Capability::CodeGeneration(CodeLanguage::Go).importance()
            > Capability::Embeddings.importance()
    );
}

#[test]
fn test_report_distinguishes_failed_from_unattempted() {
    let mut report = CapabilityReport::new();
    report.record(Capability::ToolUse, true);
    report.record(Capability::Vision, false);

    assert!(report.supports(&Capability::ToolUse));
    assert!(!report.supports(&Capability::Vision));
    assert!(report.attempted(&Capability::Vision));
    assert!(!report.attempted(&Capability::Streaming));
    assert_eq!(report.attempted_count(), 2);
    assert_eq!(report.passed_count(), 1);
    assert_eq!(report.supported().collect::<Vec<_>>(), vec![&Capability::ToolUse]);
}

#[test]
fn test_weighted_pass_ratio() {
    let mut report = CapabilityReport::new();
    assert_eq!(report.weighted_pass_ratio(), None);

    report.record(Capability::ToolUse, true);
    report.record(Capability::Embeddings, false);
    let ratio = report.weighted_pass_ratio().unwrap();
    assert!((ratio - 3.0 / 3.5).abs() < 1e-9);
}

#[test]
fn test_report_serializes_as_string_keyed_map() {
    let mut report = CapabilityReport::new();
    report.record(Capability::CodeGeneration(CodeLanguage::Rust), true);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json, serde_json::json!({"code_generation:rust": true}));

    let back: CapabilityReport = serde_json::from_value(json).unwrap();
    assert_eq!(back, report);
}
