//! Status classification and response helper tests

use llmv_domain::{CodeLanguage, CredentialRef, ProbeErrorKind};
use llmv_providers::utils::{HttpResponseUtils, contains_code};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};

fn headers(retry_after: Option<&'static str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(value) = retry_after {
        headers.insert(RETRY_AFTER, HeaderValue::from_static(value));
    }
    headers
}

#[test]
fn test_status_codes_map_onto_failure_kinds() {
    let cases = [
        (401, ProbeErrorKind::AuthError),
        (403, ProbeErrorKind::AuthError),
        (404, ProbeErrorKind::NotFound),
        (400, ProbeErrorKind::InvalidRequest),
        (422, ProbeErrorKind::InvalidRequest),
        (429, ProbeErrorKind::RateLimited),
        (500, ProbeErrorKind::ServerError),
        (503, ProbeErrorKind::ServerError),
        (529, ProbeErrorKind::ServerError),
    ];
    for (code, kind) in cases {
        let status = StatusCode::from_u16(code).unwrap();
        let error = HttpResponseUtils::classify(status, &headers(None), "", &CredentialRef::default());
        assert_eq!(error.kind, kind, "status {code}");
        assert_eq!(error.status, Some(code));
    }
}

#[test]
fn test_retry_after_seconds_are_kept() {
    let error = HttpResponseUtils::classify(
        StatusCode::TOO_MANY_REQUESTS,
        &headers(Some("7")),
        r#"{"error":"slow down"}"#,
        &CredentialRef::default(),
    );
    assert_eq!(error.kind, ProbeErrorKind::RateLimited);
    assert_eq!(error.retry_after_secs, Some(7));
    assert!(error.message.contains("slow down"));
}

#[test]
fn test_retry_after_http_date_is_ignored() {
    let error = HttpResponseUtils::classify(
        StatusCode::SERVICE_UNAVAILABLE,
        &headers(Some("Wed, 21 Oct 2015 07:28:00 GMT")),
        "",
        &CredentialRef::default(),
    );
    assert_eq!(error.retry_after_secs, None);
    assert!(error.message.starts_with("503"));
}

#[test]
fn test_excerpt_flattens_and_truncates() {
    assert_eq!(HttpResponseUtils::excerpt("a\n  b\tc"), "a b c");

    let long = "x".repeat(500);
    let excerpt = HttpResponseUtils::excerpt(&long);
    assert_eq!(excerpt.chars().count(), 201);
    assert!(excerpt.ends_with('…'));
}

#[test]
fn test_code_detection() {
    assert!(contains_code("```\nanything\n```", CodeLanguage::Java));
    assert!(contains_code("def fact(n):\n    return 1", CodeLanguage::Python));
    assert!(contains_code("fn fact(n: u64) -> u64 { 1 }", CodeLanguage::Rust));
    assert!(contains_code("func fact(n int) int { return 1 }", CodeLanguage::Go));
    assert!(!contains_code("The factorial of n is the product of 1..n.", CodeLanguage::Python));
}

#[test]
fn test_echoed_credential_is_scrubbed_from_message() {
    let error = HttpResponseUtils::classify(
        StatusCode::UNAUTHORIZED,
        &headers(None),
        r#"{"error":{"message":"Incorrect API key provided: sk-very-secret"}}"#,
        &CredentialRef::new("sk-very-secret"),
    );
    assert_eq!(error.kind, ProbeErrorKind::AuthError);
    assert!(!error.message.contains("sk-very-secret"), "{}", error.message);
    assert!(error.message.contains("Incorrect API key provided: <redacted>"));
}
