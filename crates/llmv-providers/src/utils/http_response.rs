//! HTTP Response Utilities
//!
//! Turns non-success provider responses into classified [`ProbeError`]s.
//! Classification depends only on the status code, so it is shared by
//! every dialect.

use crate::constants::ERROR_BODY_MAX_CHARS;
use llmv_domain::{CodeLanguage, CredentialRef, ProbeError};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};

/// Utilities for processing HTTP responses
pub struct HttpResponseUtils;

impl HttpResponseUtils {
    /// Classify a non-success response
    ///
    /// The message quotes the start of the provider's error body so that
    /// contract changes can be diagnosed from the result alone. The
    /// credential is scrubbed from the body before it is quoted.
    pub fn classify(
        status: StatusCode,
        headers: &HeaderMap,
        body: &str,
        credential: &CredentialRef,
    ) -> ProbeError {
        let code = status.as_u16();
        let reason = status.canonical_reason().unwrap_or("unexpected status");
        let detail = Self::excerpt(&credential.scrub(body));
        let message = if detail.is_empty() {
            format!("{code} {reason}")
        } else {
            format!("{code} {reason}: {detail}")
        };
        let error = ProbeError::from_status(code, message);
        match Self::retry_after_secs(headers) {
            Some(secs) => error.with_retry_after_secs(secs),
            None => error,
        }
    }

    /// Numeric `Retry-After` value in seconds; HTTP dates are ignored
    pub fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
        headers
            .get(RETRY_AFTER)?
            .to_str()
            .ok()?
            .trim()
            .parse()
            .ok()
    }

    /// Single-line prefix of a response body
    pub fn excerpt(body: &str) -> String {
        let flat: String = body.split_whitespace().collect::<Vec<_>>().join(" ");
        if flat.chars().count() <= ERROR_BODY_MAX_CHARS {
            flat
        } else {
            let mut cut: String = flat.chars().take(ERROR_BODY_MAX_CHARS).collect();
            cut.push('…');
            cut
        }
    }
}

/// Whether a completion looks like it contains source code
///
/// Fenced blocks always count; otherwise a language-specific keyword must
/// appear.
pub fn contains_code(text: &str, language: CodeLanguage) -> bool {
    if text.contains("```") {
        return true;
    }
    let markers: &[&str] = match language {
        CodeLanguage::Python => &["def ", "import ", "return "],
        CodeLanguage::Rust => &["fn ", "let ", "impl "],
        CodeLanguage::Go => &["func ", "package "],
        CodeLanguage::JavaScript => &["function", "const ", "=>", "console.log"],
        CodeLanguage::TypeScript => &["function", "const ", ": number", "=>"],
        CodeLanguage::Java => &["public ", "class ", "static "],
        CodeLanguage::Cpp => &["#include", "int ", "std::"],
    };
    markers.iter().any(|marker| text.contains(marker))
}
