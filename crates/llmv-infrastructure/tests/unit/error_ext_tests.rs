//! Error context tests

use llmv_domain::Error;
use llmv_infrastructure::ErrorContext;

fn io_failure() -> std::result::Result<(), std::io::Error> {
    Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))
}

#[test]
fn test_contexts_pick_the_error_variant() {
    let error = io_failure().io_context("reading history").unwrap_err();
    assert!(matches!(error, Error::Io { .. }));
    assert!(error.to_string().contains("reading history: gone"));

    let error = io_failure().config_context("loading config").unwrap_err();
    assert!(matches!(error, Error::Configuration { .. }));

    let error = io_failure().network_context("connecting").unwrap_err();
    assert!(matches!(error, Error::Network { .. }));

    let error = io_failure().with_context(|| format!("step {}", 3)).unwrap_err();
    assert!(error.to_string().contains("step 3: gone"));
}
