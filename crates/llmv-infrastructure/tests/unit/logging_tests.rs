//! Logging helper tests

use llmv_infrastructure::logging::parse_log_level;
use tracing::Level;

#[test]
fn test_parse_log_level() {
    assert_eq!(parse_log_level("info").unwrap(), Level::INFO);
    assert_eq!(parse_log_level("WARNING").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("Trace").unwrap(), Level::TRACE);
    assert!(parse_log_level("verbose").is_err());
}
