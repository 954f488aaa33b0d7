//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Engine constants are defined in `llmv_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "llmv.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "llmv";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "LLMV";

/// Separator between nested keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Environment variable overriding the configured log filter
pub const LOG_ENV_VAR: &str = "LLMV_LOG";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ============================================================================
// VERIFICATION CONSTANTS
// ============================================================================

/// Default number of concurrent verification workers
pub const DEFAULT_VERIFICATION_CONCURRENCY: usize = 4;

/// Default per-probe deadline in seconds
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// HEALTH CHECK CONSTANTS
// ============================================================================

/// Default interval between health probes in seconds
pub const DEFAULT_HEALTH_INTERVAL_SECS: u64 = 60;

// ============================================================================
// STORAGE CONSTANTS
// ============================================================================

/// File name of the JSON lines result history
pub const DEFAULT_RESULTS_FILENAME: &str = "results.jsonl";
