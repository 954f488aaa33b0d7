//! Domain layer constants
//!
//! Values that are part of the verification and scoring rules themselves.
//! Operational defaults (timeouts, pool sizes, file names) live in
//! `llmv_infrastructure::constants`.

// ============================================================================
// SCORING DOMAIN CONSTANTS
// ============================================================================

/// Lower bound of every score component and of the overall score
pub const SCORE_MIN: f64 = 0.0;

/// Upper bound of every score component and of the overall score
pub const SCORE_MAX: f64 = 10.0;

/// Component value used when the inputs needed to compute it are unknown
pub const SCORE_NEUTRAL: f64 = 5.0;

/// Allowed deviation of a weight set's sum from 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.001;

/// Default weight of the speed component
pub const DEFAULT_WEIGHT_SPEED: f64 = 0.25;

/// Default weight of the efficiency component
pub const DEFAULT_WEIGHT_EFFICIENCY: f64 = 0.20;

/// Default weight of the cost component
pub const DEFAULT_WEIGHT_COST: f64 = 0.25;

/// Default weight of the capability component
pub const DEFAULT_WEIGHT_CAPABILITY: f64 = 0.20;

/// Default weight of the recency component
pub const DEFAULT_WEIGHT_RECENCY: f64 = 0.10;

// ============================================================================
// CAPABILITY IMPORTANCE
// ============================================================================

/// Importance of tool use in the capability component
pub const CAPABILITY_IMPORTANCE_TOOL_USE: f64 = 3.0;

/// Importance of each code-generation language probe
pub const CAPABILITY_IMPORTANCE_CODE_GENERATION: f64 = 2.0;

/// Importance of reasoning probes
pub const CAPABILITY_IMPORTANCE_REASONING: f64 = 2.0;

/// Importance of streaming, vision and multimodal probes
pub const CAPABILITY_IMPORTANCE_MEDIA: f64 = 1.5;

/// Importance of JSON mode
pub const CAPABILITY_IMPORTANCE_JSON_MODE: f64 = 1.0;

/// Importance of embeddings
pub const CAPABILITY_IMPORTANCE_EMBEDDINGS: f64 = 0.5;

/// Importance assigned to capabilities this build does not know
pub const CAPABILITY_IMPORTANCE_UNKNOWN: f64 = 0.5;

// ============================================================================
// VERIFICATION POLICY CONSTANTS
// ============================================================================

/// Minimum overall score (0-10) a model needs in strict mode
pub const DEFAULT_STRICT_MIN_SCORE: f64 = 7.0;

/// Minimum weighted capability pass ratio a model needs in strict mode
pub const DEFAULT_STRICT_MIN_CAPABILITY_RATIO: f64 = 0.7;

// ============================================================================
// PROVIDER DEFAULTS
// ============================================================================

/// Default per-request timeout for a provider in seconds
pub const PROVIDER_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout for a provider in seconds
pub const PROVIDER_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default static routing weight of a provider
pub const PROVIDER_DEFAULT_WEIGHT: f64 = 1.0;

/// Placeholder rendered instead of a credential
pub const REDACTED: &str = "<redacted>";

// ============================================================================
// RESILIENCE DEFAULTS
// ============================================================================

/// Failures inside the window that open a circuit
pub const CIRCUIT_BREAKER_FAILURE_THRESHOLD: u32 = 5;

/// Rolling window in which circuit failures are counted, in seconds
pub const CIRCUIT_BREAKER_FAILURE_WINDOW_SECS: u64 = 60;

/// Time an open circuit waits before admitting a trial, in seconds
pub const CIRCUIT_BREAKER_OPEN_TIMEOUT_SECS: u64 = 60;

/// Default total attempts per probe, first try included
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

/// Default first backoff in milliseconds
pub const RETRY_INITIAL_BACKOFF_MS: u64 = 500;

/// Default backoff ceiling in milliseconds
pub const RETRY_MAX_BACKOFF_MS: u64 = 16_000;

/// Default jitter fraction applied to each backoff (±)
pub const RETRY_JITTER: f64 = 0.2;

/// Backoff multiplier for rate-limited failures without `Retry-After`
pub const RETRY_RATE_LIMIT_MULTIPLIER: f64 = 2.0;

// ============================================================================
// ROUTING DEFAULTS
// ============================================================================

/// Latency samples kept per provider
pub const LATENCY_WINDOW_SIZE: usize = 256;

/// p95 latency at which the router's latency factor is neutral, in milliseconds
pub const ROUTER_REFERENCE_LATENCY_MS: u64 = 1_000;

/// Availability factor of a half-open provider
pub const ROUTER_HALF_OPEN_FACTOR: f64 = 0.5;

// ============================================================================
// SCORING REFERENCES
// ============================================================================

/// Latency scoring 5.0 on the speed curve, in milliseconds
pub const SCORING_REFERENCE_LATENCY_MS: u64 = 1_000;

/// Blended USD price per million tokens scoring 5.0 on the cost curve
pub const SCORING_REFERENCE_PRICE_PER_MILLION: f64 = 5.0;

/// Context tokens per billion parameters scoring 5.0 on the efficiency curve
pub const SCORING_REFERENCE_CONTEXT_PER_BILLION: f64 = 4_096.0;

/// Age in days at which recency has decayed halfway to its floor
pub const SCORING_RECENCY_HALF_LIFE_DAYS: f64 = 365.0;

/// Lowest recency score a model can reach through age alone
pub const SCORING_RECENCY_FLOOR: f64 = 1.0;
