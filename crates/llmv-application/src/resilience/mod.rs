//! Resilience primitives
//!
//! Circuit breaking, retrying and rate limiting, all keyed per provider.

pub mod circuit_breaker;
pub mod rate_limit;
pub mod retry;

pub use circuit_breaker::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakerMetrics, CircuitBreakerRegistry,
    CircuitPermit,
};
pub use rate_limit::{RateLimiterRegistry, TokenBucket};
pub use retry::{Retried, RetryPolicy, Retryable};
