//! Per-provider token buckets
//!
//! Every worker verifying a provider draws from that provider's bucket, so
//! configured requests-per-minute hold across the whole pool.

use dashmap::DashMap;
use llmv_domain::{ProbeError, Provider, ProviderId, RateLimitSettings};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket refilled continuously at `requests_per_minute / 60` per second
#[derive(Debug)]
pub struct TokenBucket {
    capacity: f64,
    refill_per_sec: f64,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Create a full bucket; `None` when the settings are unlimited
    pub fn new(settings: RateLimitSettings) -> Option<Self> {
        if settings.is_unlimited() {
            return None;
        }
        let capacity = f64::from(settings.burst.max(1));
        Some(Self {
            capacity,
            refill_per_sec: f64::from(settings.requests_per_minute) / 60.0,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        })
    }

    /// Take one token, or report how long until one is available
    pub fn try_acquire(&self) -> Result<(), Duration> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        state.last_refill = now;

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            Ok(())
        } else {
            let missing = 1.0 - state.tokens;
            Err(Duration::from_secs_f64(missing / self.refill_per_sec))
        }
    }

    /// Wait for a token; returns a cancelled error if `cancel` fires first
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<(), ProbeError> {
        loop {
            let wait = match self.try_acquire() {
                Ok(()) => return Ok(()),
                Err(wait) => wait,
            };
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(ProbeError::cancelled()),
                () = tokio::time::sleep(wait) => {}
            }
        }
    }

    /// Tokens currently available (without refilling)
    pub fn available(&self) -> f64 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tokens
    }
}

/// Token buckets for every rate-limited provider
#[derive(Debug, Default)]
pub struct RateLimiterRegistry {
    buckets: DashMap<ProviderId, Arc<TokenBucket>>,
}

impl RateLimiterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket of a provider, `None` for unlimited providers
    pub fn limiter(&self, provider: &Provider) -> Option<Arc<TokenBucket>> {
        if let Some(bucket) = self.buckets.get(&provider.id) {
            return Some(Arc::clone(bucket.value()));
        }
        let bucket = Arc::new(TokenBucket::new(provider.rate_limit)?);
        let entry = self.buckets.entry(provider.id.clone()).or_insert(bucket);
        Some(Arc::clone(entry.value()))
    }

    /// Wait for the provider's next token
    pub async fn acquire(
        &self,
        provider: &Provider,
        cancel: &CancellationToken,
    ) -> Result<(), ProbeError> {
        match self.limiter(provider) {
            Some(bucket) => bucket.acquire(cancel).await,
            None => Ok(()),
        }
    }
}
