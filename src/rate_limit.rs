//! # Client-Side Throttling
//!
//! Token-bucket throttling policy shared by every request a client sends, and the
//! defaulter that installs one on a configuration copy before clients are built.

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota};
use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::RestConfig;

/// Throttling policy consulted before each request is dispatched
#[async_trait]
pub trait RateLimiter: Send + Sync + fmt::Debug {
    /// Take a token if one is available right now, without waiting
    fn try_accept(&self) -> bool;

    /// Wait until a token is available and take it
    async fn wait(&self);

    /// Sustained queries per second this limiter allows
    fn qps(&self) -> f32;

    /// Number of requests that may be issued back to back
    fn burst(&self) -> u32;
}

/// GCRA token bucket refilled at `qps` tokens per second, holding at most `burst` tokens
pub struct TokenBucketRateLimiter {
    qps: f32,
    burst: u32,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl TokenBucketRateLimiter {
    /// Create a bucket that starts full.
    ///
    /// A burst of 0 is treated as 1. A non-finite or non-positive `qps` leaves
    /// requests unthrottled. Rates too slow for the bucket clock are clamped to
    /// the slowest refill it can track, and rates too fast to the one-nanosecond period.
    pub fn new(qps: f32, burst: u32) -> Self {
        let capacity = NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN);
        let limiter = Self::replenish_period(qps, capacity)
            .and_then(Quota::with_period)
            .map(|quota| governor::RateLimiter::direct(quota.allow_burst(capacity)));

        Self {
            qps,
            burst,
            limiter,
        }
    }

    fn replenish_period(qps: f32, capacity: NonZeroU32) -> Option<Duration> {
        if !qps.is_finite() || qps <= 0.0 {
            return None;
        }
        let slowest = Self::slowest_period(capacity);
        let period = Duration::try_from_secs_f64(1.0 / f64::from(qps))
            .map_or(slowest, |period| period.min(slowest));
        Some(period.max(Duration::from_nanos(1)))
    }

    /// Longest refill period whose full bucket span stays within a quarter of
    /// the nanosecond clock range, leaving room for the arrival timestamps.
    fn slowest_period(capacity: NonZeroU32) -> Duration {
        Duration::from_nanos(u64::MAX / 4 / u64::from(capacity.get()))
    }
}

impl fmt::Debug for TokenBucketRateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenBucketRateLimiter")
            .field("qps", &self.qps)
            .field("burst", &self.burst)
            .finish()
    }
}

#[async_trait]
impl RateLimiter for TokenBucketRateLimiter {
    fn try_accept(&self) -> bool {
        self.limiter
            .as_ref()
            .map_or(true, |limiter| limiter.check().is_ok())
    }

    async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    fn qps(&self) -> f32 {
        self.qps
    }

    fn burst(&self) -> u32 {
        self.burst
    }
}

/// Install a token bucket built from `qps`/`burst` when no limiter is set and `qps` is positive.
///
/// Leaves the configuration untouched otherwise, so applying it twice is the same
/// as applying it once. Callers pass their own copy; the caller-owned original is
/// never handed to this function by the clientset constructors.
pub fn default_rate_limiter(config: &mut RestConfig) {
    if config.rate_limiter.is_none() && config.qps > 0.0 {
        debug!(
            qps = config.qps,
            burst = config.burst,
            "Installing default token bucket rate limiter"
        );
        config.rate_limiter = Some(Arc::new(TokenBucketRateLimiter::new(
            config.qps,
            config.burst,
        )));
    }
}
