use governor::{
    Quota, RateLimiter as GovernorRateLimiter,
    clock::DefaultClock,
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Request pacing for catalog calls.
///
/// Shared by clone; every clone draws from the same quota.
pub struct RateLimiter {
    inner: Arc<GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}

impl RateLimiter {
    /// Allow `requests_per_second` requests per second with an equal burst.
    pub fn new(requests_per_second: NonZeroU32) -> Self {
        Self::with_quota(Quota::per_second(requests_per_second))
    }

    pub fn with_quota(quota: Quota) -> Self {
        Self {
            inner: Arc::new(GovernorRateLimiter::direct(quota)),
        }
    }

    /// Wait until a request can proceed.
    pub async fn wait_until_ready(&self) {
        self.inner.until_ready().await;
    }
}

impl Clone for RateLimiter {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum requests per second
    pub requests_per_second: NonZeroU32,
    /// Maximum burst size (defaults to requests_per_second)
    pub burst_size: Option<NonZeroU32>,
}

impl RateLimiterConfig {
    pub fn new(requests_per_second: NonZeroU32) -> Self {
        Self {
            requests_per_second,
            burst_size: None,
        }
    }

    pub fn with_burst_size(mut self, burst_size: Option<NonZeroU32>) -> Self {
        self.burst_size = burst_size;
        self
    }

    pub fn build(&self) -> RateLimiter {
        let quota = Quota::per_second(self.requests_per_second)
            .allow_burst(self.burst_size.unwrap_or(self.requests_per_second));
        RateLimiter::with_quota(quota)
    }
}
