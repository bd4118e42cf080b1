//! Outbound request throttling.
//!
//! The provider publishes no formal quota but drops clients that hammer it,
//! so every outbound request acquires budget from a direct governor rate
//! limiter sized as `quota_limit` requests per `quota_window`.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Shared request throttle; clones share the same budget.
#[derive(Clone)]
pub struct RequestThrottle {
    limiter: Arc<DirectRateLimiter>,
}

impl RequestThrottle {
    pub fn new(quota_window: Duration, quota_limit: u32) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::direct(quota_from_window(
                quota_window,
                quota_limit,
            ))),
        }
    }

    /// Suspend until rate budget is available.
    pub async fn acquire(&self) {
        self.limiter.until_ready().await;
    }

    /// Take budget if available right now, without waiting.
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

fn quota_from_window(quota_window: Duration, quota_limit: u32) -> Quota {
    let safe_limit = quota_limit.max(1);
    let burst = NonZeroU32::new(safe_limit).expect("safe limit must be non-zero");

    let seconds_per_cell = (quota_window.as_secs_f64() / f64::from(safe_limit)).max(0.001);
    let period = Duration::from_secs_f64(seconds_per_cell);

    Quota::with_period(period)
        .expect("period is always greater than zero")
        .allow_burst(burst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_budget_matches_quota_limit() {
        let throttle = RequestThrottle::new(Duration::from_secs(60), 2);

        assert!(throttle.try_acquire());
        assert!(throttle.try_acquire());
        assert!(!throttle.try_acquire());
    }

    #[test]
    fn clones_share_one_budget() {
        let throttle = RequestThrottle::new(Duration::from_secs(60), 1);
        let clone = throttle.clone();

        assert!(throttle.try_acquire());
        assert!(!clone.try_acquire());
    }

    #[tokio::test]
    async fn acquire_waits_for_budget_instead_of_failing() {
        let throttle = RequestThrottle::new(Duration::from_millis(40), 1);

        throttle.acquire().await;
        let started = std::time::Instant::now();
        throttle.acquire().await;
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
