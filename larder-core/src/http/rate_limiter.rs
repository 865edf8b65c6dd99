//! Per-host rate limiting for HTTP requests.

use dashmap::DashMap;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Per-host rate limiter to avoid hammering provider APIs.
pub struct RateLimiter {
    /// Minimum delay between requests to the same host.
    min_delay: Duration,
    /// Last request time per host.
    last_request: DashMap<String, Instant>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given minimum delay between requests.
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_request: DashMap::new(),
        }
    }

    /// A limiter that never waits.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Wait if necessary before making a request to this host.
    pub async fn wait(&self, host: &str) {
        if self.min_delay.is_zero() {
            return;
        }

        // Reserve the next slot before sleeping so concurrent callers queue
        // up behind each other instead of all waking at once.
        let wait_time = {
            let now = Instant::now();
            let mut slot = self
                .last_request
                .entry(host.to_string())
                .or_insert_with(|| now.checked_sub(self.min_delay).unwrap_or(now));
            let next = (*slot + self.min_delay).max(now);
            *slot = next;
            next - now
        };

        if !wait_time.is_zero() {
            sleep(wait_time).await;
        }
    }

    /// Get the number of hosts we've tracked.
    pub fn tracked_hosts(&self) -> usize {
        self.last_request.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_limiter_tracks_nothing() {
        let limiter = RateLimiter::disabled();
        limiter.wait("api.spoonacular.com").await;
        assert_eq!(limiter.tracked_hosts(), 0);
    }

    #[tokio::test]
    async fn hosts_are_tracked_separately() {
        let limiter = RateLimiter::new(Duration::from_millis(1));
        limiter.wait("api.edamam.com").await;
        limiter.wait("www.themealdb.com").await;
        limiter.wait("api.edamam.com").await;
        assert_eq!(limiter.tracked_hosts(), 2);
    }
}
