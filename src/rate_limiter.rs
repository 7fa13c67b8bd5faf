//! # Feature: Rate Limiting
//!
//! Per-user sliding-window request limiting backing the `rate_limit`
//! built-in inhibitor. Uses DashMap so one limiter can be shared across
//! every command a decorator was applied to.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with sliding window per key

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Sliding-window limiter keyed by an arbitrary string (the gate keys it
/// by invoking user id).
#[derive(Clone)]
pub struct RateLimiter {
    requests: DashMap<String, Vec<Instant>>,
    max_requests: usize,
    time_window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, time_window: Duration) -> Self {
        RateLimiter {
            requests: DashMap::new(),
            max_requests,
            time_window,
        }
    }

    /// Record an attempt for `key` and report whether it stays under the
    /// limit. Attempts older than the window are forgotten first; a
    /// rejected attempt is not recorded.
    pub fn allow(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut entry = self
            .requests
            .entry(key.to_string())
            .or_insert_with(Vec::new);

        entry.retain(|&time| now.duration_since(time) < self.time_window);

        if entry.len() >= self.max_requests {
            false
        } else {
            entry.push(now);
            true
        }
    }

    /// How long until the oldest recorded attempt for `key` leaves the
    /// window. `None` when the key is unknown or already under the limit.
    ///
    /// Inhibitors never sleep; dispatchers use this to tell users when to
    /// retry.
    pub fn retry_after(&self, key: &str) -> Option<Duration> {
        let entry = self.requests.get(key)?;
        if entry.len() < self.max_requests {
            return None;
        }
        let oldest = entry.first()?;
        self.time_window.checked_sub(oldest.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[test]
    fn test_allows_under_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(1));

        assert!(limiter.allow("user1"));
        assert!(limiter.allow("user1"));
        assert!(limiter.allow("user1"));
    }

    #[test]
    fn test_blocks_over_limit() {
        let limiter = RateLimiter::new(2, Duration::from_secs(1));

        assert!(limiter.allow("user1"));
        assert!(limiter.allow("user1"));
        assert!(!limiter.allow("user1"));
    }

    #[tokio::test]
    async fn test_resets_after_window() {
        let limiter = RateLimiter::new(1, Duration::from_millis(100));

        assert!(limiter.allow("user1"));
        assert!(!limiter.allow("user1"));

        sleep(Duration::from_millis(150)).await;
        assert!(limiter.allow("user1"));
    }

    #[test]
    fn test_limits_per_key() {
        let limiter = RateLimiter::new(1, Duration::from_secs(1));

        assert!(limiter.allow("user1"));
        assert!(limiter.allow("user2"));
        assert!(!limiter.allow("user1"));
        assert!(!limiter.allow("user2"));
    }

    #[test]
    fn test_retry_after_only_when_limited() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));

        assert!(limiter.retry_after("user1").is_none());
        assert!(limiter.allow("user1"));
        assert!(!limiter.allow("user1"));

        let wait = limiter.retry_after("user1");
        assert!(wait.is_some());
        assert!(wait.unwrap() <= Duration::from_secs(60));
    }

    #[test]
    fn test_clones_share_state() {
        let limiter = RateLimiter::new(1, Duration::from_secs(1));
        let shared = limiter.clone();

        assert!(limiter.allow("user1"));
        assert!(!shared.allow("user1"));
    }
}
