//! Rate Limiting Infrastructure
//!
//! In-memory fixed-window rate limiting keyed by client identifier.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // Login policy: 5 attempts per 15 minutes per client
        Self {
            max_requests: 5,
            window: Duration::from_secs(15 * 60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }
}

/// Rate limit check result
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    /// Time until the current window rolls over and the bucket refills
    pub retry_after: Duration,
}

/// Per-key bucket state
#[derive(Debug)]
struct Bucket {
    tokens: u32,
    window_started: Instant,
}

/// Fixed-window token bucket table
///
/// Refill is interval-based, not continuous: when a key's window elapses
/// the bucket is reset to full capacity in one step. Every admitted call
/// consumes one token; a key with zero tokens is denied until rollover.
///
/// Buckets are created lazily on first observation of a key and are never
/// evicted, so the table grows with the number of distinct client keys
/// seen over the process lifetime. Check-and-decrement is atomic under
/// the table lock, so two concurrent calls cannot both take the last
/// token.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    config: RateLimitConfig,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl FixedWindowLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Check and consume one token for `key`
    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    /// Clock-injected variant of [`check`](Self::check)
    pub fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let mut buckets = self.buckets.lock().expect("rate limit table poisoned");

        let bucket = buckets.entry(key.to_string()).or_insert_with(|| Bucket {
            tokens: self.config.max_requests,
            window_started: now,
        });

        // Interval refill: full reset at window rollover
        if now.duration_since(bucket.window_started) >= self.config.window {
            bucket.tokens = self.config.max_requests;
            bucket.window_started = now;
        }

        let elapsed = now.duration_since(bucket.window_started);
        let retry_after = self.config.window.saturating_sub(elapsed);

        if bucket.tokens > 0 {
            bucket.tokens -= 1;
            RateLimitDecision {
                allowed: true,
                remaining: bucket.tokens,
                retry_after,
            }
        } else {
            RateLimitDecision {
                allowed: false,
                remaining: 0,
                retry_after,
            }
        }
    }

    /// Number of distinct client keys observed so far
    pub fn tracked_keys(&self) -> usize {
        self.buckets.lock().expect("rate limit table poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter() -> FixedWindowLimiter {
        FixedWindowLimiter::new(RateLimitConfig::default())
    }

    #[test]
    fn test_sixth_attempt_in_window_denied() {
        let limiter = limiter();
        let now = Instant::now();

        for i in 0..5 {
            let decision = limiter.check_at("1.2.3.4", now);
            assert!(decision.allowed, "attempt {} should be admitted", i + 1);
            assert_eq!(decision.remaining, 4 - i);
        }

        let sixth = limiter.check_at("1.2.3.4", now);
        assert!(!sixth.allowed);
        assert_eq!(sixth.remaining, 0);
    }

    #[test]
    fn test_window_rollover_resets_to_full_capacity() {
        let limiter = limiter();
        let start = Instant::now();

        for _ in 0..6 {
            limiter.check_at("1.2.3.4", start);
        }

        // One full window later the bucket is reset in one step
        let later = start + Duration::from_secs(15 * 60);
        let decision = limiter.check_at("1.2.3.4", later);
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 4);
    }

    #[test]
    fn test_no_continuous_refill_within_window() {
        let limiter = limiter();
        let start = Instant::now();

        for _ in 0..5 {
            limiter.check_at("1.2.3.4", start);
        }

        // Partway through the window nothing has refilled
        let midway = start + Duration::from_secs(14 * 60);
        let decision = limiter.check_at("1.2.3.4", midway);
        assert!(!decision.allowed);
    }

    #[test]
    fn test_keys_are_isolated() {
        let limiter = limiter();
        let now = Instant::now();

        for _ in 0..6 {
            limiter.check_at("1.2.3.4", now);
        }

        let other = limiter.check_at("5.6.7.8", now);
        assert!(other.allowed);
        assert_eq!(other.remaining, 4);
        assert_eq!(limiter.tracked_keys(), 2);
    }

    #[test]
    fn test_retry_after_counts_down() {
        let limiter = limiter();
        let start = Instant::now();

        let first = limiter.check_at("1.2.3.4", start);
        assert_eq!(first.retry_after, Duration::from_secs(15 * 60));

        let later = limiter.check_at("1.2.3.4", start + Duration::from_secs(60));
        assert_eq!(later.retry_after, Duration::from_secs(14 * 60));
    }

    #[test]
    fn test_concurrent_checks_never_over_admit() {
        use std::sync::Arc;
        use std::thread;

        let limiter = Arc::new(limiter());
        let mut handles = Vec::new();

        for _ in 0..20 {
            let limiter = Arc::clone(&limiter);
            handles.push(thread::spawn(move || limiter.check("1.2.3.4").allowed));
        }

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&allowed| allowed)
            .count();
        assert_eq!(admitted, 5);
    }
}
