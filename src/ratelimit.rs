//! Per-user token bucket applied at the generation endpoint before any
//! pipeline work begins.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Instant;

/// Snapshot of a bucket after an acquisition attempt, used to populate the
/// `X-RateLimit-*` headers.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitStatus {
    pub limit: u32,
    pub remaining: u32,
    pub reset_after_secs: u64,
}

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

pub struct RateLimiter {
    capacity: u32,
    refill_per_sec: f64,
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl RateLimiter {
    /// `capacity` requests allowed per `window_secs` sliding window.
    pub fn new(capacity: u32, window_secs: u64) -> Self {
        Self {
            capacity,
            refill_per_sec: capacity as f64 / window_secs as f64,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Take one token for `key`. Returns the post-acquisition status, or
    /// the current status as the error when the bucket is empty.
    pub fn try_acquire(&self, key: &str) -> Result<RateLimitStatus, RateLimitStatus> {
        let now = Instant::now();
        let mut buckets = self.buckets.lock();
        let bucket = buckets.entry(key.to_string()).or_insert(Bucket {
            tokens: self.capacity as f64,
            last_refill: now,
        });

        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_per_sec).min(self.capacity as f64);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(self.status_of(bucket))
        } else {
            Err(self.status_of(bucket))
        }
    }

    fn status_of(&self, bucket: &Bucket) -> RateLimitStatus {
        let remaining = bucket.tokens.floor().max(0.0) as u32;
        let deficit = 1.0 - bucket.tokens;
        let reset_after_secs = if deficit > 0.0 {
            (deficit / self.refill_per_sec).ceil() as u64
        } else {
            0
        };
        RateLimitStatus {
            limit: self.capacity,
            remaining,
            reset_after_secs,
        }
    }
}

impl Default for RateLimiter {
    /// Production default: 10 generation requests per minute per user.
    fn default() -> Self {
        Self::new(10, 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_capacity() {
        let limiter = RateLimiter::new(3, 60);
        assert!(limiter.try_acquire("user-a").is_ok());
        assert!(limiter.try_acquire("user-a").is_ok());
        assert!(limiter.try_acquire("user-a").is_ok());
        assert!(limiter.try_acquire("user-a").is_err());
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new(1, 60);
        assert!(limiter.try_acquire("user-a").is_ok());
        assert!(limiter.try_acquire("user-b").is_ok());
        assert!(limiter.try_acquire("user-a").is_err());
    }

    #[test]
    fn test_remaining_counts_down() {
        let limiter = RateLimiter::new(3, 60);
        let first = limiter.try_acquire("user-a").unwrap();
        assert_eq!(first.limit, 3);
        assert_eq!(first.remaining, 2);
        let second = limiter.try_acquire("user-a").unwrap();
        assert_eq!(second.remaining, 1);
    }

    #[test]
    fn test_exhausted_bucket_reports_reset_window() {
        let limiter = RateLimiter::new(1, 60);
        limiter.try_acquire("user-a").unwrap();
        let status = limiter.try_acquire("user-a").unwrap_err();
        assert_eq!(status.remaining, 0);
        assert!(status.reset_after_secs >= 1);
        assert!(status.reset_after_secs <= 60);
    }
}
