//! Failed-attempt rate limiting.
//!
//! Tracks failed sign-in attempts per email. After `max_attempts` failures a
//! key is locked until `lockout` has passed since its last attempt. Entries
//! expire lazily on access, so there are no background timers, and the map
//! never holds more than `capacity` keys.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::core::Clock;
use crate::error::HabitError;

/// Limits applied by a [`RateLimiter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Failures allowed before the key is locked
    pub max_attempts: u32,
    /// How long a key stays locked after its last attempt
    pub lockout: Duration,
    /// Maximum number of tracked keys. Zero tracks nothing.
    pub capacity: usize,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lockout: Duration::minutes(15),
            capacity: 1024,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct AttemptRecord {
    count: u32,
    last_attempt: DateTime<Utc>,
}

/// Per-key failed-attempt limiter with an injected clock.
#[derive(Debug)]
pub struct RateLimiter<C: Clock> {
    clock: C,
    policy: RateLimitPolicy,
    attempts: HashMap<String, AttemptRecord>,
}

impl<C: Clock> RateLimiter<C> {
    /// Create a limiter.
    #[must_use]
    pub fn new(clock: C, policy: RateLimitPolicy) -> Self {
        Self {
            clock,
            policy,
            attempts: HashMap::new(),
        }
    }

    /// Check whether `email` may attempt now.
    ///
    /// # Errors
    ///
    /// Returns `HabitError::RateLimited` with the remaining lockout, rounded
    /// up to whole seconds, if the key is locked.
    pub fn check(&mut self, email: &str) -> Result<(), HabitError> {
        let now = self.clock.now();
        let key = normalize(email);

        let Some(record) = self.attempts.get(&key).copied() else {
            return Ok(());
        };

        let elapsed = now - record.last_attempt;
        if elapsed > self.policy.lockout {
            self.attempts.remove(&key);
            return Ok(());
        }

        if record.count >= self.policy.max_attempts {
            let remaining = self.policy.lockout - elapsed;
            let retry_after_secs =
                u64::try_from((remaining.num_milliseconds() + 999) / 1000).unwrap_or(0);
            warn!(key = %key, retry_after_secs, "attempt rejected by rate limiter");
            return Err(HabitError::RateLimited { retry_after_secs });
        }

        Ok(())
    }

    /// Record the outcome of an attempt. Success forgets the key.
    pub fn record(&mut self, email: &str, success: bool) {
        let now = self.clock.now();
        let key = normalize(email);

        if success {
            self.attempts.remove(&key);
            return;
        }

        if !self.attempts.contains_key(&key) {
            if self.policy.capacity == 0 {
                debug!(key = %key, "rate limiter has no capacity, attempt not tracked");
                return;
            }
            if self.attempts.len() >= self.policy.capacity {
                self.evict(now);
            }
        }

        let lockout = self.policy.lockout;
        let record = self.attempts.entry(key).or_insert(AttemptRecord {
            count: 0,
            last_attempt: now,
        });
        if now - record.last_attempt > lockout {
            record.count = 0;
        }
        record.count += 1;
        record.last_attempt = now;
    }

    /// Number of keys currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    /// Whether no keys are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    /// Drop expired keys, then the stalest key if still full.
    fn evict(&mut self, now: DateTime<Utc>) {
        let lockout = self.policy.lockout;
        self.attempts.retain(|_, r| now - r.last_attempt <= lockout);

        if self.attempts.len() >= self.policy.capacity {
            let stalest = self
                .attempts
                .iter()
                .min_by_key(|(_, r)| r.last_attempt)
                .map(|(k, _)| k.clone());
            if let Some(key) = stalest {
                debug!(key = %key, "evicting stalest rate-limit entry");
                self.attempts.remove(&key);
            }
        }
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}
