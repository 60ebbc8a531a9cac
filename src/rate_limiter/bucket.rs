//! # Token Bucket Accounting
//!
//! The single-owner core of the limiter. Every operation reconciles elapsed
//! time into tokens before doing anything else:
//!
//! ```text
//!     try_acquire() flow:
//!
//!     now ──► elapsed = now - last_refill
//!                 │
//!                 ▼
//!     tokens = min(capacity, tokens + elapsed × rate)
//!     last_refill = now                  (always, even on rejection)
//!                 │
//!                 ▼
//!     tokens ≥ 1 ? ──Yes──► tokens -= 1 ──► ✅ admitted
//!          │
//!          No ─────────────────────────────► ❌ rejected (tokens unchanged)
//! ```
//!
//! `TokenBucket` takes `&mut self`, so the borrow checker guarantees a single
//! caller at a time. Share a bucket between threads through
//! [`RateLimiter`](super::core::RateLimiter), which runs these same steps
//! inside a mutex.

use super::clock::{Clock, MonotonicClock};
use super::config::RateLimiterConfig;
use super::error::Result;
use super::metrics::RateLimiterMetrics;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// A token bucket owned by exactly one caller.
///
/// ```rust
/// use tollbooth::{RateLimiterConfig, TokenBucket};
///
/// let mut bucket = TokenBucket::new(RateLimiterConfig::new(3, 1.0)).unwrap();
///
/// let decisions: Vec<bool> = (0..5).map(|_| bucket.try_acquire()).collect();
/// assert_eq!(decisions, [true, true, true, false, false]);
/// ```
#[derive(Debug)]
pub struct TokenBucket<C = MonotonicClock> {
    /// Current tokens; `0.0 ..= capacity`, fractional between calls.
    tokens: f64,

    /// Clock reading at the last reconciliation.
    last_refill: Instant,

    capacity: u64,
    refill_rate: f64,
    clock: C,

    // Counters for metrics
    total_acquired: u64,
    total_rejected: u64,
    total_refills: u64,
    consecutive_rejections: u32,
}

impl TokenBucket<MonotonicClock> {
    /// Creates a full bucket on the system monotonic clock.
    ///
    /// # Errors
    ///
    /// Fails if the configuration does not validate; see
    /// [`RateLimiterConfig::validate`].
    pub fn new(config: RateLimiterConfig) -> Result<Self> {
        Self::with_clock(config, MonotonicClock)
    }
}

impl<C: Clock> TokenBucket<C> {
    /// Creates a full bucket that reads time from `clock`.
    ///
    /// # Errors
    ///
    /// Fails if the configuration does not validate; no bucket is created.
    pub fn with_clock(config: RateLimiterConfig, clock: C) -> Result<Self> {
        config.validate()?;

        let now = clock.now();
        debug!(
            capacity = config.capacity,
            refill_rate = config.refill_rate,
            "Token bucket created"
        );

        Ok(Self {
            tokens: config.capacity as f64,
            last_refill: now,
            capacity: config.capacity,
            refill_rate: config.refill_rate,
            clock,
            total_acquired: 0,
            total_rejected: 0,
            total_refills: 0,
            consecutive_rejections: 0,
        })
    }

    /// Attempts to take one token.
    ///
    /// Returns `true` if the request may proceed. Never blocks.
    #[inline]
    pub fn try_acquire(&mut self) -> bool {
        self.try_acquire_n(1)
    }

    /// Attempts to take `n` tokens at once; either all are taken or none.
    ///
    /// Acquiring 0 tokens always succeeds. Asking for more than the capacity
    /// always fails, since the bucket can never hold that many.
    ///
    /// ```rust
    /// use tollbooth::{RateLimiterConfig, TokenBucket};
    ///
    /// let mut bucket = TokenBucket::new(RateLimiterConfig::new(10, 1.0)).unwrap();
    /// assert!(bucket.try_acquire_n(7));
    /// assert!(!bucket.try_acquire_n(5)); // only 3 left, none taken
    /// assert!(bucket.try_acquire_n(3));
    /// ```
    pub fn try_acquire_n(&mut self, n: u64) -> bool {
        self.refill();

        if n == 0 {
            return true;
        }

        // Checked in integers: `n as f64` rounds above 2^53.
        if n > self.capacity {
            self.on_rejection();
            return false;
        }

        let wanted = n as f64;
        if self.tokens >= wanted {
            self.tokens -= wanted;
            self.on_acquisition(n);
            true
        } else {
            self.on_rejection();
            false
        }
    }

    /// Whole tokens available right now.
    ///
    /// Reconciles elapsed time first. Any fractional remainder stays hidden.
    pub fn available_tokens(&mut self) -> u64 {
        self.refill();
        self.tokens.floor() as u64
    }

    /// How long until the next single-token request would be admitted.
    ///
    /// Returns [`Duration::ZERO`] if a token is available now. Nothing is
    /// reserved: another caller may take the token first.
    ///
    /// The estimate is rounded up, so a caller that waits exactly this long
    /// finds a whole token (absent competing callers).
    pub fn time_until_available(&mut self) -> Duration {
        self.refill();
        let missing = 1.0 - self.tokens;
        if missing <= 0.0 {
            return Duration::ZERO;
        }

        let estimate = (missing / self.refill_rate * 1e9).ceil();
        if !estimate.is_finite() || estimate >= u64::MAX as f64 {
            return Duration::MAX;
        }

        // Float rounding in the refill sum can still land just under 1.0;
        // nudge forward until the same arithmetic refill() uses reaches it.
        let mut nanos = estimate as u64;
        let mut step = 1u64;
        while !self.is_whole_token_after(Duration::from_nanos(nanos)) {
            if nanos == u64::MAX {
                return Duration::MAX;
            }
            nanos = nanos.saturating_add(step);
            step = step.saturating_mul(2);
        }
        Duration::from_nanos(nanos)
    }

    /// Refills to capacity and clears all counters.
    pub fn reset(&mut self) {
        self.tokens = self.capacity as f64;
        self.last_refill = self.reconcile_now();
        self.total_acquired = 0;
        self.total_rejected = 0;
        self.total_refills = 0;
        self.consecutive_rejections = 0;
        debug!(capacity = self.capacity, "Token bucket reset");
    }

    /// Snapshot of counters and current state.
    ///
    /// Does not reconcile elapsed time, so `current_tokens` is the count as of
    /// the last operation.
    pub fn metrics(&self) -> RateLimiterMetrics {
        let total = self.total_acquired + self.total_rejected;
        let pressure_ratio = if total == 0 {
            0.0
        } else {
            self.total_rejected as f64 / total as f64
        };

        RateLimiterMetrics {
            total_acquired: self.total_acquired,
            total_rejected: self.total_rejected,
            total_refills: self.total_refills,
            current_tokens: self.tokens.floor() as u64,
            capacity: self.capacity,
            consecutive_rejections: self.consecutive_rejections,
            pressure_ratio,
        }
    }

    /// Burst capacity.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Refill rate in tokens per second.
    pub fn refill_rate(&self) -> f64 {
        self.refill_rate
    }

    /// The clock this bucket reads.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Exact token count, fractional part included.
    #[cfg(test)]
    pub(crate) fn tokens(&self) -> f64 {
        self.tokens
    }

    #[cfg(test)]
    pub(crate) fn last_refill(&self) -> Instant {
        self.last_refill
    }

    /// Converts time elapsed since the last reconciliation into tokens.
    fn refill(&mut self) {
        let now = self.reconcile_now();
        let elapsed = now.saturating_duration_since(self.last_refill);
        self.last_refill = now;

        if elapsed.is_zero() {
            return;
        }

        let before = self.tokens;
        let capacity = self.capacity as f64;
        self.tokens = (before + elapsed.as_secs_f64() * self.refill_rate).min(capacity);

        if self.tokens > before {
            self.total_refills += 1;
            trace!(
                elapsed_us = elapsed.as_micros() as u64,
                added = self.tokens - before,
                tokens = self.tokens,
                "Refilled tokens"
            );
        }
    }

    /// Whether refilling for `elapsed` would bring the bucket to one token.
    #[inline]
    fn is_whole_token_after(&self, elapsed: Duration) -> bool {
        self.tokens + elapsed.as_secs_f64() * self.refill_rate >= 1.0
    }

    /// Reads the clock, never stepping back behind `last_refill`.
    #[inline]
    fn reconcile_now(&self) -> Instant {
        self.clock.now().max(self.last_refill)
    }

    #[inline]
    fn on_acquisition(&mut self, n: u64) {
        self.total_acquired += n;
        self.consecutive_rejections = 0;
        if self.tokens < 1.0 {
            debug!(
                total_acquired = self.total_acquired,
                "Token bucket drained"
            );
        }
    }

    #[inline]
    fn on_rejection(&mut self) {
        self.total_rejected += 1;
        self.consecutive_rejections = self.consecutive_rejections.saturating_add(1);
    }
}
