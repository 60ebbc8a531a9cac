//! # Thread-Safe Rate Limiter
//!
//! Wraps a [`TokenBucket`] so many threads can share it. The token count and
//! the refill timestamp form one unit of state; reading the clock, refilling,
//! and the compare-and-decrement all happen under one lock:
//!
//! ```text
//!     Thread A ──┐
//!                ├──► lock ──► now ─► refill ─► tokens ≥ 1 ? ─► unlock
//!     Thread B ──┤              (one caller at a time)
//!                │
//!     Thread C ──┘
//! ```
//!
//! Without the lock, two callers could both observe `tokens ≥ 1` before
//! either decrements and admit more requests than the bucket holds.
//!
//! The critical section is a handful of float operations and never blocks on
//! anything else, so contention stays short.

use super::{
    bucket::TokenBucket,
    clock::{Clock, MonotonicClock},
    config::RateLimiterConfig,
    error::Result,
    metrics::RateLimiterMetrics,
};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::warn;

/// A token bucket rate limiter safe to share between threads.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::thread;
/// use tollbooth::RateLimiter;
///
/// let limiter = Arc::new(RateLimiter::new(100, 10.0).unwrap());
///
/// let mut handles = vec![];
/// for _ in 0..4 {
///     let limiter = limiter.clone();
///     handles.push(thread::spawn(move || {
///         (0..50).filter(|_| limiter.try_acquire()).count()
///     }));
/// }
///
/// let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
/// assert!(admitted >= 100); // the whole burst is always spent
/// ```
pub struct RateLimiter<C = MonotonicClock> {
    bucket: Mutex<TokenBucket<C>>,
}

impl RateLimiter<MonotonicClock> {
    /// Creates a limiter with `capacity` burst and `refill_rate` tokens/second.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimiterError::InvalidConfiguration`](super::error::RateLimiterError)
    /// if `capacity` is 0 or `refill_rate` is not a positive finite number.
    ///
    /// ```rust
    /// use tollbooth::RateLimiter;
    ///
    /// // Allow 100 burst, 10 requests per second sustained
    /// let limiter = RateLimiter::new(100, 10.0).unwrap();
    ///
    /// assert!(RateLimiter::new(0, 10.0).is_err());
    /// ```
    #[inline]
    pub fn new(capacity: u64, refill_rate: f64) -> Result<Self> {
        Self::with_config(RateLimiterConfig::new(capacity, refill_rate))
    }

    /// Creates a limiter from a configuration.
    ///
    /// ```rust
    /// use tollbooth::{RateLimiter, RateLimiterConfig};
    ///
    /// let limiter = RateLimiter::with_config(RateLimiterConfig::per_minute(600)).unwrap();
    /// assert_eq!(limiter.capacity(), 600);
    /// ```
    pub fn with_config(config: RateLimiterConfig) -> Result<Self> {
        Self::with_clock(config, MonotonicClock)
    }
}

impl<C: Clock> RateLimiter<C> {
    /// Creates a limiter that reads time from `clock`.
    pub fn with_clock(config: RateLimiterConfig, clock: C) -> Result<Self> {
        Ok(Self::from_bucket(TokenBucket::with_clock(config, clock)?))
    }

    /// Wraps an existing bucket, keeping its state.
    pub fn from_bucket(bucket: TokenBucket<C>) -> Self {
        Self {
            bucket: Mutex::new(bucket),
        }
    }

    /// Attempts to acquire a single token.
    ///
    /// # Returns
    ///
    /// - `true` if a token was taken and the request may proceed
    /// - `false` if the bucket is empty (rate limited)
    ///
    /// ```rust
    /// use tollbooth::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(10, 1.0).unwrap();
    ///
    /// if limiter.try_acquire() {
    ///     println!("Got a token!");
    /// } else {
    ///     println!("Rate limited!");
    /// }
    /// ```
    #[inline]
    pub fn try_acquire(&self) -> bool {
        self.lock().try_acquire()
    }

    /// Attempts to acquire `n` tokens atomically; all or nothing.
    ///
    /// ```text
    ///     try_acquire_n(5):
    ///
    ///     7.3 tokens ──► 2.3 tokens ✅
    ///     3.9 tokens ──► 3.9 tokens ❌ (nothing taken)
    /// ```
    #[inline]
    pub fn try_acquire_n(&self, n: u64) -> bool {
        self.lock().try_acquire_n(n)
    }

    /// Whole tokens available right now, after reconciling elapsed time.
    pub fn available_tokens(&self) -> u64 {
        self.lock().available_tokens()
    }

    /// Time until one token will be available; zero if one is available now.
    ///
    /// Useful for a `Retry-After` hint. It is only an estimate under
    /// contention: other callers may spend the token first.
    pub fn time_until_available(&self) -> Duration {
        self.lock().time_until_available()
    }

    /// Returns a snapshot of the limiter's counters and state.
    ///
    /// ```rust
    /// use tollbooth::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(100, 10.0).unwrap();
    /// limiter.try_acquire();
    ///
    /// let metrics = limiter.metrics();
    /// println!("Success rate: {:.2}%", metrics.success_rate() * 100.0);
    /// println!("Current tokens: {}/{}", metrics.current_tokens, metrics.capacity);
    /// ```
    pub fn metrics(&self) -> RateLimiterMetrics {
        self.lock().metrics()
    }

    /// Refills to capacity and zeroes all counters.
    ///
    /// ```rust
    /// use tollbooth::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(100, 10.0).unwrap();
    /// limiter.try_acquire_n(60);
    ///
    /// limiter.reset();
    /// assert_eq!(limiter.available_tokens(), 100);
    /// ```
    pub fn reset(&self) {
        self.lock().reset();
    }

    /// Burst capacity.
    pub fn capacity(&self) -> u64 {
        self.lock().capacity()
    }

    /// Refill rate in tokens per second.
    pub fn refill_rate(&self) -> f64 {
        self.lock().refill_rate()
    }

    /// Unwraps the limiter, returning the bucket and its state.
    pub fn into_bucket(self) -> TokenBucket<C> {
        self.bucket
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Enters the critical section.
    ///
    /// Bucket methods do not panic midway through an update, so state behind a
    /// poisoned lock is still consistent and is used as is.
    #[inline]
    fn lock(&self) -> MutexGuard<'_, TokenBucket<C>> {
        self.bucket.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter mutex poisoned by a panicking thread; recovering state");
            poisoned.into_inner()
        })
    }
}

impl<C: Clock> std::fmt::Debug for RateLimiter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bucket = self.lock();
        f.debug_struct("RateLimiter")
            .field("capacity", &bucket.capacity())
            .field("refill_rate", &bucket.refill_rate())
            .field("current_tokens", &bucket.metrics().current_tokens)
            .finish()
    }
}
