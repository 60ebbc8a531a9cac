//! # Tollbooth - Token Bucket Admission Gate
//!
//! An in-process rate limiter that answers one question instantly: may this
//! request proceed now? It never blocks, queues, or sleeps.
//!
//! ## The Token Bucket Algorithm
//!
//! ```text
//!     capacity = 3, refill = 1 token/s
//!
//!     t=0.0   [🪙🪙🪙]  start full
//!     call    [🪙🪙 ]   ✅
//!     call    [🪙  ]    ✅
//!     call    [    ]    ✅
//!     call    [    ]    ❌ rejected
//!     t=1.1   [🪙◔ ]    1.1 tokens trickled in
//!     call    [◔   ]    ✅ 0.1 carried over
//! ```
//!
//! - **Capacity** bounds how many tokens can pile up, which is the largest burst
//! - **Refill rate** is the sustained throughput, in tokens per second
//! - Tokens accumulate **continuously**; fractional leftovers carry over
//!
//! ## Quick Start
//!
//! ```rust
//! use tollbooth::RateLimiter;
//!
//! // 100 burst, 10 requests per second sustained
//! let limiter = RateLimiter::new(100, 10.0)?;
//!
//! if limiter.try_acquire() {
//!     // handle the request
//! } else {
//!     // return 429 Too Many Requests
//! }
//! # Ok::<(), tollbooth::RateLimiterError>(())
//! ```
//!
//! ### Builder
//!
//! ```rust
//! use tollbooth::RateLimiterBuilder;
//!
//! let limiter = RateLimiterBuilder::new()
//!     .capacity(20)
//!     .refill_rate(2.5)
//!     .build()?;
//! # Ok::<(), tollbooth::RateLimiterError>(())
//! ```
//!
//! ### Deterministic time in tests
//!
//! ```rust
//! use std::time::Duration;
//! use tollbooth::{ManualClock, RateLimiter, RateLimiterConfig};
//!
//! let clock = ManualClock::new();
//! let limiter = RateLimiter::with_clock(RateLimiterConfig::new(1, 2.0), clock.clone())?;
//!
//! assert!(limiter.try_acquire());
//! clock.advance(Duration::from_millis(300));
//! assert!(!limiter.try_acquire()); // 0.6 tokens
//! clock.advance(Duration::from_millis(200));
//! assert!(limiter.try_acquire()); // 1.0 token
//! # Ok::<(), tollbooth::RateLimiterError>(())
//! ```
//!
//! ## Ownership and Thread Safety
//!
//! - [`TokenBucket`] takes `&mut self`: one owner, no locking.
//! - [`RateLimiter`] is `Sync`: each call runs refill-then-consume inside a
//!   single mutex critical section, so concurrent callers never over-admit.
//!   Share it through [`SharedRateLimiter`].
//!
//! There is no global limiter. Each call site that needs its own limit owns
//! its own instance; per-client limits mean one limiter per client, kept by
//! the caller.
//!
//! ## Configuration Errors
//!
//! A capacity of zero or a refill rate that is not a positive finite number is
//! rejected with [`RateLimiterError::InvalidConfiguration`]. Admission checks
//! themselves never fail.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    missing_debug_implementations
)]
#![forbid(unsafe_code)]

mod rate_limiter;

pub use rate_limiter::{
    Clock, HealthStatus, ManualClock, MonotonicClock, RateLimiter, RateLimiterConfig,
    RateLimiterError, RateLimiterMetrics, Result, TokenBucket, MAX_CAPACITY,
};

/// A rate limiter wrapped in `Arc` for sharing across threads.
///
/// ```rust
/// use tollbooth::{RateLimiter, SharedRateLimiter};
/// use std::sync::Arc;
///
/// let shared: SharedRateLimiter = Arc::new(RateLimiter::new(100, 10.0).unwrap());
///
/// let limiter = shared.clone();
/// std::thread::spawn(move || {
///     limiter.try_acquire();
/// })
/// .join()
/// .unwrap();
/// ```
pub type SharedRateLimiter<C = MonotonicClock> = std::sync::Arc<RateLimiter<C>>;

/// Version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Minimum supported Rust version.
///
/// `Duration::try_from_secs_f64` needs 1.66; `dep:` feature syntax needs 1.60.
pub const MSRV: &str = "1.70.0";

/// Common imports.
///
/// ```rust
/// use tollbooth::prelude::*;
///
/// let limiter = RateLimiter::new(10, 1.0).unwrap();
/// let status = limiter.metrics().health_status();
/// assert_eq!(status, HealthStatus::Healthy);
/// ```
pub mod prelude {
    //! Types most embedders need.

    pub use crate::{
        Clock, HealthStatus, RateLimiter, RateLimiterBuilder, RateLimiterConfig,
        RateLimiterError, RateLimiterMetrics, SharedRateLimiter, TokenBucket,
    };
}

/// Fluent construction of a [`RateLimiter`].
///
/// ```rust
/// use tollbooth::RateLimiterBuilder;
///
/// // 100 requests per minute, all of them burstable
/// let limiter = RateLimiterBuilder::new()
///     .capacity(100)
///     .refill_rate(100.0 / 60.0)
///     .build()
///     .unwrap();
///
/// // Invalid settings are reported, not panicked on
/// let result = RateLimiterBuilder::new().capacity(0).build();
/// assert!(result.is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RateLimiterBuilder {
    config: RateLimiterConfig,
}

impl RateLimiterBuilder {
    /// Starts from [`RateLimiterConfig::default`] (50 burst, 10 tokens/s).
    pub fn new() -> Self {
        Self {
            config: RateLimiterConfig::default(),
        }
    }

    /// Starts from an existing configuration.
    pub fn from_config(config: RateLimiterConfig) -> Self {
        Self { config }
    }

    /// Maximum tokens the bucket holds; the largest admissible burst.
    pub fn capacity(mut self, tokens: u64) -> Self {
        self.config.capacity = tokens;
        self
    }

    /// Tokens added per second.
    pub fn refill_rate(mut self, tokens_per_second: f64) -> Self {
        self.config.refill_rate = tokens_per_second;
        self
    }

    /// Sets the refill rate to one token every `interval`.
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use tollbooth::RateLimiterBuilder;
    ///
    /// let limiter = RateLimiterBuilder::new()
    ///     .capacity(1)
    ///     .refill_every(Duration::from_millis(500))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(limiter.refill_rate(), 2.0);
    /// ```
    pub fn refill_every(mut self, interval: std::time::Duration) -> Self {
        self.config.refill_rate = 1.0 / interval.as_secs_f64();
        self
    }

    /// The configuration as built so far.
    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    /// Builds a limiter on the system monotonic clock.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimiterError::InvalidConfiguration`] for a zero capacity
    /// or a refill rate that is not a positive finite number.
    pub fn build(self) -> Result<RateLimiter> {
        RateLimiter::with_config(self.config)
    }

    /// Builds a limiter that reads time from `clock`.
    pub fn build_with_clock<C: Clock>(self, clock: C) -> Result<RateLimiter<C>> {
        RateLimiter::with_clock(self.config, clock)
    }

    /// Builds a single-owner bucket instead of a shared limiter.
    pub fn build_bucket(self) -> Result<TokenBucket> {
        TokenBucket::new(self.config)
    }
}
