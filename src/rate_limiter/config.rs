//! # Rate Limiter Configuration
//!
//! Two numbers define a token bucket:
//!
//! ```text
//!     ┌──────────────────────────────┐
//!     │   Capacity                   │ ← Burst limit (whole tokens)
//!     │   ┌─────────────────────┐    │
//!     │   │ 🪙 🪙 🪙 🪙 🪙     │    │
//!     │   │ 🪙 🪙 🪙 ◔          │    │ ← Current tokens (continuous)
//!     │   └─────────────────────┘    │
//!     │                              │
//!     │   Refill Rate: 2.5 tokens/s  │ ← Continuous trickle
//!     └──────────────────────────────┘
//! ```
//!
//! Tokens trickle in continuously rather than arriving in discrete batches,
//! so a rate of 2.5/s yields one token every 400ms and partial tokens carry
//! over between calls.

use super::error::{RateLimiterError, Result};
use std::time::Duration;

/// Largest accepted capacity.
///
/// Token arithmetic runs in `f64`; every integer up to 2^53 is exactly
/// representable, so a full bucket always compares equal to its capacity.
pub const MAX_CAPACITY: u64 = 1 << 53;

/// Configuration for a token bucket.
///
/// ## Examples
///
/// ```rust
/// use std::time::Duration;
/// use tollbooth::RateLimiterConfig;
///
/// // 3 burst, one token per second
/// let config = RateLimiterConfig::new(3, 1.0);
///
/// // 100 req/s sustained, 200 burst
/// let config = RateLimiterConfig::per_second(100);
///
/// // 10 tokens every 5 seconds, 20 burst
/// let config = RateLimiterConfig::per_period(20, 10, Duration::from_secs(5));
/// assert_eq!(config.refill_rate, 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RateLimiterConfig {
    /// Maximum number of tokens the bucket can hold.
    ///
    /// A fresh bucket starts with this many tokens, so it is also the number
    /// of requests admitted back-to-back before the rate kicks in.
    pub capacity: u64,

    /// Tokens added per second.
    pub refill_rate: f64,
}

impl Default for RateLimiterConfig {
    /// 50 burst, 10 tokens per second.
    fn default() -> Self {
        Self {
            capacity: 50,
            refill_rate: 10.0,
        }
    }
}

impl RateLimiterConfig {
    /// Creates a configuration from a capacity and a per-second refill rate.
    ///
    /// Nothing is checked here; [`validate`](Self::validate) runs when a
    /// limiter is built.
    pub fn new(capacity: u64, refill_rate: f64) -> Self {
        Self {
            capacity,
            refill_rate,
        }
    }

    /// Per-second limiting with a burst capacity of twice the rate.
    ///
    /// ```rust
    /// use tollbooth::RateLimiterConfig;
    ///
    /// let config = RateLimiterConfig::per_second(100);
    /// assert_eq!(config.capacity, 200);
    /// assert_eq!(config.refill_rate, 100.0);
    /// ```
    pub fn per_second(requests_per_second: u32) -> Self {
        Self {
            capacity: u64::from(requests_per_second) * 2,
            refill_rate: f64::from(requests_per_second),
        }
    }

    /// Per-minute limiting; the whole minute's quota may be spent as one burst.
    pub fn per_minute(requests_per_minute: u32) -> Self {
        Self {
            capacity: u64::from(requests_per_minute),
            refill_rate: f64::from(requests_per_minute) / 60.0,
        }
    }

    /// `tokens` every `period`, with the given burst `capacity`.
    ///
    /// A zero period yields an infinite rate, which fails validation.
    pub fn per_period(capacity: u64, tokens: u32, period: Duration) -> Self {
        Self {
            capacity,
            refill_rate: f64::from(tokens) / period.as_secs_f64(),
        }
    }

    /// Replaces the burst capacity.
    pub fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the capacity to `multiplier` seconds' worth of refill, rounded up.
    ///
    /// ```rust
    /// use tollbooth::RateLimiterConfig;
    ///
    /// // 10 req/s sustained, bursts up to 50
    /// let config = RateLimiterConfig::per_second(10).with_burst_multiplier(5);
    /// assert_eq!(config.capacity, 50);
    /// ```
    pub fn with_burst_multiplier(mut self, multiplier: u32) -> Self {
        let burst = (self.refill_rate * f64::from(multiplier)).ceil();
        // Non-finite or negative rates saturate here and are caught by validate().
        self.capacity = if burst.is_finite() && burst > 0.0 {
            burst.min(u64::MAX as f64) as u64
        } else {
            0
        };
        self
    }

    /// Checks that the configuration describes a usable bucket.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimiterError::InvalidConfiguration`] if:
    /// - `capacity` is 0 or above [`MAX_CAPACITY`]
    /// - `refill_rate` is not a finite number greater than 0
    ///
    /// ```rust
    /// use tollbooth::RateLimiterConfig;
    ///
    /// assert!(RateLimiterConfig::new(0, 1.0).validate().is_err());
    /// assert!(RateLimiterConfig::new(10, 0.0).validate().is_err());
    /// assert!(RateLimiterConfig::new(10, f64::NAN).validate().is_err());
    /// assert!(RateLimiterConfig::new(1, 2.0).validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(RateLimiterError::invalid(
                "capacity",
                "must be greater than 0",
            ));
        }

        if self.capacity > MAX_CAPACITY {
            return Err(RateLimiterError::invalid(
                "capacity",
                format!("must not exceed {MAX_CAPACITY}, got {}", self.capacity),
            ));
        }

        if !self.refill_rate.is_finite() {
            return Err(RateLimiterError::invalid(
                "refill_rate",
                format!("must be a finite number, got {}", self.refill_rate),
            ));
        }

        if self.refill_rate <= 0.0 {
            return Err(RateLimiterError::invalid(
                "refill_rate",
                format!("must be greater than 0, got {}", self.refill_rate),
            ));
        }

        Ok(())
    }

    /// Time it takes to accumulate one token.
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use tollbooth::RateLimiterConfig;
    ///
    /// let config = RateLimiterConfig::new(1, 2.0);
    /// assert_eq!(config.refill_interval(), Duration::from_millis(500));
    /// ```
    pub fn refill_interval(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.refill_rate).unwrap_or(Duration::MAX)
    }

    /// Time it takes an empty bucket to fill completely.
    pub fn time_to_full(&self) -> Duration {
        Duration::try_from_secs_f64(self.capacity as f64 / self.refill_rate)
            .unwrap_or(Duration::MAX)
    }
}
