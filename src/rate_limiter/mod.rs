//! # Rate Limiter Module
//!
//! ## Module Structure
//!
//! ```text
//!     rate_limiter/
//!     ├── mod.rs          (You are here - Module organization)
//!     ├── config.rs       (Capacity, refill rate, validation)
//!     ├── error.rs        (Configuration errors)
//!     ├── clock.rs        (Injectable monotonic time)
//!     ├── bucket.rs       (Single-owner token bucket accounting)
//!     ├── core.rs         (Thread-safe limiter around the bucket)
//!     └── metrics.rs      (Counters and health indicators)
//! ```
//!
//! ## Architecture Flow
//!
//! ```text
//!     Caller
//!        │  try_acquire()
//!        ▼
//!     ┌──────────────┐
//!     │ RateLimiter  │ ◄── Mutex critical section
//!     └──────┬───────┘
//!            ▼
//!     ┌──────────────┐      ┌─────────┐
//!     │ TokenBucket  │ ───► │  Clock  │ ◄── Monotonic or manual
//!     └──────┬───────┘      └─────────┘
//!            ▼
//!     ┌──────────────┐
//!     │   Metrics    │ ◄── Counters snapshot
//!     └──────────────┘
//! ```

mod bucket;
mod clock;
mod config;
mod core;
mod error;
mod metrics;

/// Configuration and its limits
pub use config::{RateLimiterConfig, MAX_CAPACITY};

/// Errors raised while building a limiter
pub use error::{RateLimiterError, Result};

/// Time sources
pub use clock::{Clock, ManualClock, MonotonicClock};

/// Single-owner token bucket
pub use bucket::TokenBucket;

/// Thread-safe rate limiter
pub use self::core::RateLimiter;

/// Metrics and health monitoring
pub use metrics::{HealthStatus, RateLimiterMetrics};
