//! # Time Sources
//!
//! The bucket never reads the system clock directly. It asks a [`Clock`] for
//! the current monotonic instant, which lets tests move time forward by hand
//! instead of sleeping.
//!
//! ```text
//!     Clock implementations:
//!
//!     MonotonicClock ──► Instant::now()        (production default)
//!     ManualClock ─────► origin + offset       (tests, simulations)
//!                          ▲
//!                          └── advance(Duration)
//! ```
//!
//! Both return [`Instant`], so elapsed time is always computed on a monotonic
//! scale and wall-clock adjustments cannot move a bucket backwards.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A source of monotonic time.
///
/// Implementations must never return an instant earlier than one they
/// returned before. The bucket tolerates a violation (elapsed time saturates
/// at zero) but the refill would then be lost rather than deferred.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now(&self) -> Instant {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    #[inline]
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// The operating system's monotonic clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    #[inline(always)]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same offset, so a test can hand one clone to a limiter and
/// keep another to drive time:
///
/// ```rust
/// use std::time::Duration;
/// use tollbooth::{ManualClock, RateLimiter, RateLimiterConfig};
///
/// let clock = ManualClock::new();
/// let limiter = RateLimiter::with_clock(RateLimiterConfig::new(1, 1.0), clock.clone()).unwrap();
///
/// assert!(limiter.try_acquire());
/// assert!(!limiter.try_acquire());
///
/// clock.advance(Duration::from_secs(1));
/// assert!(limiter.try_acquire());
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset_ns: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock frozen at the moment of the call.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_ns: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Moves the clock forward by `by`.
    ///
    /// Offsets saturate at `u64::MAX` nanoseconds (about 584 years).
    pub fn advance(&self, by: Duration) {
        let step = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        let mut current = self.offset_ns.load(Ordering::Relaxed);
        loop {
            let next = current.saturating_add(step);
            match self.offset_ns.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }

    /// Total time this clock has been advanced since creation.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.offset_ns.load(Ordering::Acquire))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_clock_never_goes_back() {
        let clock = MonotonicClock;
        let mut last = clock.now();
        for _ in 0..100 {
            let now = clock.now();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn test_manual_clock_is_frozen() {
        let clock = ManualClock::new();
        let a = clock.now();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(clock.now(), a);
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new();
        let start = clock.now();

        clock.advance(Duration::from_millis(300));
        clock.advance(Duration::from_millis(200));

        assert_eq!(clock.now() - start, Duration::from_millis(500));
        assert_eq!(clock.elapsed(), Duration::from_millis(500));
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();

        handle.advance(Duration::from_secs(2));

        assert_eq!(clock.elapsed(), Duration::from_secs(2));
        assert_eq!(clock.now(), handle.now());
    }

    #[test]
    fn test_clock_through_references() {
        let clock = Arc::new(ManualClock::new());
        let by_ref: &ManualClock = &clock;
        clock.advance(Duration::from_secs(1));
        assert_eq!(Clock::now(&clock), by_ref.now());
    }
}
