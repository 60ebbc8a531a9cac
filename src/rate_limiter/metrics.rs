//! # Rate Limiter Metrics
//!
//! Counters kept alongside the bucket, plus a few derived health indicators.
//! The limiter itself never acts on them; they exist for the embedding
//! service's dashboards and alerts.
//!
//! ```text
//!     Metrics snapshot:
//!     ┌─────────────────────────────────────┐
//!     │  Admitted: 85   Rejected: 15        │
//!     │  ▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓░░░  (85%)        │
//!     │                                     │
//!     │  Tokens: 3/10                       │
//!     │  ▓▓▓▓▓▓░░░░░░░░░░░░░░  (30%)        │
//!     │                                     │
//!     │  Health: ✅ Healthy                 │
//!     └─────────────────────────────────────┘
//! ```

use std::fmt;

/// Consecutive rejections above which a limiter counts as under sustained pressure.
const SUSTAINED_REJECTION_STREAK: u32 = 10;

/// Rejection ratio above which a limiter counts as under sustained pressure.
const SUSTAINED_PRESSURE_RATIO: f64 = 0.3;

/// Point-in-time snapshot of a limiter's counters.
///
/// Token counts are whole tokens; the fractional part the bucket carries
/// between calls is not reported.
///
/// ```rust
/// use tollbooth::RateLimiter;
///
/// let limiter = RateLimiter::new(100, 10.0).unwrap();
/// for _ in 0..120 {
///     limiter.try_acquire();
/// }
///
/// let metrics = limiter.metrics();
/// assert_eq!(metrics.total_requests(), 120);
/// if metrics.is_under_pressure() {
///     println!("{}", metrics.summary());
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimiterMetrics {
    /// Tokens handed out (requests admitted, counting multi-token acquisitions in full).
    pub total_acquired: u64,

    /// Acquisition attempts that were turned away.
    pub total_rejected: u64,

    /// Reconciliations that actually added tokens.
    pub total_refills: u64,

    /// Whole tokens in the bucket at the last operation.
    pub current_tokens: u64,

    /// Burst capacity.
    pub capacity: u64,

    /// Rejections since the last admission.
    pub consecutive_rejections: u32,

    /// `total_rejected / (total_acquired + total_rejected)`, 0.0 when idle.
    pub pressure_ratio: f64,
}

impl RateLimiterMetrics {
    /// Fraction of counted units that were admitted, between 0.0 and 1.0.
    ///
    /// A limiter that has seen no traffic reports 1.0.
    #[inline]
    pub fn success_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            1.0
        } else {
            self.total_acquired as f64 / total as f64
        }
    }

    /// `1.0 - success_rate()`.
    #[inline]
    pub fn rejection_rate(&self) -> f64 {
        1.0 - self.success_rate()
    }

    /// Total counted units (acquired tokens plus rejected attempts).
    #[inline]
    pub fn total_requests(&self) -> u64 {
        self.total_acquired.saturating_add(self.total_rejected)
    }

    /// Share of the capacity currently spent: 0.0 when full, 1.0 when empty.
    #[inline]
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            1.0 - (self.current_tokens as f64 / self.capacity as f64)
        }
    }

    /// Remaining capacity as a percentage.
    #[inline]
    pub fn availability_percentage(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            (self.current_tokens as f64 / self.capacity as f64) * 100.0
        }
    }

    /// The bucket is empty or fewer than half the requests get through.
    #[inline]
    pub fn is_under_pressure(&self) -> bool {
        self.success_rate() < 0.5 || self.current_tokens == 0
    }

    /// Demand has exceeded the configured rate for a while.
    ///
    /// True after more than 10 rejections in a row, or when over 30% of all
    /// attempts were rejected.
    #[inline]
    pub fn is_under_sustained_pressure(&self) -> bool {
        self.consecutive_rejections > SUSTAINED_REJECTION_STREAK
            || self.pressure_ratio > SUSTAINED_PRESSURE_RATIO
    }

    /// Three-level assessment derived from the pressure indicators.
    ///
    /// ```rust
    /// use tollbooth::{HealthStatus, RateLimiter};
    ///
    /// let limiter = RateLimiter::new(100, 10.0).unwrap();
    /// match limiter.metrics().health_status() {
    ///     HealthStatus::Healthy => println!("✅ All good"),
    ///     HealthStatus::Degraded => println!("⚠️ Monitor closely"),
    ///     HealthStatus::Critical => println!("🔴 Take action!"),
    /// }
    /// ```
    pub fn health_status(&self) -> HealthStatus {
        if self.is_under_sustained_pressure() {
            HealthStatus::Critical
        } else if self.is_under_pressure() {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }

    /// Multi-line report suitable for logs.
    ///
    /// ```text
    /// RateLimiter Metrics:
    /// ├─ Traffic:
    /// │  ├─ Success Rate: 85.00%
    /// │  └─ Rejection Rate: 15.00%
    /// ├─ Capacity:
    /// │  ├─ Available Tokens: 3/10
    /// │  └─ Utilization: 70.00%
    /// ├─ Counters:
    /// │  ├─ Total Acquired: 85
    /// │  ├─ Total Rejected: 15
    /// │  ├─ Total Refills: 40
    /// │  └─ Consecutive Rejections: 0
    /// └─ Health: Healthy
    /// ```
    pub fn summary(&self) -> String {
        format!(
            "RateLimiter Metrics:\n\
             ├─ Traffic:\n\
             │  ├─ Success Rate: {:.2}%\n\
             │  └─ Rejection Rate: {:.2}%\n\
             ├─ Capacity:\n\
             │  ├─ Available Tokens: {}/{}\n\
             │  └─ Utilization: {:.2}%\n\
             ├─ Counters:\n\
             │  ├─ Total Acquired: {}\n\
             │  ├─ Total Rejected: {}\n\
             │  ├─ Total Refills: {}\n\
             │  └─ Consecutive Rejections: {}\n\
             └─ Health: {:?}",
            self.success_rate() * 100.0,
            self.rejection_rate() * 100.0,
            self.current_tokens,
            self.capacity,
            self.utilization() * 100.0,
            self.total_acquired,
            self.total_rejected,
            self.total_refills,
            self.consecutive_rejections,
            self.health_status(),
        )
    }
}

impl fmt::Display for RateLimiterMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Coarse health of a rate limiter.
///
/// ```text
///     Healthy ──────► Tokens available, most requests admitted
///        │
///     Degraded ─────► Bucket empty or admitting under half
///        │
///     Critical ─────► Long rejection streak or >30% rejected overall
/// ```
///
/// ```rust
/// use tracing::{error, warn};
/// use tollbooth::{HealthStatus, RateLimiter};
///
/// let limiter = RateLimiter::new(100, 10.0).unwrap();
/// let health = limiter.metrics().health_status();
///
/// match health {
///     HealthStatus::Healthy => {}
///     HealthStatus::Degraded => warn!("Rate limiter degraded: {}", health.suggested_action()),
///     HealthStatus::Critical => error!("Rate limiter critical: {}", health.suggested_action()),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Operating normally.
    Healthy,

    /// Bucket empty or success rate below 50%; recovers if load drops.
    Degraded,

    /// Sustained rejection; capacity or rate is too low for the load.
    Critical,
}

impl HealthStatus {
    /// Anything other than [`HealthStatus::Healthy`].
    pub fn is_unhealthy(&self) -> bool {
        !matches!(self, Self::Healthy)
    }

    /// Short operator guidance for the status.
    pub fn suggested_action(&self) -> &'static str {
        match self {
            Self::Healthy => "No action needed",
            Self::Degraded => "Monitor closely, consider raising capacity",
            Self::Critical => "Immediate action required: raise the refill rate or shed load",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "✅ Healthy"),
            Self::Degraded => write!(f, "⚠️ Degraded"),
            Self::Critical => write!(f, "🔴 Critical"),
        }
    }
}
