//! # Rate Limiter Errors
//!
//! Only construction can fail. Once a limiter exists, every admission check
//! returns a plain `bool` and never an error.
//!
//! Older token bucket code accepted any capacity and rate, so a zero or
//! negative value produced a bucket that never admitted anything (or admitted
//! erratically). Configurations are now checked up front and rejected with
//! [`RateLimiterError::InvalidConfiguration`].

use thiserror::Error;

/// Errors produced while configuring a rate limiter.
///
/// ```rust
/// use tollbooth::{RateLimiter, RateLimiterError};
///
/// let err = RateLimiter::new(0, 1.0).unwrap_err();
/// assert!(matches!(
///     err,
///     RateLimiterError::InvalidConfiguration { field: "capacity", .. }
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RateLimiterError {
    /// A configuration parameter is out of range.
    #[error("invalid rate limiter configuration: `{field}` {reason}")]
    InvalidConfiguration {
        /// Name of the offending parameter.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl RateLimiterError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = RateLimiterError> = std::result::Result<T, E>;
