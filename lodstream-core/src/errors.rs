//! Error Types for Storage Construction and Configuration
//!
//! ## Design Philosophy
//!
//! Most of this crate never fails in the `Result` sense. Reading outside the
//! stored window is an ordinary outcome and comes back as `None`; a degenerate
//! level-of-detail query comes back as an empty range. What is left for
//! `LodError` are programming errors made while *configuring* a structure:
//!
//! 1. **Fail Fast**: A zero segment size or zero ring capacity is rejected at
//!    construction. Values are never silently clamped into range.
//!
//! 2. **No Heap Allocation**: Variants carry only numbers and `&'static str`,
//!    so the enum is `Copy` and usable on `no_std` targets.
//!
//! 3. **Distinguishable**: Callers can tell "no data here" (`None`) apart from
//!    "malformed request" (`Err`).
//!
//! ## Error Categories
//!
//! - `InvalidConfig`: a size or capacity parameter is zero
//! - `InvalidFrequency`: a channel sampling rate is not a positive number
//! - `InvalidMapping`: a channel value mapping is inverted or not finite
//!
//! ```rust
//! use lodstream_core::{LodError, RingBuffer};
//!
//! match RingBuffer::<u32>::new(0) {
//!     Err(LodError::InvalidConfig { parameter, .. }) => assert_eq!(parameter, "capacity"),
//!     _ => unreachable!(),
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for configuration and construction
pub type LodResult<T> = Result<T, LodError>;

/// Configuration errors - kept small and `Copy`
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum LodError {
    /// A size parameter must be positive
    #[error("Invalid {parameter}: {value} (must be greater than zero)")]
    InvalidConfig {
        /// Name of the offending parameter
        parameter: &'static str,
        /// The value that was rejected
        value: usize,
    },

    /// Sampling frequency must be a finite positive number
    #[error("Invalid frequency {frequency} Hz")]
    InvalidFrequency {
        /// The rejected frequency
        frequency: f64,
    },

    /// Unit mapping endpoints are inverted or not finite
    #[error("Invalid value mapping: {reason}")]
    InvalidMapping {
        /// Which endpoint check failed
        reason: &'static str,
    },
}

impl LodError {
    /// Shorthand for a rejected zero-sized parameter
    pub(crate) const fn zero(parameter: &'static str) -> Self {
        Self::InvalidConfig { parameter, value: 0 }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LodError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidConfig { parameter, value } =>
                defmt::write!(fmt, "Invalid {}: {}", parameter, value),
            Self::InvalidFrequency { frequency } =>
                defmt::write!(fmt, "Invalid frequency {} Hz", frequency),
            Self::InvalidMapping { reason } =>
                defmt::write!(fmt, "Invalid mapping: {}", reason),
        }
    }
}
