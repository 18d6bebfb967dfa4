//! Pyramid entry records
//!
//! Two flavours are stored in pyramid levels:
//!
//! ```text
//! Entry<T>     { minval, maxval, avg }   full envelope, 3 × size_of::<T>()
//! AvgEntry<T>  { avg }                   average only, minval = maxval = avg
//! ```
//!
//! Level L+1 entry k is `merge(level_L[2k], level_L[2k + 1])`:
//!
//! ```text
//!   level0      level1        level2
//!   avg min max avg min max   avg min max
//!   25  25  25  30  25  35    40  25  60
//!   35  35  35  50  40  60
//!   40  40  40
//!   60  60  60
//! ```

use crate::traits::{Aggregate, Sample};

/// Min/max/avg triple
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry<T> {
    /// Smallest covered sample
    pub minval: T,
    /// Largest covered sample
    pub maxval: T,
    /// Average of covered samples
    pub avg: T,
}

impl<T> Entry<T> {
    /// Create an entry from its three components
    pub const fn new(minval: T, maxval: T, avg: T) -> Self {
        Self { minval, maxval, avg }
    }
}

impl<T: Sample> Aggregate for Entry<T> {
    type Value = T;

    #[inline]
    fn from_minmaxavg(minval: T, maxval: T, avg: T) -> Self {
        Self { minval, maxval, avg }
    }

    #[inline]
    fn merge(older: &Self, newer: &Self) -> Self {
        Self {
            minval: T::min_of(older.minval, newer.minval),
            maxval: T::max_of(older.maxval, newer.maxval),
            avg: T::halfway(older.avg, newer.avg),
        }
    }

    #[inline]
    fn minval(&self) -> T {
        self.minval
    }

    #[inline]
    fn maxval(&self) -> T {
        self.maxval
    }

    #[inline]
    fn avg(&self) -> T {
        self.avg
    }
}

/// Average-only entry
///
/// A third of the memory of `Entry<T>`; suited for dense 8-bit channels
/// where the envelope is not drawn.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AvgEntry<T> {
    /// Average of covered samples
    pub avg: T,
}

impl<T: Sample> Aggregate for AvgEntry<T> {
    type Value = T;

    /// Min and max are discarded; only the average is kept
    #[inline]
    fn from_minmaxavg(_minval: T, _maxval: T, avg: T) -> Self {
        Self { avg }
    }

    #[inline]
    fn merge(older: &Self, newer: &Self) -> Self {
        Self {
            avg: T::halfway(older.avg, newer.avg),
        }
    }

    #[inline]
    fn minval(&self) -> T {
        self.avg
    }

    #[inline]
    fn maxval(&self) -> T {
        self.avg
    }

    #[inline]
    fn avg(&self) -> T {
        self.avg
    }
}
