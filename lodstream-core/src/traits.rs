//! Core traits for stored values
//!
//! `Sample` is what a pyramid can aggregate, `Aggregate` is what a pyramid
//! level stores, and `Timestamped` is what a trail ring buffer can search
//! by time. Keep them small - every stored value goes through them.

use core::fmt::Debug;

/// A numeric sample value
///
/// Min/max use `PartialOrd` directly: if either side is NaN the first
/// argument wins, same as a plain `if a < b` comparison would.
pub trait Sample: Copy + PartialOrd + Debug {
    /// Average of two samples, used when building the next pyramid level
    ///
    /// Integer types widen before adding (no overflow) and round halves to
    /// the nearest even value, so repeated halving does not drift upward.
    fn halfway(a: Self, b: Self) -> Self;

    /// Lossy conversion for pixel geometry and unit mapping
    fn to_f64(self) -> f64;

    /// Rounding, saturating conversion back from a mapped value
    fn from_f64(value: f64) -> Self;

    /// Smaller of two samples
    #[inline]
    fn min_of(a: Self, b: Self) -> Self {
        if b < a { b } else { a }
    }

    /// Larger of two samples
    #[inline]
    fn max_of(a: Self, b: Self) -> Self {
        if b > a { b } else { a }
    }
}

macro_rules! impl_sample_int {
    ($($t:ty => $wide:ty),* $(,)?) => {$(
        impl Sample for $t {
            #[inline]
            fn halfway(a: Self, b: Self) -> Self {
                let sum = a as $wide + b as $wide;
                let half = sum.div_euclid(2);
                // odd sum: exactly between two integers, take the even one
                let rounded = if sum.rem_euclid(2) == 1 && half.rem_euclid(2) == 1 {
                    half + 1
                } else {
                    half
                };
                rounded as $t
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(value: f64) -> Self {
                // float -> int `as` saturates and maps NaN to 0
                libm::round(value) as $t
            }
        }
    )*};
}

impl_sample_int!(
    u8 => i64,
    i8 => i64,
    u16 => i64,
    i16 => i64,
    u32 => i64,
    i32 => i64,
    u64 => i128,
    i64 => i128,
);

impl Sample for f32 {
    #[inline]
    fn halfway(a: Self, b: Self) -> Self {
        a * 0.5 + b * 0.5
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Sample for f64 {
    #[inline]
    fn halfway(a: Self, b: Self) -> Self {
        a * 0.5 + b * 0.5
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline]
    fn from_f64(value: f64) -> Self {
        value
    }
}

/// A value stored in one pyramid level
pub trait Aggregate: Copy + Debug {
    /// Sample type being aggregated
    type Value: Sample;

    /// Build an entry from an explicit min/max/avg triple
    fn from_minmaxavg(minval: Self::Value, maxval: Self::Value, avg: Self::Value) -> Self;

    /// Build an entry for a single raw sample
    fn from_avg(avg: Self::Value) -> Self {
        Self::from_minmaxavg(avg, avg, avg)
    }

    /// Combine two neighbouring entries into one entry of the next level
    fn merge(older: &Self, newer: &Self) -> Self;

    /// Smallest sample covered by this entry
    fn minval(&self) -> Self::Value;

    /// Largest sample covered by this entry
    fn maxval(&self) -> Self::Value;

    /// Average of the samples covered by this entry
    fn avg(&self) -> Self::Value;
}

/// Values carrying their own time, searchable inside a ring buffer
pub trait Timestamped {
    /// Time of this value (any monotonic unit, typically seconds)
    fn timestamp(&self) -> f64;
}
