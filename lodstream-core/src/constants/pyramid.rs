//! Level-of-Detail Selection Thresholds
//!
//! `AggregationPyramid::resolve_range` descends one level (halving the
//! queried range) while the current level is too dense for the requested
//! resolution. These constants define "too dense".

/// Density at which a coarser level is preferred.
///
/// With fewer than two source samples per output pixel each pixel column is
/// still covered by at most ~2 entries, which keeps render cost bounded by
/// resolution.
pub const MAX_SAMPLES_PER_PIXEL: f64 = 2.0;

/// Minimum queried span (in samples of the current level) worth descending.
///
/// Ranges shorter than this are rendered from the current level even if the
/// density check would allow a coarser one; a handful of samples always
/// looks better at full resolution.
pub const MIN_DESCEND_SPAN: f64 = 5.0;

/// Resolutions at or below this value are treated as a degenerate query.
pub const MIN_RESOLUTION: f64 = 0.1;
