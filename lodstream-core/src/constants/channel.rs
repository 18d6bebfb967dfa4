//! Channel Defaults

/// Seconds of samples between two timeline stamps.
///
/// A channel records one wall-clock timestamp per this many seconds of
/// samples and interpolates in between.
pub const DEFAULT_SECONDS_PER_STAMP: u32 = 1;

/// Maximum channel name / unit length in bytes.
///
/// Names live in inline `heapless::String`s, so this bounds the channel
/// struct size rather than any allocation.
pub const MAX_LABEL_LENGTH: usize = 32;
