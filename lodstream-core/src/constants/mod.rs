//! Constants for lodstream Core
//!
//! Default sizes and thresholds used across the crate. Runtime structures take
//! their configuration from `crate::config`, which falls back to these values.
//!
//! ## Organization
//!
//! - **Pool**: segment and page granularity of `SegmentedPool`
//! - **Pyramid**: level-of-detail selection thresholds
//! - **Ring**: default trail capacities
//! - **Channel**: sampling and timeline defaults

/// Segment and page sizes for the segmented pool.
pub mod pool;

/// Thresholds that drive pyramid level selection.
pub mod pyramid;

/// Default ring buffer capacities.
pub mod ring;

/// Channel sampling and timeline defaults.
pub mod channel;

// Re-export commonly used constants for convenience
pub use pool::{DEFAULT_PAGE_SIZE, DEFAULT_SEGMENT_SIZE};

pub use pyramid::{MAX_SAMPLES_PER_PIXEL, MIN_DESCEND_SPAN, MIN_RESOLUTION};

pub use ring::DEFAULT_TRAIL_CAPACITY;

pub use channel::{DEFAULT_SECONDS_PER_STAMP, MAX_LABEL_LENGTH};
