//! Segmented Pool Granularity
//!
//! A pool allocates storage one segment at a time and tracks segments in
//! pages. Segment size trades allocation granularity against wasted tail
//! space; page size trades page-walk depth against the size of each page's
//! slot table.

/// Elements per segment.
///
/// - 20 000 entries × 12 bytes (`Entry<f32>`) = ~234KB per block
/// - One allocation per ~5.5 minutes of a 60Hz stream
/// - Small enough to never stall an append noticeably
pub const DEFAULT_SEGMENT_SIZE: usize = 20_000;

/// Segment slots per page.
///
/// - 2 000 segments × 20 000 elements = 40M elements per page
/// - A single page covers a week of 60Hz data, so lookups
///   almost never walk past the first page
pub const DEFAULT_PAGE_SIZE: usize = 2_000;
