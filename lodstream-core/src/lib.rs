//! Level-of-detail storage for unbounded sample streams
//!
//! Stores telemetry, audio levels or sensor traces in an append-only pool and
//! keeps a min/max/avg pyramid on top of it, so a plot can ask for samples
//! `[a, b)` at `r` pixels and touch roughly `r` entries no matter how long the
//! stream has run.
//!
//! Key constraints:
//! - O(1) amortized append, O(1) signed random access
//! - Stored elements never move until `clear()`
//! - Query cost bounded by output resolution, not history length
//!
//! ```
//! use lodstream_core::MinMaxPyramid;
//!
//! let mut pyramid = MinMaxPyramid::<f32>::new();
//! for i in 0..10_000 {
//!     pyramid.append((i % 100) as f32);
//! }
//!
//! // 10k samples on an 800 pixel wide plot
//! let range = pyramid.resolve_range(0.0, 10_000.0, 800.0);
//! assert!(range.level_index() > 0);
//! for entry in range.entries() {
//!     let _ = (entry.minval, entry.maxval, entry.avg);
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod macros;

pub mod channel;
pub mod config;
pub mod constants;
pub mod entry;
pub mod errors;
pub mod pool;
pub mod pyramid;
pub mod render;
pub mod ring;
pub mod time;
pub mod traits;

// Public API
pub use channel::Channel;
pub use config::{ChannelConfig, PoolConfig, ValueMapping};
pub use entry::{AvgEntry, Entry};
pub use errors::{LodError, LodResult};
pub use pool::SegmentedPool;
pub use pyramid::{AggregationPyramid, AvgPyramid, LodRange, MinMaxPyramid};
pub use render::{Column, Vertex};
pub use ring::{Coord4, RingBuffer};
pub use traits::{Aggregate, Sample, Timestamped};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
