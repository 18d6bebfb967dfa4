//! Min/Max/Avg Aggregation Pyramid
//!
//! ## Overview
//!
//! A pyramid stores a sample stream at full resolution (level 0) plus a
//! chain of coarser copies. Each entry of level L+1 summarises two entries of
//! level L. With 8 values appended:
//!
//! ```text
//!        append()
//!           |
//!         level0        level1        level2        level3
//!      avg min max   avg min max   avg min max   avg min max
//!  0    25  25  25    30  25  35    40  25  60    28   5  60
//!  1    35  35  35    50  40  60    16   5  30
//!  2    40  40  40    20  10  30
//!  3    60  60  60    12   5  19
//!  4    10  10  10
//!  5    30  30  30
//!  6    19  19  19
//!  7     5   5   5
//! ```
//!
//! Min and max are not averaged: the next level keeps the smaller min and the
//! larger max, so spikes survive any amount of zooming out.
//!
//! ## Append Path
//!
//! An append writes level 0. Whenever a level's length becomes even, its two
//! newest entries are merged and appended one level up, which may cascade.
//! Each level is half as busy as the one below it, so the amortized cost is
//! O(1) per sample and O(log n) for the rare append that completes a power of
//! two. Levels are created on first need.
//!
//! ## Level-of-Detail Query
//!
//! `resolve_range(start, end, resolution)` treats sample k as covering
//! `[k, k + 1)` and picks the coarsest level at which the requested range has
//! fewer than two entries per pixel. Rendering `[0, 8)` on a 4 pixel wide
//! window uses level 1 in the table above; on a 5 pixel window it uses
//! level 0. Render cost therefore scales with the output width, not with the
//! length of the stream.

use alloc::vec::Vec;

use crate::config::PoolConfig;
use crate::constants::{MAX_SAMPLES_PER_PIXEL, MIN_DESCEND_SPAN, MIN_RESOLUTION};
use crate::entry::{AvgEntry, Entry};
use crate::errors::LodResult;
use crate::pool::SegmentedPool;
use crate::traits::Aggregate;

/// Pyramid storing full min/max/avg entries
pub type MinMaxPyramid<T> = AggregationPyramid<Entry<T>>;

/// Pyramid storing averages only
pub type AvgPyramid<T> = AggregationPyramid<AvgEntry<T>>;

/// Multiresolution store over one sample channel
///
/// ## Internal Invariants
///
/// - `levels` is never empty; `levels[0]` holds the raw samples
/// - `levels[L + 1].len() == levels[L].len() / 2` after every append
/// - level L+1 exists iff level L has ever held two entries since the last
///   `clear()`
pub struct AggregationPyramid<E> {
    levels: Vec<SegmentedPool<E>>,
    config: PoolConfig,
}

impl<E: Aggregate> AggregationPyramid<E> {
    /// Empty pyramid with default pool granularity
    pub fn new() -> Self {
        Self::from_valid_config(PoolConfig::default())
    }

    /// Empty pyramid whose levels use `config`
    pub fn with_config(config: PoolConfig) -> LodResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: PoolConfig) -> Self {
        let mut levels = Vec::new();
        levels.push(SegmentedPool::from_valid_config(config));
        Self { levels, config }
    }

    /// Append one raw sample (`min = max = avg`)
    pub fn append(&mut self, avg: E::Value) {
        self.append_entry(E::from_avg(avg));
    }

    /// Append a sample that already carries an envelope
    pub fn append_minmaxavg(&mut self, minval: E::Value, maxval: E::Value, avg: E::Value) {
        self.append_entry(E::from_minmaxavg(minval, maxval, avg));
    }

    /// Append a prebuilt entry to level 0 and cascade upward
    pub fn append_entry(&mut self, entry: E) {
        let mut carry = entry;
        let mut level = 0;
        loop {
            if level == self.levels.len() {
                log_debug!("Pyramid: creating level {}", level);
                self.levels.push(SegmentedPool::from_valid_config(self.config));
            }
            let pool = &mut self.levels[level];
            pool.append(carry);
            if pool.len() % 2 != 0 {
                break;
            }
            carry = match (pool.get(-2), pool.get(-1)) {
                (Some(older), Some(newer)) => E::merge(older, newer),
                _ => break,
            };
            level += 1;
        }
    }

    /// Pick the level and index window to draw `[start_index, end_index)` at
    /// `resolution` pixels
    ///
    /// `start_index`/`end_index` are continuous sample coordinates; the
    /// returned indices are ordinary inclusive entry indices of the chosen
    /// level. An inverted or empty range, or a resolution at or below
    /// `MIN_RESOLUTION`, gives an empty range on level 0.
    ///
    /// "resolution" counts gaps, not columns: with resolution 1 the pixel
    /// offsets may come out as 0 and 1, i.e. one pixel of width between them.
    pub fn resolve_range(&self, start_index: f64, end_index: f64, resolution: f64) -> LodRange<'_, E> {
        let well_formed = start_index.is_finite()
            && end_index.is_finite()
            && resolution.is_finite()
            && end_index > start_index
            && resolution > MIN_RESOLUTION;
        if !well_formed {
            log_trace!(
                "Pyramid: degenerate query [{}, {}) at resolution {}",
                start_index,
                end_index,
                resolution
            );
            return LodRange::empty(&self.levels[0]);
        }

        let mut level = 0;
        let mut start = start_index;
        let mut end = end_index;
        while (end - start) / resolution >= MAX_SAMPLES_PER_PIXEL
            && level + 1 < self.levels.len()
            && end - start >= MIN_DESCEND_SPAN
        {
            start /= 2.0;
            end /= 2.0;
            level += 1;
        }

        let pool = &self.levels[level];
        let pixels_per_sample = resolution / (end - start);

        let last = pool.len() as isize - 1;
        let i_start = (libm::round(start) as isize).max(0);
        // `as` saturates, so far out-of-range queries clamp instead of wrapping
        let i_end = (libm::round(end) as isize).saturating_sub(1).min(last);

        LodRange {
            level: pool,
            level_index: level,
            start_index: i_start,
            end_index: i_end,
            start_pixel: (i_start as f64 + 0.5 - start) * pixels_per_sample,
            end_pixel: resolution - (end - i_end as f64 - 0.5) * pixels_per_sample,
            empty: false,
        }
    }

    /// Raw sample at a signed index (`-1` is the newest)
    pub fn get(&self, i: isize) -> Option<&E> {
        self.levels[0].get(i)
    }

    /// Number of raw samples
    pub fn len(&self) -> usize {
        self.levels[0].len()
    }

    /// True when no sample has been appended since the last clear
    pub fn is_empty(&self) -> bool {
        self.levels[0].is_empty()
    }

    /// Pool of one level, `None` if it has not been created yet
    pub fn level(&self, level: usize) -> Option<&SegmentedPool<E>> {
        self.levels.get(level)
    }

    /// Number of existing levels (at least 1)
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Entries stored across all levels (just under twice `len()`)
    pub fn total_len(&self) -> usize {
        self.levels.iter().map(SegmentedPool::len).sum()
    }

    /// Change counter of the raw level
    pub fn change_counter(&self) -> u64 {
        self.levels[0].change_counter()
    }

    /// Mark the pyramid as changed without appending
    pub fn inc_change_counter(&mut self) {
        self.levels[0].inc_change_counter();
    }

    /// Pool granularity of every level
    pub fn config(&self) -> PoolConfig {
        self.config
    }

    /// Drop all samples and every aggregated level
    ///
    /// The raw level is cleared in place so its change counter keeps
    /// increasing; higher levels are released and rebuilt by later appends.
    pub fn clear(&mut self) {
        log_debug!(
            "Pyramid clear: {} samples, {} levels",
            self.len(),
            self.levels.len()
        );
        self.levels.truncate(1);
        self.levels[0].clear();
    }
}

impl<E: Aggregate> Default for AggregationPyramid<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> core::fmt::Debug for AggregationPyramid<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AggregationPyramid")
            .field("config", &self.config)
            .field("levels", &self.levels.len())
            .finish()
    }
}

/// Result of a level-of-detail query
///
/// Borrows the chosen level read-only. `start_pixel` pairs with
/// `start_index` and `end_pixel` with `end_index`: they are the x positions
/// (in output pixels) of the centres of the first and last resolved entries,
/// so consecutive entries sit `(end_pixel - start_pixel) / span()` apart.
#[derive(Clone, Copy)]
pub struct LodRange<'a, E> {
    level: &'a SegmentedPool<E>,
    level_index: usize,
    start_index: isize,
    end_index: isize,
    start_pixel: f64,
    end_pixel: f64,
    empty: bool,
}

impl<'a, E> LodRange<'a, E> {
    fn empty(level: &'a SegmentedPool<E>) -> Self {
        Self {
            level,
            level_index: 0,
            start_index: 0,
            end_index: 0,
            start_pixel: 0.0,
            end_pixel: 0.0,
            empty: true,
        }
    }

    /// Pool of the chosen level
    pub fn level(&self) -> &'a SegmentedPool<E> {
        self.level
    }

    /// Depth of the chosen level (0 = raw samples)
    pub fn level_index(&self) -> usize {
        self.level_index
    }

    /// First resolved entry index (inclusive)
    pub fn start_index(&self) -> isize {
        self.start_index
    }

    /// Last resolved entry index (inclusive)
    pub fn end_index(&self) -> isize {
        self.end_index
    }

    /// Pixel x of the first resolved entry
    pub fn start_pixel(&self) -> f64 {
        self.start_pixel
    }

    /// Pixel x of the last resolved entry
    pub fn end_pixel(&self) -> f64 {
        self.end_pixel
    }

    /// `end_index - start_index`; zero or negative means nothing to draw
    pub fn span(&self) -> isize {
        self.end_index - self.start_index
    }

    /// At least two entries, enough for a line segment
    pub fn is_renderable(&self) -> bool {
        !self.empty && self.span() > 0
    }

    /// True for a degenerate query
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Number of entries `entries()` yields
    pub fn entry_count(&self) -> usize {
        if self.empty || self.end_index < self.start_index {
            0
        } else {
            (self.end_index - self.start_index + 1) as usize
        }
    }

    /// Entry `k` positions after `start_index`
    pub fn get(&self, k: usize) -> Option<&'a E> {
        if k >= self.entry_count() {
            return None;
        }
        self.level.get_index(self.start_index as usize + k)
    }

    /// Resolved entries from `start_index` to `end_index`
    pub fn entries(&self) -> impl Iterator<Item = &'a E> + 'a {
        let level = self.level;
        let start = self.start_index.max(0) as usize;
        (start..start + self.entry_count()).filter_map(move |index| level.get_index(index))
    }
}

impl<E> core::fmt::Debug for LodRange<'_, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LodRange")
            .field("level_index", &self.level_index)
            .field("start_index", &self.start_index)
            .field("end_index", &self.end_index)
            .field("start_pixel", &self.start_pixel)
            .field("end_pixel", &self.end_pixel)
            .field("empty", &self.empty)
            .finish()
    }
}
