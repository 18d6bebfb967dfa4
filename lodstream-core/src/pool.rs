//! Append-Only Segmented Pool
//!
//! ## Overview
//!
//! `SegmentedPool<T>` is the storage under every pyramid level. It grows
//! without bound, appends in O(1), answers signed random access in O(1), and
//! never moves an element once written. A `Vec<T>` gives the first two but
//! reallocates (and copies every sample) as it doubles; at tens of millions
//! of samples those copies show up as visible hitches in a render loop.
//!
//! ## Layout
//!
//! Elements live in fixed-size *segments*; segments are tracked in *pages*.
//! With `segment_size = 4`, `page_size = 3` and 18 elements appended:
//!
//! ```text
//! page 0                              page 1
//!
//!   segment 0  segment 1  segment 2     segment 0  segment 1
//!
//!    item0      item4      item8         item12     item16
//!    item1      item5      item9         item13     item17
//!    item2      item6      item10        item14
//!    item3      item7      item11        item15
//! ```
//!
//! Index `i` maps to:
//!
//! ```text
//! offset  = i % segment_size
//! page    = i / segment_size / page_size
//! segment = (i / segment_size) % page_size
//! ```
//!
//! Pages and segments are allocated on the first write that needs them. A
//! segment is a `Vec<T>` created with exactly `segment_size` capacity and
//! never pushed past it, so its heap block never moves. Only `clear()` frees
//! memory.
//!
//! ## Indexing
//!
//! `get(i)` accepts `-len..len`. `0` is the oldest element, `-1` the newest.
//! Anything else is `None`.
//!
//! ## Change Counter
//!
//! Every `append`, `reserve` and `clear` bumps a `u64` counter that is never
//! reset. Render loops compare it against the value seen on the previous
//! frame to skip redundant work. Code that mutates through `get_mut` or a
//! `reserve` reference after the fact should call `inc_change_counter()`.
//!
//! ## Usage Example
//!
//! ```rust
//! use lodstream_core::{PoolConfig, SegmentedPool};
//!
//! let mut pool = SegmentedPool::with_config(PoolConfig::new(2, 2).unwrap()).unwrap();
//! for v in [3, 5, 7, 9, 11] {
//!     pool.append(v);
//! }
//!
//! assert_eq!(pool.get(0), Some(&3));
//! assert_eq!(pool.get(-1), Some(&11));
//! assert_eq!(pool.get(5), None);
//! assert_eq!(pool.page_count(), 2);
//! ```

use alloc::vec::Vec;

use crate::config::PoolConfig;
use crate::errors::LodResult;

/// One page: up to `page_size` segments, allocated in order
struct Page<T> {
    segments: Vec<Vec<T>>,
}

impl<T> Page<T> {
    fn new(page_size: usize) -> Self {
        Self {
            segments: Vec::with_capacity(page_size),
        }
    }
}

/// Growable append-only store with stable element addresses
///
/// ## Internal Invariants
///
/// - every page except the last holds exactly `page_size` segments
/// - every segment except the last holds exactly `segment_size` elements
/// - the sum of segment lengths equals `len`
/// - no segment's length ever exceeds its initial capacity
///
/// ## Thread Safety
///
/// No internal synchronization. Mutation needs `&mut self`, so the borrow
/// checker already keeps appends and reads apart on one thread; share across
/// threads behind a lock.
pub struct SegmentedPool<T> {
    config: PoolConfig,
    pages: Vec<Page<T>>,
    len: usize,
    change_counter: u64,
}

impl<T> SegmentedPool<T> {
    /// Empty pool with default granularity (20 000 × 2 000)
    pub fn new() -> Self {
        Self::from_valid_config(PoolConfig::default())
    }

    /// Empty pool with explicit granularity
    ///
    /// Zero sizes are rejected with `LodError::InvalidConfig`.
    pub fn with_config(config: PoolConfig) -> LodResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    pub(crate) fn from_valid_config(config: PoolConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            len: 0,
            change_counter: 0,
        }
    }

    /// Append a value, returning its index
    pub fn append(&mut self, value: T) -> usize {
        let index = self.len;
        self.push_slot(value);
        index
    }

    /// Claim the next slot and hand it back for in-place filling
    ///
    /// The slot holds `T::default()`; callers should overwrite every field
    /// rather than rely on that.
    pub fn reserve(&mut self) -> &mut T
    where
        T: Default,
    {
        self.push_slot(T::default())
    }

    /// Element at a signed index (`-1` is the newest)
    pub fn get(&self, i: isize) -> Option<&T> {
        let index = self.resolve(i)?;
        self.get_index(index)
    }

    /// Mutable element at a signed index
    ///
    /// Does not touch the change counter.
    pub fn get_mut(&mut self, i: isize) -> Option<&mut T> {
        let index = self.resolve(i)?;
        let (page, segment, offset) = self.locate(index);
        let found = self
            .pages
            .get_mut(page)
            .and_then(|p| p.segments.get_mut(segment))
            .and_then(|s| s.get_mut(offset));
        if found.is_none() {
            report_missing(index, page, segment);
        }
        found
    }

    /// Newest element
    pub fn last(&self) -> Option<&T> {
        self.get(-1)
    }

    /// Number of stored elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// True before the first append (or after `clear`)
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Release every page and segment
    pub fn clear(&mut self) {
        log_debug!(
            "Pool clear: releasing {} elements in {} segments",
            self.len,
            self.segment_count()
        );
        self.pages = Vec::new();
        self.len = 0;
        self.change_counter += 1;
    }

    /// Monotonic mutation counter
    pub fn change_counter(&self) -> u64 {
        self.change_counter
    }

    /// Record a mutation made through a borrowed reference
    pub fn inc_change_counter(&mut self) {
        self.change_counter += 1;
    }

    /// Granularity this pool was built with
    pub fn config(&self) -> PoolConfig {
        self.config
    }

    /// Number of allocated pages
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of allocated segments
    pub fn segment_count(&self) -> usize {
        self.pages.iter().map(|p| p.segments.len()).sum()
    }

    /// Elements that fit without allocating another segment
    pub fn capacity(&self) -> usize {
        self.segment_count() * self.config.segment_size
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.pages
            .iter()
            .flat_map(|page| page.segments.iter())
            .flat_map(|segment| segment.iter())
    }

    /// Iterate over the inclusive index range `[start, end]`
    ///
    /// Indices past the end are skipped; an inverted range yields nothing.
    pub fn range(&self, start: usize, end: usize) -> impl Iterator<Item = &T> + '_ {
        let end = end.min(self.len.saturating_sub(1));
        let count = if self.len == 0 || end < start { 0 } else { end - start + 1 };
        (start..start + count).filter_map(move |index| self.get_index(index))
    }

    /// Signed index -> position, or `None` outside `-len..len`
    fn resolve(&self, i: isize) -> Option<usize> {
        if i >= 0 {
            let index = i as usize;
            (index < self.len).then_some(index)
        } else {
            self.len.checked_sub(i.unsigned_abs())
        }
    }

    /// `(page, segment, offset)` for a position
    #[inline]
    fn locate(&self, index: usize) -> (usize, usize, usize) {
        let segment_number = index / self.config.segment_size;
        (
            segment_number / self.config.page_size,
            segment_number % self.config.page_size,
            index % self.config.segment_size,
        )
    }

    pub(crate) fn get_index(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        let (page, segment, offset) = self.locate(index);
        let found = self
            .pages
            .get(page)
            .and_then(|p| p.segments.get(segment))
            .and_then(|s| s.get(offset));
        if found.is_none() {
            report_missing(index, page, segment);
        }
        found
    }

    /// Write `value` into the next slot, allocating page/segment as needed
    fn push_slot(&mut self, value: T) -> &mut T {
        let (page_number, segment_number, offset) = self.locate(self.len);
        let PoolConfig { segment_size, page_size } = self.config;

        if page_number == self.pages.len() {
            log_debug!("Pool: allocating page {} ({} segment slots)", page_number, page_size);
            self.pages.push(Page::new(page_size));
        }
        debug_assert!(page_number < self.pages.len(), "pool skipped a page");

        let page = &mut self.pages[page_number];
        if segment_number == page.segments.len() {
            log_trace!(
                "Pool: allocating segment {} of page {} ({} elements)",
                segment_number,
                page_number,
                segment_size
            );
            page.segments.push(Vec::with_capacity(segment_size));
        }

        let segment = &mut page.segments[segment_number];
        debug_assert_eq!(segment.len(), offset, "pool segment out of step with len");
        debug_assert!(segment.len() < segment_size, "pool segment overfilled");
        segment.push(value);

        self.len += 1;
        self.change_counter += 1;
        &mut segment[offset]
    }
}

/// A position inside `0..len` without backing storage is a pool defect
#[cold]
fn report_missing(index: usize, page: usize, segment: usize) {
    log_error!(
        "Pool inconsistency: index {} maps to unallocated page {} segment {}",
        index,
        page,
        segment
    );
    debug_assert!(
        false,
        "pool index {} has no backing segment (page {}, segment {})",
        index,
        page,
        segment
    );
}

impl<T> Default for SegmentedPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for SegmentedPool<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SegmentedPool")
            .field("config", &self.config)
            .field("len", &self.len)
            .field("pages", &self.pages.len())
            .field("change_counter", &self.change_counter)
            .finish()
    }
}
