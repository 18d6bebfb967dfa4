//! Fixed-Capacity Circular Buffer for Trailing Windows
//!
//! ## Overview
//!
//! The pyramid keeps every sample forever. Some views only ever need the
//! recent past: a positional trail drawn behind a moving marker, the last few
//! seconds of a cursor, a short smoothing window. `RingBuffer<T>` keeps the
//! newest `capacity` values and overwrites the oldest once full.
//!
//! Unlike a const-generic array buffer, capacity is chosen at runtime and can
//! be reset with `set_capacity` (which discards the contents).
//!
//! ### Memory Layout
//!
//! One contiguous `Vec<T>` that grows up to `capacity` and is then
//! overwritten in place:
//!
//! ```text
//! RingBuffer capacity 5, after 7 appends (values 1..=7):
//! ┌─────┬─────┬─────┬─────┬─────┐
//! │  6  │  7  │  3  │  4  │  5  │  ← slots
//! └─────┴─────┴─────┴─────┴─────┘
//!                ↑
//!                └── head = 2 (one past the newest)
//!
//! logical view:  get(0) = 3 ... get(4) = 7
//!                get(-5) = 3 ... get(-1) = 7
//! ```
//!
//! ### Index Resolution
//!
//! ```text
//! i >= 0:  slot = (head - size + i) mod capacity,  valid for i < size
//! i <  0:  slot = (head + i)        mod capacity,  valid for -i <= size
//! ```
//!
//! `clear()` only resets `head` and `size`; slots are left as they were and
//! get overwritten by later appends.
//!
//! ## Usage Example
//!
//! ```rust
//! use lodstream_core::RingBuffer;
//!
//! let mut trail = RingBuffer::new(3).unwrap();
//! for v in 1..=5 {
//!     trail.append(v);
//! }
//!
//! // Buffer now holds [3, 4, 5]
//! assert_eq!(trail.get(0), Some(&3));
//! assert_eq!(trail.get(-1), Some(&5));
//! assert_eq!(trail.get(3), None);
//! ```

use alloc::vec::Vec;

use crate::constants::DEFAULT_TRAIL_CAPACITY;
use crate::errors::{LodError, LodResult};
use crate::traits::Timestamped;

/// Circular history with signed indexing
///
/// ## Internal Invariants
///
/// - `head < capacity`
/// - `size <= capacity`
/// - `slots.len() <= capacity`, and every logical element lives in `slots`
///
/// ## Thread Safety
///
/// Not thread-safe. Wrap it in a mutex to share it.
#[derive(Clone)]
pub struct RingBuffer<T> {
    slots: Vec<T>,
    capacity: usize,
    /// Slot after the newest element
    head: usize,
    size: usize,
    change_counter: u64,
}

impl<T> RingBuffer<T> {
    /// Buffer holding up to `capacity` values
    ///
    /// A zero capacity is rejected.
    pub fn new(capacity: usize) -> LodResult<Self> {
        if capacity == 0 {
            return Err(LodError::zero("capacity"));
        }
        Ok(Self::with_valid_capacity(capacity))
    }

    fn with_valid_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            head: 0,
            size: 0,
            change_counter: 0,
        }
    }

    /// Replace storage with a fresh block of `capacity` slots
    ///
    /// Existing contents are dropped, not migrated.
    pub fn set_capacity(&mut self, capacity: usize) -> LodResult<()> {
        if capacity == 0 {
            return Err(LodError::zero("capacity"));
        }
        log_debug!(
            "Ring buffer: capacity {} -> {}, dropping {} values",
            self.capacity,
            capacity,
            self.size
        );
        self.slots = Vec::with_capacity(capacity);
        self.capacity = capacity;
        self.clear();
        Ok(())
    }

    /// Forget all values (storage is kept for reuse)
    pub fn clear(&mut self) {
        self.head = 0;
        self.size = 0;
        self.change_counter += 1;
    }

    /// Add a value, overwriting the oldest one when full
    pub fn append(&mut self, value: T) {
        let _ = self.write_slot(value);
    }

    /// Claim the next slot for in-place filling
    ///
    /// A slot that has been used before still holds its old value; callers
    /// must overwrite it completely.
    pub fn reserve(&mut self) -> &mut T
    where
        T: Default,
    {
        if self.head < self.slots.len() {
            let slot = self.head;
            self.advance();
            &mut self.slots[slot]
        } else {
            self.write_slot(T::default())
        }
    }

    /// Value at a signed index: `0` oldest, `-1` newest
    pub fn get(&self, i: isize) -> Option<&T> {
        self.slot_index(i).and_then(|slot| self.slots.get(slot))
    }

    /// Most recent value
    pub fn last(&self) -> Option<&T> {
        self.get(-1)
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.size
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// True once appends start overwriting
    pub fn is_full(&self) -> bool {
        self.size == self.capacity
    }

    /// Maximum number of stored values
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Monotonic mutation counter
    pub fn change_counter(&self) -> u64 {
        self.change_counter
    }

    /// Record a mutation made through a `reserve` reference
    pub fn inc_change_counter(&mut self) {
        self.change_counter += 1;
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> RingBufferIter<'_, T> {
        RingBufferIter {
            buffer: self,
            index: 0,
        }
    }

    fn write_slot(&mut self, value: T) -> &mut T {
        let slot = self.head;
        if slot < self.slots.len() {
            self.slots[slot] = value;
        } else {
            // first lap: slots grow in step with head
            debug_assert_eq!(slot, self.slots.len());
            self.slots.push(value);
        }
        self.advance();
        &mut self.slots[slot]
    }

    fn advance(&mut self) {
        self.head += 1;
        if self.head >= self.capacity {
            self.head = 0;
        }
        if self.size < self.capacity {
            self.size += 1;
        }
        self.change_counter += 1;
    }

    /// Logical signed index -> slot, `None` when out of range
    ///
    /// ```text
    /// capacity  head  size   i   slot
    ///    10      4     4     0    0
    ///    10      4     4     3    3
    ///    10      4     4     4    -
    ///    10      2    10     0    2
    ///    10      2    10    -1    1
    /// ```
    fn slot_index(&self, i: isize) -> Option<usize> {
        let size = self.size as isize;
        let head = self.head as isize;
        let raw = if i >= 0 {
            if i >= size {
                return None;
            }
            head - size + i
        } else {
            if -i > size {
                return None;
            }
            head + i
        };
        Some(raw.rem_euclid(self.capacity as isize) as usize)
    }
}

impl<T: Timestamped> RingBuffer<T> {
    /// Index of the newest value stamped at or before `time`
    ///
    /// Scans from the newest end, so recent lookups are cheap even on a
    /// long trail. `None` if every value is newer than `time`.
    pub fn time_index(&self, time: f64) -> Option<usize> {
        (0..self.size)
            .rev()
            .find(|&i| self.stamp(i).is_some_and(|t| t <= time))
    }

    /// Inclusive logical index range of values with `start <= t <= end`
    ///
    /// Assumes timestamps are non-decreasing from oldest to newest.
    pub fn slice_indices(&self, start_time: f64, end_time: f64) -> Option<(usize, usize)> {
        let end = self.time_index(end_time)?;
        let mut start = end + 1;
        while start > 0 && self.stamp(start - 1).is_some_and(|t| t >= start_time) {
            start -= 1;
        }
        (start <= end).then_some((start, end))
    }

    fn stamp(&self, index: usize) -> Option<f64> {
        self.get(index as isize).map(Timestamped::timestamp)
    }
}

/// Iterator over ring buffer contents, oldest first
pub struct RingBufferIter<'a, T> {
    buffer: &'a RingBuffer<T>,
    index: usize,
}

impl<'a, T> Iterator for RingBufferIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.buffer.len() {
            return None;
        }
        let item = self.buffer.get(self.index as isize)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<T> Default for RingBuffer<T> {
    /// Trail-sized buffer (`DEFAULT_TRAIL_CAPACITY`)
    fn default() -> Self {
        Self::with_valid_capacity(DEFAULT_TRAIL_CAPACITY)
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// A timestamped 3D trail point
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord4 {
    /// X position
    pub x: f64,
    /// Y position
    pub y: f64,
    /// Z position
    pub z: f64,
    /// Time of the sample
    pub t: f64,
}

impl Timestamped for Coord4 {
    fn timestamp(&self) -> f64 {
        self.t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(t: f64) -> Coord4 {
        Coord4 { x: t * 2.0, y: 0.0, z: 0.0, t }
    }

    #[test]
    fn default_is_trail_sized() {
        let trail = RingBuffer::<Coord4>::default();
        assert_eq!(trail.capacity(), DEFAULT_TRAIL_CAPACITY);
        assert!(trail.is_empty());
    }

    #[test]
    fn empty_buffer() {
        let buffer: RingBuffer<u32> = RingBuffer::new(5).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.len(), 0);
        assert!(buffer.last().is_none());
        assert!(buffer.get(0).is_none());
        assert!(buffer.get(1).is_none());
        assert!(buffer.get(-1).is_none());
    }

    #[test]
    fn zero_capacity_rejected() {
        assert_eq!(RingBuffer::<u8>::new(0).err(), Some(LodError::zero("capacity")));
        let mut buffer = RingBuffer::<u8>::new(2).unwrap();
        assert!(buffer.set_capacity(0).is_err());
        assert_eq!(buffer.capacity(), 2);
    }

    #[test]
    fn wraparound_keeps_newest() {
        let mut b = RingBuffer::new(7).unwrap();
        b.append(11);
        b.append(12);
        assert_eq!(b.len(), 2);
        for v in 13..=17 {
            b.append(v);
        }
        assert_eq!(b.len(), 7);
        b.append(18);
        b.append(19);
        assert_eq!(b.len(), 7);
        assert!(b.is_full());

        assert_eq!(b.get(0), Some(&13));
        assert_eq!(b.get(-1), Some(&19));
        assert_eq!(b.get(-7), Some(&13));
        assert_eq!(b.get(-8), None);
        assert_eq!(b.get(7), None);
    }

    #[test]
    fn partially_filled_indexing() {
        let mut b = RingBuffer::new(10).unwrap();
        for v in 0..4 {
            b.append(v);
        }
        assert_eq!(b.get(0), Some(&0));
        assert_eq!(b.get(3), Some(&3));
        assert_eq!(b.get(4), None);
        assert_eq!(b.get(-4), Some(&0));
        assert_eq!(b.get(-5), None);
    }

    #[test]
    fn iterator_order() {
        let mut buffer = RingBuffer::new(3).unwrap();
        for i in 0..5 {
            buffer.append(i);
        }
        let values: Vec<i32> = buffer.iter().copied().collect();
        assert_eq!(values, vec![2, 3, 4]);
        assert_eq!(buffer.iter().size_hint(), (3, Some(3)));
    }

    #[test]
    fn clear_keeps_capacity_and_reuses_slots() {
        let mut buffer = RingBuffer::new(4).unwrap();
        for i in 0..6 {
            buffer.append(i);
        }
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 4);
        assert!(buffer.get(0).is_none());

        buffer.append(100);
        assert_eq!(buffer.get(0), Some(&100));
        assert_eq!(buffer.get(-1), Some(&100));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn set_capacity_discards_contents() {
        let mut buffer = RingBuffer::new(4).unwrap();
        for i in 0..4 {
            buffer.append(i);
        }
        buffer.set_capacity(2).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 2);
        for i in 10..13 {
            buffer.append(i);
        }
        let values: Vec<i32> = buffer.iter().copied().collect();
        assert_eq!(values, vec![11, 12]);
    }

    #[test]
    fn reserve_fills_in_place() {
        let mut buffer: RingBuffer<Coord4> = RingBuffer::new(2).unwrap();
        *buffer.reserve() = point(1.0);
        buffer.reserve().t = 2.0;
        assert_eq!(buffer.get(-1).map(|c| c.t), Some(2.0));

        // wrapped slot still holds the old point until overwritten
        let slot = buffer.reserve();
        assert_eq!(slot.t, 1.0);
        slot.t = 3.0;
        let times: Vec<f64> = buffer.iter().map(|c| c.t).collect();
        assert_eq!(times, vec![2.0, 3.0]);
    }

    #[test]
    fn change_counter_is_monotonic() {
        let mut buffer = RingBuffer::new(2).unwrap();
        assert_eq!(buffer.change_counter(), 0);
        buffer.append(1u8);
        buffer.append(2);
        buffer.append(3);
        assert_eq!(buffer.change_counter(), 3);
        let _ = buffer.get(0);
        let _ = buffer.iter().count();
        assert_eq!(buffer.change_counter(), 3);
        buffer.clear();
        assert_eq!(buffer.change_counter(), 4);
        buffer.set_capacity(3).unwrap();
        assert_eq!(buffer.change_counter(), 5);
        buffer.inc_change_counter();
        assert_eq!(buffer.change_counter(), 6);
    }

    #[test]
    fn trail_time_lookups() {
        let mut trail = RingBuffer::new(8).unwrap();
        for t in 0..12 {
            trail.append(point(t as f64));
        }
        // holds t = 4..=11
        assert_eq!(trail.time_index(20.0), Some(7));
        assert_eq!(trail.time_index(6.5), Some(2));
        assert_eq!(trail.time_index(3.9), None);

        assert_eq!(trail.slice_indices(6.0, 9.0), Some((2, 5)));
        assert_eq!(trail.slice_indices(0.0, 100.0), Some((0, 7)));
        assert_eq!(trail.slice_indices(9.5, 9.7), None);
        assert_eq!(trail.slice_indices(100.0, 200.0), None);
        assert_eq!(trail.slice_indices(1.0, 2.0), None);
    }
}
