//! Named sample channel
//!
//! A `Channel` is what a plotting front-end holds per trace: one pyramid of
//! raw samples plus the context needed to label and place them.
//!
//! - **Sampling rate**: converts sample numbers to relative seconds
//! - **Timeline**: one wall-clock stamp per `frequency × seconds_per_stamp`
//!   samples, interpolated in between, so irregular delivery (a stalled
//!   serial link, a paused recorder) still lands on the right wall time
//! - **Value mapping**: raw stored values (e.g. ADC counts) to display units
//!
//! ```
//! use lodstream_core::{Channel, ChannelConfig, ValueMapping};
//! use lodstream_core::time::FixedTime;
//!
//! let config = ChannelConfig::new(100.0)
//!     .with_name("supply")
//!     .with_mapping(ValueMapping::new(0.0, 0.0, 4.0, 256.0).unwrap());
//! let mut channel = Channel::<u8>::with_clock(config, Box::new(FixedTime::new(0))).unwrap();
//!
//! for i in 0..1000u32 {
//!     channel.append((i % 256) as u8);
//! }
//! assert_eq!(channel.len(), 1000);
//! assert_eq!(channel.sample_to_time(250.0), 2.5);
//! assert_eq!(channel.raw_to_value(128.0), 2.0);
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::config::{ChannelConfig, ValueMapping};
use crate::entry::Entry;
use crate::errors::LodResult;
use crate::pyramid::{LodRange, MinMaxPyramid};
use crate::render::{self, Column, Vertex};
use crate::time::{TimeSource, Timestamp};
use crate::traits::Sample;

/// Pyramid plus sampling rate, timeline and unit mapping
pub struct Channel<T> {
    config: ChannelConfig,
    data: MinMaxPyramid<T>,
    /// Wall-clock stamp of sample `k * samples_per_stamp`
    timeline: Vec<Timestamp>,
    samples_per_stamp: usize,
    clock: Box<dyn TimeSource + Send>,
}

impl<T: Sample> Channel<T> {
    /// Channel stamped from the system clock
    #[cfg(feature = "std")]
    pub fn new(config: ChannelConfig) -> LodResult<Self> {
        Self::with_clock(config, Box::new(crate::time::SystemTime))
    }

    /// Channel stamped from `clock`
    pub fn with_clock(config: ChannelConfig, clock: Box<dyn TimeSource + Send>) -> LodResult<Self> {
        config.validate()?;
        let data = MinMaxPyramid::with_config(config.pool)?;
        let samples_per_stamp = config.samples_per_stamp();
        log_debug!(
            "Channel '{}': {} Hz, stamp every {} samples",
            config.name,
            config.frequency_hz,
            samples_per_stamp
        );
        Ok(Self {
            config,
            data,
            timeline: Vec::new(),
            samples_per_stamp,
            clock,
        })
    }

    /// Append a raw sample, stamping the timeline from the clock if due
    pub fn append(&mut self, avg: T) {
        self.stamp(None);
        self.data.append(avg);
    }

    /// Append a raw sample with a known acquisition time
    ///
    /// The timestamp is only recorded when this sample starts a new stamp
    /// interval.
    pub fn append_at(&mut self, avg: T, timestamp: Timestamp) {
        self.stamp(Some(timestamp));
        self.data.append(avg);
    }

    /// Append a pre-aggregated sample
    pub fn append_minmaxavg(&mut self, minval: T, maxval: T, avg: T) {
        self.stamp(None);
        self.data.append_minmaxavg(minval, maxval, avg);
    }

    fn stamp(&mut self, timestamp: Option<Timestamp>) {
        if self.data.len() % self.samples_per_stamp == 0 {
            let now = timestamp.unwrap_or_else(|| self.clock.now());
            self.timeline.push(now);
        }
    }

    /// Raw entry at a signed index
    pub fn get(&self, i: isize) -> Option<&Entry<T>> {
        self.data.get(i)
    }

    /// Number of samples appended
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True before the first append
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Change counter of the underlying pyramid
    pub fn change_counter(&self) -> u64 {
        self.data.change_counter()
    }

    /// Mark the channel changed without appending
    pub fn inc_change_counter(&mut self) {
        self.data.inc_change_counter();
    }

    /// Drop all samples and stamps
    pub fn clear(&mut self) {
        self.data.clear();
        self.timeline.clear();
    }

    /// Legend name
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Display unit
    pub fn unit(&self) -> &str {
        &self.config.unit
    }

    /// Samples per second
    pub fn frequency(&self) -> f64 {
        self.config.frequency_hz
    }

    /// Current raw -> unit mapping
    pub fn mapping(&self) -> ValueMapping {
        self.config.mapping
    }

    /// Replace the raw -> unit mapping
    ///
    /// An inverted unit range is rejected and the old mapping kept.
    pub fn set_mapping(
        &mut self,
        value_min: f64,
        value_min_raw: f64,
        value_max: f64,
        value_max_raw: f64,
    ) -> LodResult<()> {
        self.config.mapping = ValueMapping::new(value_min, value_min_raw, value_max, value_max_raw)?;
        Ok(())
    }

    /// Display value -> raw stored value
    pub fn value_to_raw(&self, value: f64) -> f64 {
        self.config.mapping.value_to_raw(value)
    }

    /// Raw stored value -> display value
    pub fn raw_to_value(&self, raw: f64) -> f64 {
        self.config.mapping.raw_to_value(raw)
    }

    /// Seconds since the first sample
    pub fn sample_to_time(&self, sample: f64) -> f64 {
        sample / self.config.frequency_hz
    }

    /// Sample number at `seconds` after the first sample
    pub fn time_to_sample(&self, seconds: f64) -> f64 {
        seconds * self.config.frequency_hz
    }

    /// Wall-clock time (ms) of a possibly fractional sample number
    ///
    /// Interpolates between the two surrounding stamps; past the newest
    /// stamp it extrapolates at the nominal rate. Returns 0 without stamps
    /// or for negative sample numbers.
    pub fn sample_to_wallclock(&self, sample: f64) -> f64 {
        let Some(&newest) = self.timeline.last() else {
            return 0.0;
        };
        let per_stamp = self.samples_per_stamp as f64;
        let slot = libm::floor(sample / per_stamp);
        if !(slot >= 0.0) {
            return 0.0;
        }

        let last = self.timeline.len() - 1;
        if slot >= last as f64 {
            let since = sample - last as f64 * per_stamp;
            return newest as f64 + since / self.config.frequency_hz * 1000.0;
        }

        let slot = slot as usize;
        let from = self.timeline[slot] as f64;
        let to = self.timeline[slot + 1] as f64;
        from + (to - from) / per_stamp * (sample - per_stamp * slot as f64)
    }

    /// Recorded stamps, oldest first
    pub fn timeline(&self) -> &[Timestamp] {
        &self.timeline
    }

    /// Underlying pyramid
    pub fn pyramid(&self) -> &MinMaxPyramid<T> {
        &self.data
    }

    /// Level-of-detail query over the raw samples
    pub fn lod(&self, start_index: f64, end_index: f64, resolution: f64) -> LodRange<'_, Entry<T>> {
        self.data.resolve_range(start_index, end_index, resolution)
    }

    /// Average polyline in display units
    pub fn polyline(&self, start_index: f64, end_index: f64, resolution: f64) -> impl Iterator<Item = Vertex> + '_ {
        let mapping = self.config.mapping;
        let range = self.lod(start_index, end_index, resolution);
        render::polyline_mapped(&range, move |v: T| mapping.raw_to_value(v.to_f64()))
    }

    /// Min/max columns in display units
    pub fn columns(&self, start_index: f64, end_index: f64, resolution: f64) -> impl Iterator<Item = Column> + '_ {
        let mapping = self.config.mapping;
        let range = self.lod(start_index, end_index, resolution);
        render::columns_mapped(&range, move |v: T| mapping.raw_to_value(v.to_f64()))
    }
}

impl<T> core::fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Channel")
            .field("config", &self.config)
            .field("stamps", &self.timeline.len())
            .finish()
    }
}
