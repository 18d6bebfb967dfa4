//! Runtime configuration
//!
//! Every structure that can be misconfigured takes one of these and checks
//! it once, at construction. Defaults come from `crate::constants`.
//!
//! ```
//! use lodstream_core::{ChannelConfig, PoolConfig, ValueMapping};
//!
//! // 8-bit ADC measuring 0..5V at 1kHz
//! let config = ChannelConfig::new(1000.0)
//!     .with_name("battery")
//!     .with_unit("V")
//!     .with_mapping(ValueMapping::new(0.0, 0.0, 5.0, 255.0).unwrap())
//!     .with_pool(PoolConfig::new(4096, 256).unwrap());
//! assert!(config.validate().is_ok());
//! ```

use heapless::String;

use crate::constants::{
    DEFAULT_PAGE_SIZE, DEFAULT_SECONDS_PER_STAMP, DEFAULT_SEGMENT_SIZE, MAX_LABEL_LENGTH,
};
use crate::errors::{LodError, LodResult};

/// Inline label storage for channel names and units
pub type Label = String<MAX_LABEL_LENGTH>;

/// Segment/page granularity of a `SegmentedPool`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolConfig {
    /// Elements per lazily allocated segment
    pub segment_size: usize,
    /// Segment slots per page
    pub page_size: usize,
}

impl PoolConfig {
    /// Create a validated configuration
    pub fn new(segment_size: usize, page_size: usize) -> LodResult<Self> {
        let config = Self { segment_size, page_size };
        config.validate()?;
        Ok(config)
    }

    /// Reject zero sizes
    pub fn validate(&self) -> LodResult<()> {
        if self.segment_size == 0 {
            return Err(LodError::zero("segment_size"));
        }
        if self.page_size == 0 {
            return Err(LodError::zero("page_size"));
        }
        Ok(())
    }

    /// Number of elements one page can address
    pub fn elements_per_page(&self) -> usize {
        self.segment_size.saturating_mul(self.page_size)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            segment_size: DEFAULT_SEGMENT_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Linear mapping between stored raw values and displayed unit values
///
/// For example an 8-bit ADC over 0..5V maps raw 0 -> 0V and raw 255 -> 5V.
/// Raw endpoints may be inverted (`max_raw < min_raw`); unit endpoints may not.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueMapping {
    value_min: f64,
    value_min_raw: f64,
    value_max: f64,
    value_max_raw: f64,
}

impl ValueMapping {
    /// Build a mapping from two (unit, raw) anchor points
    ///
    /// Coinciding endpoints are widened by one so the scale stays finite.
    pub fn new(
        value_min: f64,
        value_min_raw: f64,
        mut value_max: f64,
        mut value_max_raw: f64,
    ) -> LodResult<Self> {
        let all_finite = [value_min, value_min_raw, value_max, value_max_raw]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(LodError::InvalidMapping { reason: "endpoints must be finite" });
        }
        if value_min > value_max {
            return Err(LodError::InvalidMapping { reason: "value_min exceeds value_max" });
        }
        if value_min == value_max {
            log_warn!("Value mapping: equal unit endpoints {}, widening by 1", value_min);
            value_max += 1.0;
        }
        if value_min_raw == value_max_raw {
            log_warn!("Value mapping: equal raw endpoints {}, widening by 1", value_min_raw);
            value_max_raw += 1.0;
        }
        Ok(Self { value_min, value_min_raw, value_max, value_max_raw })
    }

    /// Identity mapping over `[0, 1]`
    pub const fn identity() -> Self {
        Self {
            value_min: 0.0,
            value_min_raw: 0.0,
            value_max: 1.0,
            value_max_raw: 1.0,
        }
    }

    /// Unit value per raw step
    pub fn scale(&self) -> f64 {
        (self.value_max - self.value_min) / (self.value_max_raw - self.value_min_raw)
    }

    /// Unit value -> raw stored value
    pub fn value_to_raw(&self, value: f64) -> f64 {
        self.value_min_raw + (value - self.value_min) / self.scale()
    }

    /// Raw stored value -> unit value
    pub fn raw_to_value(&self, raw: f64) -> f64 {
        self.value_min + (raw - self.value_min_raw) * self.scale()
    }

    /// Lower unit endpoint
    pub fn value_min(&self) -> f64 {
        self.value_min
    }

    /// Upper unit endpoint
    pub fn value_max(&self) -> f64 {
        self.value_max
    }

    /// Raw value mapped to `value_min`
    pub fn value_min_raw(&self) -> f64 {
        self.value_min_raw
    }

    /// Raw value mapped to `value_max`
    pub fn value_max_raw(&self) -> f64 {
        self.value_max_raw
    }
}

impl Default for ValueMapping {
    fn default() -> Self {
        Self::identity()
    }
}

/// Channel settings: identity, sampling rate, mapping and storage granularity
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelConfig {
    /// Legend name
    pub name: Label,
    /// SI unit shown next to mapped values
    pub unit: Label,
    /// Samples per second
    pub frequency_hz: f64,
    /// Seconds of samples between timeline stamps
    pub seconds_per_stamp: u32,
    /// Raw -> unit mapping
    pub mapping: ValueMapping,
    /// Storage granularity of every pyramid level
    pub pool: PoolConfig,
}

impl ChannelConfig {
    /// Defaults for a channel sampled at `frequency_hz`
    pub fn new(frequency_hz: f64) -> Self {
        Self {
            name: label("graph"),
            unit: label("V"),
            frequency_hz,
            seconds_per_stamp: DEFAULT_SECONDS_PER_STAMP,
            mapping: ValueMapping::default(),
            pool: PoolConfig::default(),
        }
    }

    /// Set the legend name (truncated to `MAX_LABEL_LENGTH` bytes)
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = label(name);
        self
    }

    /// Set the unit label (truncated to `MAX_LABEL_LENGTH` bytes)
    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = label(unit);
        self
    }

    /// Set the stamp interval
    pub fn with_seconds_per_stamp(mut self, seconds: u32) -> Self {
        self.seconds_per_stamp = seconds;
        self
    }

    /// Set the raw -> unit mapping
    pub fn with_mapping(mut self, mapping: ValueMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Set pool granularity
    pub fn with_pool(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    /// Number of samples between timeline stamps
    ///
    /// Never zero for a validated config.
    pub fn samples_per_stamp(&self) -> usize {
        let samples = libm::floor(self.frequency_hz * self.seconds_per_stamp as f64);
        if samples < 1.0 { 1 } else { samples as usize }
    }

    /// Check every field
    pub fn validate(&self) -> LodResult<()> {
        if !(self.frequency_hz.is_finite() && self.frequency_hz > 0.0) {
            return Err(LodError::InvalidFrequency { frequency: self.frequency_hz });
        }
        if self.seconds_per_stamp == 0 {
            return Err(LodError::zero("seconds_per_stamp"));
        }
        self.pool.validate()
    }
}

/// Copy `text` into an inline label, cutting at a char boundary if needed
fn label(text: &str) -> Label {
    let mut out = Label::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            log_warn!("Label truncated to {} bytes: {}", MAX_LABEL_LENGTH, text);
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_config_rejects_zero_sizes() {
        assert_eq!(PoolConfig::new(0, 10), Err(LodError::zero("segment_size")));
        assert_eq!(PoolConfig::new(10, 0), Err(LodError::zero("page_size")));
        assert!(PoolConfig::new(1, 1).is_ok());
    }

    #[test]
    fn pool_config_defaults() {
        let config = PoolConfig::default();
        assert_eq!(config.segment_size, 20_000);
        assert_eq!(config.page_size, 2_000);
        assert_eq!(config.elements_per_page(), 40_000_000);
    }

    #[test]
    fn mapping_roundtrips_adc_range() {
        let mapping = ValueMapping::new(0.0, 0.0, 5.0, 255.0).unwrap();
        assert!((mapping.raw_to_value(255.0) - 5.0).abs() < 1e-12);
        assert!((mapping.value_to_raw(5.0) - 255.0).abs() < 1e-9);
        assert!((mapping.raw_to_value(mapping.value_to_raw(1.7)) - 1.7).abs() < 1e-12);
    }

    #[test]
    fn mapping_with_offsets() {
        // raw 100..228 shows as -16..16
        let mapping = ValueMapping::new(-16.0, 100.0, 16.0, 228.0).unwrap();
        assert_eq!(mapping.raw_to_value(164.0), 0.0);
        assert_eq!(mapping.value_to_raw(16.0), 228.0);
    }

    #[test]
    fn mapping_allows_inverted_raw_range() {
        let mapping = ValueMapping::new(0.0, 255.0, 5.0, 0.0).unwrap();
        assert!(mapping.scale() < 0.0);
        assert_eq!(mapping.raw_to_value(255.0), 0.0);
    }

    #[test]
    fn mapping_rejects_inverted_units() {
        assert!(matches!(
            ValueMapping::new(5.0, 0.0, 0.0, 255.0),
            Err(LodError::InvalidMapping { .. })
        ));
        assert!(ValueMapping::new(f64::NAN, 0.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn mapping_widens_equal_endpoints() {
        let mapping = ValueMapping::new(2.0, 7.0, 2.0, 7.0).unwrap();
        assert_eq!(mapping.value_max(), 3.0);
        assert_eq!(mapping.value_max_raw(), 8.0);
        assert_eq!(mapping.scale(), 1.0);
    }

    #[test]
    fn channel_config_validation() {
        assert!(ChannelConfig::new(100.0).validate().is_ok());
        assert!(matches!(
            ChannelConfig::new(0.0).validate(),
            Err(LodError::InvalidFrequency { .. })
        ));
        assert!(ChannelConfig::new(f64::INFINITY).validate().is_err());
        assert_eq!(
            ChannelConfig::new(10.0).with_seconds_per_stamp(0).validate(),
            Err(LodError::zero("seconds_per_stamp"))
        );
    }

    #[test]
    fn samples_per_stamp_never_zero() {
        assert_eq!(ChannelConfig::new(100.0).samples_per_stamp(), 100);
        assert_eq!(ChannelConfig::new(0.25).samples_per_stamp(), 1);
        assert_eq!(ChannelConfig::new(0.25).with_seconds_per_stamp(8).samples_per_stamp(), 2);
    }

    #[test]
    fn long_labels_are_truncated() {
        let long = "x".repeat(100);
        let config = ChannelConfig::new(1.0).with_name(&long);
        assert_eq!(config.name.len(), MAX_LABEL_LENGTH);
        assert_eq!(config.unit.as_str(), "V");
    }
}
