//! Time sources for channel timelines
//!
//! A channel stamps its timeline with wall-clock time once per N samples.
//! Where that time comes from depends on the platform:
//! - System clock (when `std` is available)
//! - A fixed, manually advanced clock (tests, replaying recordings)
//! - Anything else implementing `TimeSource` (RTC, GPS, network time)

/// Timestamp in milliseconds since epoch (or device boot)
pub type Timestamp = u64;

/// Source of wall-clock time
pub trait TimeSource {
    /// Current timestamp in milliseconds
    fn now(&self) -> Timestamp;
}

/// System time source (requires std)
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

#[cfg(feature = "std")]
impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        use std::time::{SystemTime as StdSystemTime, UNIX_EPOCH};

        StdSystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Manually driven time source for tests and replay
#[derive(Debug, Clone, Default)]
pub struct FixedTime {
    timestamp: Timestamp,
}

impl FixedTime {
    /// Clock frozen at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// Jump to `timestamp`
    pub fn set(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Move forward by `ms`
    pub fn advance(&mut self, ms: u64) {
        self.timestamp += ms;
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp
    }
}

impl<S: TimeSource + ?Sized> TimeSource for &S {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
