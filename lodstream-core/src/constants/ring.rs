//! Ring Buffer Capacities

/// Default capacity for positional trails.
///
/// - 1 000 `Coord4` points × 32 bytes = ~32KB
/// - ~16 seconds of trail at 60 updates per second
pub const DEFAULT_TRAIL_CAPACITY: usize = 1_000;
