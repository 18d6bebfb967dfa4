//! Render geometry for a resolved range
//!
//! Turns a `LodRange` into the vertex data a draw call needs, without
//! issuing any draw calls. Two shapes are produced:
//!
//! ```text
//!  polyline (avg)              columns (min/max)
//!
//!      *                          |
//!     / \      *                  |   |
//!    /   *----/                   |   |       |
//!   *                                 |   |   |
//!   x0  x1  x2  x3                x0  x1  x2  x3
//! ```
//!
//! Vertex k sits at `start_pixel + k * step` with
//! `step = (end_pixel - start_pixel) / span`. A range with fewer than two
//! entries produces nothing: one point is neither a line nor a useful column.

use crate::pyramid::LodRange;
use crate::traits::{Aggregate, Sample};

/// Point on the average polyline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Horizontal position in output pixels
    pub x: f64,
    /// Value (raw or mapped)
    pub y: f64,
}

/// Vertical min/max span at one x position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    /// Horizontal position in output pixels
    pub x: f64,
    /// Lower end (minval)
    pub low: f64,
    /// Upper end (maxval)
    pub high: f64,
}

/// First x, spacing, and number of entries to emit
fn layout<E>(range: &LodRange<'_, E>) -> (f64, f64, usize) {
    if !range.is_renderable() {
        return (0.0, 0.0, 0);
    }
    let step = (range.end_pixel() - range.start_pixel()) / range.span() as f64;
    (range.start_pixel(), step, range.entry_count())
}

/// Average polyline in raw units
pub fn polyline<'a, E: Aggregate>(range: &LodRange<'a, E>) -> impl Iterator<Item = Vertex> + 'a {
    polyline_mapped(range, <E::Value as Sample>::to_f64)
}

/// Average polyline with `map` applied to every value
pub fn polyline_mapped<'a, E, F>(range: &LodRange<'a, E>, map: F) -> impl Iterator<Item = Vertex> + 'a
where
    E: Aggregate,
    F: Fn(E::Value) -> f64 + 'a,
{
    let (x0, step, count) = layout(range);
    range.entries().take(count).enumerate().map(move |(k, entry)| Vertex {
        x: x0 + k as f64 * step,
        y: map(entry.avg()),
    })
}

/// Min/max columns in raw units
pub fn columns<'a, E: Aggregate>(range: &LodRange<'a, E>) -> impl Iterator<Item = Column> + 'a {
    columns_mapped(range, <E::Value as Sample>::to_f64)
}

/// Min/max columns with `map` applied to both ends
///
/// A decreasing mapping (inverted raw range) is handled: `low <= high`
/// always holds in the output.
pub fn columns_mapped<'a, E, F>(range: &LodRange<'a, E>, map: F) -> impl Iterator<Item = Column> + 'a
where
    E: Aggregate,
    F: Fn(E::Value) -> f64 + 'a,
{
    let (x0, step, count) = layout(range);
    range.entries().take(count).enumerate().map(move |(k, entry)| {
        let a = map(entry.minval());
        let b = map(entry.maxval());
        Column {
            x: x0 + k as f64 * step,
            low: a.min(b),
            high: a.max(b),
        }
    })
}
