//! Integer turtle geometry: clamping, heading arithmetic and step offsets.
//!
//! Headings are whole degrees measured clockwise on screen, since the y axis
//! grows downwards. All arithmetic widens to `i64` before clamping so that
//! extreme inputs never overflow.

use crate::{Dimensions, Point};

/// Number of degrees in a full revolution.
pub const FULL_TURN: i64 = 360;

/// Rounds to the nearest integer, resolving half-way cases towards positive infinity.
#[must_use]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Clamps a coordinate into `0..extent`.
#[must_use]
pub fn clamp_axis(value: i64, extent: u32) -> i32 {
    let last = i64::from(extent.max(1)) - 1;
    value.clamp(0, last) as i32
}

/// Clamps an arbitrary coordinate pair into the bounds of a world.
#[must_use]
pub fn clamp_point(x: i64, y: i64, dimensions: Dimensions) -> Point {
    Point::new(
        clamp_axis(x, dimensions.width()),
        clamp_axis(y, dimensions.height()),
    )
}

/// Wraps any number of degrees into `0..360`.
#[must_use]
pub fn normalize_heading(degrees: i64) -> i32 {
    degrees.rem_euclid(FULL_TURN) as i32
}

/// Adds a turn of `delta` degrees to `heading` and wraps the result.
#[must_use]
pub fn turn_heading(heading: i32, delta: i32) -> i32 {
    normalize_heading(i64::from(heading) + i64::from(delta))
}

/// Whole-pixel displacement of a `step` taken along `heading`.
#[must_use]
pub fn step_offset(heading: i32, step: i32) -> (i64, i64) {
    let radians = f64::from(heading).to_radians();
    let step = f64::from(step);

    (
        round_half_up(radians.cos() * step),
        round_half_up(radians.sin() * step),
    )
}

/// Heading that points from `from` towards `to`.
///
/// Returns `None` when both points coincide, since no direction is defined.
#[must_use]
pub fn heading_towards(from: Point, to: Point) -> Option<i32> {
    if from == to {
        return None;
    }

    let dx = f64::from(to.x) - f64::from(from.x);
    let dy = f64::from(to.y) - f64::from(from.y);

    Some(normalize_heading(round_half_up(dy.atan2(dx).to_degrees())))
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(from: Point, to: Point) -> f64 {
    let dx = f64::from(from.x) - f64::from(to.x);
    let dy = f64::from(from.y) - f64::from(to.y);
    dx.hypot(dy)
}
