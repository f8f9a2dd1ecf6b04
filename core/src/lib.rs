#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Turtle World crates.
//!
//! This crate defines the vocabulary that connects the authoritative world,
//! its turtles and the rendering adapters. The world validates its
//! [`Dimensions`], accumulates trails inside a [`Raster`] and pushes
//! [`TurtlePose`] snapshots to an injected [`RenderSurface`] whenever a
//! turtle changes visible state. Adapters implement the surface contract and
//! never reach back into the world.

mod color;
pub mod geometry;
mod raster;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use color::{ColorSource, FixedColor, RandomColors, Rgb};
pub use raster::Raster;

/// Width used by worlds constructed without explicit dimensions.
pub const DEFAULT_WIDTH: i32 = 400;

/// Height used by worlds constructed without explicit dimensions.
pub const DEFAULT_HEIGHT: i32 = 400;

/// Colour the persistent trail image is filled with when a world opens.
pub const BACKGROUND: Rgb = Rgb::WHITE;

/// Validated extent of a world measured in whole pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    width: u32,
    height: u32,
}

impl Dimensions {
    /// Validates the provided extent.
    ///
    /// Returns [`WorldError::InvalidDimension`] when either axis is smaller
    /// than one pixel.
    pub fn new(width: i32, height: i32) -> Result<Self, WorldError> {
        if width < 1 || height < 1 {
            return Err(WorldError::InvalidDimension { width, height });
        }

        Ok(Self {
            width: width.unsigned_abs(),
            height: height.unsigned_abs(),
        })
    }

    /// Number of pixel columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of pixel rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Integer centre of the extent, rounding towards the origin.
    #[must_use]
    pub const fn center(&self) -> Point {
        Point::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Total number of pixels covered by the extent.
    #[must_use]
    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH.unsigned_abs(),
            height: DEFAULT_HEIGHT.unsigned_abs(),
        }
    }
}

/// Integer pixel coordinate inside a world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Column measured from the left edge.
    pub x: i32,
    /// Row measured from the top edge.
    pub y: i32,
}

impl Point {
    /// Creates a new coordinate pair.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Immutable snapshot of everything a surface needs to paint one turtle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurtlePose {
    /// Current position of the turtle.
    pub position: Point,
    /// Heading in whole degrees within `0..360`.
    pub heading: i32,
    /// Scale factor applied to the turtle sprite.
    pub size: u32,
    /// Colour of the body and of the trail.
    pub color: Rgb,
    /// Colour of the head and legs.
    pub limb_color: Rgb,
    /// Whether the turtle should be painted at all.
    pub visible: bool,
}

/// Drawing target the world forwards its visible state to.
///
/// Implementations keep their own persistent image: [`clear`](Self::clear)
/// and [`draw_line`](Self::draw_line) mutate it, while
/// [`present`](Self::present) requests a frame that overlays the provided
/// poses on top of it. Presenting is a notification; implementations may
/// coalesce requests and must not block the caller.
pub trait RenderSurface {
    /// Prepares the surface for a world with the given title and extent.
    fn open(&mut self, title: &str, dimensions: Dimensions);

    /// Fills the persistent image with a solid colour.
    fn clear(&mut self, color: Rgb);

    /// Draws an anti-aliased segment into the persistent image.
    fn draw_line(&mut self, from: Point, to: Point, color: Rgb);

    /// Requests a frame showing the persistent image and the provided poses.
    fn present(&mut self, turtles: &[TurtlePose]);
}

/// Errors surfaced when constructing worlds and turtles.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// A world must be at least one pixel wide and one pixel tall.
    #[error("invalid world dimensions {width}x{height}: both axes must be at least 1")]
    InvalidDimension {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
    },
    /// A required world or turtle reference was missing or belongs elsewhere.
    #[error("invalid reference: {0}")]
    InvalidReference(&'static str),
}
