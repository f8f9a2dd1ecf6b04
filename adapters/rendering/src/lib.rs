#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Turtle World adapters.
//!
//! The world talks to a [`RenderSurface`](turtle_world_core::RenderSurface).
//! This crate provides the surfaces that do not depend on a windowing
//! toolkit: [`HeadlessSurface`] keeps everything in memory for tests and
//! batch runs, while [`ChannelSurface`] forwards every request to a window
//! backend running on another thread. Backends implement
//! [`RenderingBackend`] and share the turtle sprite geometry in [`sprite`].

mod channel;
mod headless;
pub mod sprite;

use anyhow::Result as AnyResult;
use turtle_world_core::{Dimensions, Rgb};

pub use channel::{channel, ChannelSurface, SurfaceReceiver, SurfaceReplica, SurfaceUpdate};
pub use headless::HeadlessSurface;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::from_rgb_u8(rgb.red, rgb.green, rgb.blue)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color shown until the world's trail image arrives.
    pub clear_color: Color,
    /// Size of the drawable area in pixels.
    pub dimensions: Dimensions,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, dimensions: Dimensions) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            dimensions,
        }
    }
}

/// Rendering backend capable of presenting a world fed through a [`SurfaceReceiver`].
pub trait RenderingBackend {
    /// Runs the backend until its window is closed or it is asked to quit.
    ///
    /// Updates are drained once per displayed frame, so many requests issued
    /// between two frames collapse into a single picture.
    fn run(self, presentation: Presentation, updates: SurfaceReceiver) -> AnyResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_convert_from_byte_channels() {
        let color = Color::from(Rgb::new(255, 0, 51));

        assert_eq!(color, Color::new(1.0, 0.0, 0.2, 1.0));
    }

    #[test]
    fn presentation_keeps_its_configuration() {
        let dimensions = Dimensions::new(320, 200).expect("valid");
        let presentation =
            Presentation::new("World 2", Color::from_rgb_u8(255, 255, 255), dimensions);

        assert_eq!(presentation.window_title, "World 2");
        assert_eq!(presentation.dimensions, dimensions);
        assert_eq!(presentation.clear_color.alpha, 1.0);
    }
}
