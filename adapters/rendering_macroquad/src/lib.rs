#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Turtle World.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The window owns the main thread. Drawing requests arrive through a
//! [`SurfaceReceiver`] and are replayed into a [`SurfaceReplica`] once per
//! frame; the replica's trail image is uploaded as a texture only when it
//! changed, and turtles are drawn on top with macroquad's circle primitive.

use anyhow::{Context, Result};
use macroquad::{
    color::WHITE,
    input::{is_key_pressed, KeyCode},
    texture::{FilterMode, Image, Texture2D},
};
use std::time::Duration;
use turtle_world_core::{Raster, TurtlePose};
use turtle_world_rendering::{
    sprite::TurtleSprite, Color, Presentation, RenderingBackend, SurfaceReceiver, SurfaceReplica,
};

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to close the window.
    quit_requested: bool,
    /// `H` toggles drawing of the turtles themselves.
    toggle_turtles: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            toggle_turtles: is_key_pressed(KeyCode::H),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame rate metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run(self, presentation: Presentation, updates: SurfaceReceiver) -> Result<()> {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            dimensions,
        } = presentation;

        let width = u16::try_from(dimensions.width())
            .context("world is too wide to be shown as a single texture")?;
        let height = u16::try_from(dimensions.height())
            .context("world is too tall to be shown as a single texture")?;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::from(width),
            window_height: i32::from(height),
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let background = to_macroquad_color(clear_color);
            let blank = vec![u8::MAX; usize::from(width) * usize::from(height) * 4];
            let mut texture = Texture2D::from_rgba8(width, height, &blank);
            texture.set_filter(FilterMode::Nearest);

            let mut replica = SurfaceReplica::new();
            let mut fps_counter = FpsCounter::default();
            let mut show_turtles = true;
            let mut announced_finish = false;

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }
                if keyboard.toggle_turtles {
                    show_turtles = !show_turtles;
                }

                let _ = updates.pump(&mut replica);
                if replica.driver_finished() && !announced_finish {
                    log::info!("driver finished; close the window to exit");
                    announced_finish = true;
                }

                if replica.take_trails_dirty() {
                    if let Some(trails) = replica.trails() {
                        match trail_image(trails) {
                            Some(image) if image.width == width && image.height == height => {
                                texture.update(&image);
                            }
                            Some(image) => {
                                texture = Texture2D::from_image(&image);
                                texture.set_filter(FilterMode::Nearest);
                            }
                            None => log::warn!("trail image is too large to upload"),
                        }
                    }
                }

                macroquad::window::clear_background(background);
                macroquad::texture::draw_texture(texture, 0.0, 0.0, WHITE);
                if show_turtles {
                    draw_turtles(replica.poses());
                }

                let frame_time = macroquad::time::get_frame_time().max(0.0);
                if let Some(per_second) =
                    fps_counter.record_frame(Duration::from_secs_f32(frame_time))
                {
                    if show_fps {
                        log::info!(
                            "FPS: {per_second:.2} | frames requested: {}",
                            replica.frames_requested()
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn trail_image(trails: &Raster) -> Option<Image> {
    let dimensions = trails.dimensions();
    Some(Image {
        bytes: trails.to_rgba8(),
        width: u16::try_from(dimensions.width()).ok()?,
        height: u16::try_from(dimensions.height()).ok()?,
    })
}

fn draw_turtles(poses: &[TurtlePose]) {
    for pose in poses.iter().filter(|pose| pose.visible) {
        for disc in TurtleSprite::from_pose(pose).discs() {
            macroquad::shapes::draw_circle(
                disc.center.x,
                disc.center.y,
                disc.radius,
                to_macroquad_color(Color::from(disc.color)),
            );
        }
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average rate once a second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
