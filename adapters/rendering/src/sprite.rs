//! Geometry of the turtle sprite, shared by every backend.
//!
//! A turtle is drawn as a round body with a head in front of it and four
//! legs spread evenly around the remaining circumference. Head and legs use
//! the limb colour and are painted first so the body overlaps them.

use std::f32::consts::TAU;

use glam::Vec2;
use turtle_world_core::{Raster, Rgb, TurtlePose};

/// Body radius of a turtle of size one.
pub const BODY_RADIUS: f32 = 8.0;

const HEAD_RADIUS_RATIO: f32 = 5.0 / 8.0;
const HEAD_DISTANCE_RATIO: f32 = 1.0 + 2.0 / 8.0;
const LEG_RADIUS_RATIO: f32 = 3.0 / 8.0;
const LEG_DISTANCE_RATIO: f32 = 1.0 + 1.0 / 8.0;
const LEG_COUNT: usize = 4;

/// Filled circle making up part of a turtle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Disc {
    /// Centre in world pixels.
    pub center: Vec2,
    /// Radius in world pixels.
    pub radius: f32,
    /// Fill colour.
    pub color: Rgb,
}

/// Discs composing one turtle, listed in painting order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurtleSprite {
    /// Head placed along the heading.
    pub head: Disc,
    /// Legs spread around the body.
    pub legs: [Disc; LEG_COUNT],
    /// Body centred on the turtle's position.
    pub body: Disc,
}

impl TurtleSprite {
    /// Lays out the sprite for `pose`.
    #[must_use]
    pub fn from_pose(pose: &TurtlePose) -> Self {
        let radius = BODY_RADIUS * pose.size as f32;
        let center = Vec2::new(pose.position.x as f32, pose.position.y as f32);
        let heading = (pose.heading as f32).to_radians();

        let head = Disc {
            center: center + circular_offset(heading, radius * HEAD_DISTANCE_RATIO),
            radius: radius * HEAD_RADIUS_RATIO,
            color: pose.limb_color,
        };

        let legs = std::array::from_fn(|index| {
            let angle = heading + TAU * ((index + 1) as f32 / (LEG_COUNT + 1) as f32);
            Disc {
                center: center + circular_offset(angle, radius * LEG_DISTANCE_RATIO),
                radius: radius * LEG_RADIUS_RATIO,
                color: pose.limb_color,
            }
        });

        let body = Disc {
            center,
            radius,
            color: pose.color,
        };

        Self { head, legs, body }
    }

    /// Every disc in painting order.
    pub fn discs(&self) -> impl Iterator<Item = &Disc> {
        std::iter::once(&self.head)
            .chain(self.legs.iter())
            .chain(std::iter::once(&self.body))
    }
}

/// Offset of a point `radius` away from the origin at `angle` radians.
#[must_use]
pub fn circular_offset(angle: f32, radius: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * radius
}

/// Paints every visible pose onto `canvas`.
pub fn paint_turtles(canvas: &mut Raster, poses: &[TurtlePose]) {
    for pose in poses.iter().filter(|pose| pose.visible) {
        for disc in TurtleSprite::from_pose(pose).discs() {
            canvas.fill_circle(disc.center.x, disc.center.y, disc.radius, disc.color);
        }
    }
}

/// Copies `trails` and overlays the visible poses on the copy.
#[must_use]
pub fn compose(trails: &Raster, poses: &[TurtlePose]) -> Raster {
    let mut frame = trails.clone();
    paint_turtles(&mut frame, poses);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use turtle_world_core::{Dimensions, Point};

    const BODY: Rgb = Rgb::new(40, 80, 120);
    const LIMB: Rgb = Rgb::new(57, 114, 171);

    fn pose(x: i32, y: i32, heading: i32, visible: bool) -> TurtlePose {
        TurtlePose {
            position: Point::new(x, y),
            heading,
            size: 1,
            color: BODY,
            limb_color: LIMB,
            visible,
        }
    }

    fn canvas() -> Raster {
        Raster::new(Dimensions::new(100, 100).expect("valid"), Rgb::WHITE)
    }

    #[test]
    fn head_sits_in_front_of_the_body() {
        let sprite = TurtleSprite::from_pose(&pose(50, 50, 0, true));

        assert_eq!(sprite.body.radius, 8.0);
        assert_eq!(sprite.head.radius, 5.0);
        assert!((sprite.head.center - Vec2::new(60.0, 50.0)).length() < 1e-4);
        assert_eq!(sprite.head.color, LIMB);
        assert_eq!(sprite.body.color, BODY);
    }

    #[test]
    fn legs_surround_the_body_without_overlapping_the_head() {
        let sprite = TurtleSprite::from_pose(&pose(50, 50, 90, true));
        let center = sprite.body.center;

        for leg in &sprite.legs {
            assert!(((leg.center - center).length() - 9.0).abs() < 1e-4);
            assert_eq!(leg.radius, 3.0);
            assert!((leg.center - sprite.head.center).length() > leg.radius + sprite.head.radius);
        }
    }

    #[test]
    fn sprite_scales_with_size() {
        let mut large = pose(50, 50, 0, true);
        large.size = 2;

        let sprite = TurtleSprite::from_pose(&large);

        assert_eq!(sprite.body.radius, 16.0);
        assert_eq!(sprite.legs[0].radius, 6.0);
    }

    #[test]
    fn compose_paints_visible_turtles_only() {
        let trails = canvas();
        let frame = compose(&trails, &[pose(20, 20, 0, true), pose(70, 70, 0, false)]);

        assert_eq!(frame.pixel(20, 20), Some(BODY));
        assert_eq!(frame.pixel(30, 20), Some(LIMB));
        assert_eq!(frame.pixel(70, 70), Some(Rgb::WHITE));
        assert_eq!(trails.pixel(20, 20), Some(Rgb::WHITE));
    }

    #[test]
    fn discs_are_listed_in_painting_order() {
        let sprite = TurtleSprite::from_pose(&pose(0, 0, 0, true));
        let discs: Vec<_> = sprite.discs().collect();

        assert_eq!(discs.len(), 6);
        assert_eq!(*discs[0], sprite.head);
        assert_eq!(*discs[5], sprite.body);
    }
}
