//! Turtles: mobile agents that draw their path onto the world.

use std::{cell::RefCell, fmt, rc::Rc};

use turtle_world_core::{
    geometry::{clamp_point, distance, heading_towards, step_offset, turn_heading},
    Point, Rgb, TurtlePose, WorldError,
};

use crate::World;

pub(crate) type TurtleCell = Rc<RefCell<TurtleState>>;

/// Smallest sprite scale a turtle can be given.
const MIN_SIZE: u32 = 1;

#[derive(Clone, Debug)]
pub(crate) struct TurtleState {
    position: Point,
    heading: i32,
    size: u32,
    color: Rgb,
    limb_color: Rgb,
    visible: bool,
    path_enabled: bool,
}

impl TurtleState {
    pub(crate) fn pose(&self) -> TurtlePose {
        TurtlePose {
            position: self.position,
            heading: self.heading,
            size: self.size,
            color: self.color,
            limb_color: self.limb_color,
            visible: self.visible,
        }
    }
}

impl fmt::Display for TurtleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Turtle(x: {}, y: {}, direction: {}, red: {}, green: {}, blue: {})",
            self.position.x,
            self.position.y,
            self.heading,
            self.color.red,
            self.color.green,
            self.color.blue
        )
    }
}

/// A turtle living in a [`World`].
///
/// The handle is cheap to clone; clones steer the same turtle. Every command
/// that changes what is visible on screen triggers a repaint of the world,
/// except for the flag setters which take effect with the next movement.
#[derive(Clone)]
pub struct Turtle {
    state: TurtleCell,
    world: World,
}

impl Turtle {
    /// Places a new turtle at the centre of `world`.
    #[must_use]
    pub fn new(world: &World) -> Self {
        let center = world.dimensions().center();
        Self::at(world, center.x, center.y)
    }

    /// Places a new turtle at `(x, y)`, clamped into the bounds of `world`.
    #[must_use]
    pub fn at(world: &World, x: i32, y: i32) -> Self {
        Self::spawn(world, Point::new(x, y), None, MIN_SIZE)
    }

    /// Starts configuring a turtle.
    #[must_use]
    pub fn builder<'w>() -> TurtleBuilder<'w> {
        TurtleBuilder::default()
    }

    fn spawn(world: &World, requested: Point, color: Option<Rgb>, size: u32) -> Self {
        let position = clamp_point(
            i64::from(requested.x),
            i64::from(requested.y),
            world.dimensions(),
        );
        let color = color.unwrap_or_else(|| world.next_color());
        let turtle = Self {
            state: Rc::new(RefCell::new(TurtleState {
                position,
                heading: 0,
                size: size.max(MIN_SIZE),
                color,
                limb_color: color.brighter(),
                visible: true,
                path_enabled: true,
            })),
            world: world.clone(),
        };

        world.register(&turtle.state);
        world.repaint();
        turtle
    }

    pub(crate) fn from_parts(state: TurtleCell, world: World) -> Self {
        Self { state, world }
    }

    pub(crate) fn cell(&self) -> &TurtleCell {
        &self.state
    }

    /// World this turtle was created in.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current column.
    #[must_use]
    pub fn x(&self) -> i32 {
        self.state.borrow().position.x
    }

    /// Current row.
    #[must_use]
    pub fn y(&self) -> i32 {
        self.state.borrow().position.y
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Point {
        self.state.borrow().position
    }

    /// Heading in degrees, always within `0..360`.
    #[must_use]
    pub fn direction(&self) -> i32 {
        self.state.borrow().heading
    }

    /// Body and trail colour.
    #[must_use]
    pub fn color(&self) -> Rgb {
        self.state.borrow().color
    }

    /// Head and leg colour, a brighter variant of [`color`](Self::color).
    #[must_use]
    pub fn limb_color(&self) -> Rgb {
        self.state.borrow().limb_color
    }

    /// Sprite scale factor.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.state.borrow().size
    }

    /// Whether the turtle is painted.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state.borrow().visible
    }

    /// Whether movement leaves a trail.
    #[must_use]
    pub fn is_path_enabled(&self) -> bool {
        self.state.borrow().path_enabled
    }

    /// Snapshot of everything a surface needs to paint the turtle.
    #[must_use]
    pub fn pose(&self) -> TurtlePose {
        self.state.borrow().pose()
    }

    /// Recolours the turtle and derives a matching limb colour.
    pub fn set_color(&self, red: u8, green: u8, blue: u8) {
        let mut state = self.state.borrow_mut();
        state.color = Rgb::new(red, green, blue);
        state.limb_color = state.color.brighter();
    }

    /// Changes the sprite scale. Sizes below one are raised to one.
    pub fn set_size(&self, size: u32) {
        self.state.borrow_mut().size = size.max(MIN_SIZE);
    }

    /// Shows or hides the turtle.
    pub fn set_visible(&self, visible: bool) {
        self.state.borrow_mut().visible = visible;
    }

    /// Makes subsequent movement leave a trail.
    pub fn enable_path(&self) {
        self.state.borrow_mut().path_enabled = true;
    }

    /// Makes subsequent movement leave no trail.
    pub fn disable_path(&self) {
        self.state.borrow_mut().path_enabled = false;
    }

    /// Straight-line distance from the turtle to `(x, y)`.
    #[must_use]
    pub fn distance_to(&self, x: i32, y: i32) -> f64 {
        distance(self.position(), Point::new(x, y))
    }

    /// Relocates the turtle to `(x, y)`, clamped into the world bounds.
    ///
    /// Every other movement command funnels through here. The trail segment
    /// is drawn before the position changes, and the world is repainted even
    /// when the turtle ends up where it started.
    pub fn move_to(&self, x: i32, y: i32) {
        self.move_to_unclamped(i64::from(x), i64::from(y));
    }

    /// Moves `step` pixels along the current heading; negative steps reverse.
    pub fn forward(&self, step: i32) {
        let (position, heading) = {
            let state = self.state.borrow();
            (state.position, state.heading)
        };
        let (dx, dy) = step_offset(heading, step);

        self.move_to_unclamped(i64::from(position.x) + dx, i64::from(position.y) + dy);
    }

    /// Turns clockwise on screen by `degrees`; negative values turn the other way.
    pub fn turn(&self, degrees: i32) {
        {
            let mut state = self.state.borrow_mut();
            state.heading = turn_heading(state.heading, degrees);
        }
        self.world.repaint();
    }

    /// Faces the point `(x, y)`.
    ///
    /// Targeting the turtle's own position leaves the heading untouched and
    /// does not repaint.
    pub fn turn_to(&self, x: i32, y: i32) {
        let Some(heading) = heading_towards(self.position(), Point::new(x, y)) else {
            return;
        };

        self.state.borrow_mut().heading = heading;
        self.world.repaint();
    }

    /// Human readable summary of position, heading and colour.
    #[must_use]
    pub fn describe(&self) -> String {
        self.to_string()
    }

    fn move_to_unclamped(&self, x: i64, y: i64) {
        let target = clamp_point(x, y, self.world.dimensions());
        let (origin, color, path_enabled) = {
            let state = self.state.borrow();
            (state.position, state.color, state.path_enabled)
        };

        if path_enabled {
            self.world.draw_path(origin, target, color);
        }

        self.state.borrow_mut().position = target;
        self.world.repaint();
    }
}

impl PartialEq for Turtle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl Eq for Turtle {}

impl fmt::Display for Turtle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.state.borrow(), f)
    }
}

impl fmt::Debug for Turtle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Turtle")
            .field("state", &*self.state.borrow())
            .field("world", &self.world.title())
            .finish()
    }
}

/// Configures a [`Turtle`] before it joins its world.
#[derive(Clone, Debug, Default)]
pub struct TurtleBuilder<'w> {
    world: Option<&'w World>,
    position: Option<Point>,
    color: Option<Rgb>,
    size: Option<u32>,
}

impl<'w> TurtleBuilder<'w> {
    /// World the turtle will live in. Required.
    #[must_use]
    pub fn world(mut self, world: &'w World) -> Self {
        self.world = Some(world);
        self
    }

    /// Starting position; defaults to the centre of the world.
    #[must_use]
    pub fn position(mut self, x: i32, y: i32) -> Self {
        self.position = Some(Point::new(x, y));
        self
    }

    /// Starting colour; defaults to one drawn from the world's colour source.
    #[must_use]
    pub fn color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    /// Sprite scale factor; defaults to one.
    #[must_use]
    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Creates the turtle, registers it and repaints its world.
    ///
    /// Returns [`WorldError::InvalidReference`] when no world was provided.
    pub fn spawn(self) -> Result<Turtle, WorldError> {
        let world = self.world.ok_or(WorldError::InvalidReference(
            "turtles can not live without a world",
        ))?;
        let position = self
            .position
            .unwrap_or_else(|| world.dimensions().center());

        Ok(Turtle::spawn(
            world,
            position,
            self.color,
            self.size.unwrap_or(MIN_SIZE),
        ))
    }
}
