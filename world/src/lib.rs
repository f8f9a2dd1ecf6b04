#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Turtle World.
//!
//! A [`World`] owns the persistent trail image, the registry of live turtles
//! and the rendering surface it reports to. [`Turtle`] handles mutate their
//! own pose and ask their world to record trails and repaint. Everything runs
//! on the thread that issues commands; the surface decides when frames
//! actually reach the screen.

mod titles;
mod turtle;

use std::{
    cell::{Ref, RefCell},
    fmt,
    rc::Rc,
};

use turtle_world_core::{
    ColorSource, Dimensions, Point, RandomColors, Raster, RenderSurface, Rgb, TurtlePose,
    WorldError, BACKGROUND,
};

pub use titles::TitleAllocator;
pub use turtle::{Turtle, TurtleBuilder};

use turtle::TurtleCell;

/// Bounded canvas and registry of turtles.
///
/// `World` is a cheap handle: clones refer to the same world, and equality
/// compares identity rather than contents.
#[derive(Clone)]
pub struct World {
    inner: Rc<RefCell<WorldState>>,
}

struct WorldState {
    dimensions: Dimensions,
    title: String,
    trails: Raster,
    turtles: Vec<TurtleCell>,
    surface: Box<dyn RenderSurface>,
    colors: Box<dyn ColorSource>,
    repaints: u64,
}

impl World {
    /// Starts configuring a world of the given extent drawing onto `surface`.
    pub fn builder<S>(width: i32, height: i32, surface: S) -> WorldBuilder<'static>
    where
        S: RenderSurface + 'static,
    {
        WorldBuilder {
            width,
            height,
            surface: Box::new(surface),
            colors: None,
            title: TitleSource::Allocator(TitleAllocator::global()),
            background: BACKGROUND,
        }
    }

    /// Creates a world with random turtle colours and a globally allocated title.
    ///
    /// Returns [`WorldError::InvalidDimension`] when either axis is below one.
    pub fn new<S>(width: i32, height: i32, surface: S) -> Result<Self, WorldError>
    where
        S: RenderSurface + 'static,
    {
        Self::builder(width, height, surface).build()
    }

    /// Width of the world in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.inner.borrow().dimensions.width()
    }

    /// Height of the world in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.inner.borrow().dimensions.height()
    }

    /// Extent of the world.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.inner.borrow().dimensions
    }

    /// Title assigned to the world's window.
    #[must_use]
    pub fn title(&self) -> String {
        self.inner.borrow().title.clone()
    }

    /// Registers a turtle with this world.
    ///
    /// Adding a turtle that is already registered is ignored. Turtles bound
    /// to another world are rejected with [`WorldError::InvalidReference`].
    pub fn add(&self, turtle: &Turtle) -> Result<(), WorldError> {
        if turtle.world() != self {
            return Err(WorldError::InvalidReference(
                "turtle belongs to a different world",
            ));
        }

        self.register(turtle.cell());
        Ok(())
    }

    /// Deregisters a turtle and repaints. Unknown turtles are ignored.
    pub fn remove(&self, turtle: &Turtle) {
        let removed = {
            let mut state = self.inner.borrow_mut();
            let before = state.turtles.len();
            state
                .turtles
                .retain(|cell| !Rc::ptr_eq(cell, turtle.cell()));
            before != state.turtles.len()
        };

        if removed {
            log::debug!("removed turtle from {}", self.title());
            self.repaint();
        }
    }

    /// Whether the turtle is currently registered with this world.
    #[must_use]
    pub fn contains(&self, turtle: &Turtle) -> bool {
        self.inner
            .borrow()
            .turtles
            .iter()
            .any(|cell| Rc::ptr_eq(cell, turtle.cell()))
    }

    /// Number of registered turtles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().turtles.len()
    }

    /// Whether no turtle is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().turtles.is_empty()
    }

    /// Handles to every registered turtle in registration order.
    #[must_use]
    pub fn turtles(&self) -> Vec<Turtle> {
        self.inner
            .borrow()
            .turtles
            .iter()
            .map(|cell| Turtle::from_parts(Rc::clone(cell), self.clone()))
            .collect()
    }

    /// Poses of every registered turtle in registration order.
    #[must_use]
    pub fn poses(&self) -> Vec<TurtlePose> {
        self.inner.borrow().poses()
    }

    /// Read-only view of the persistent trail image.
    #[must_use]
    pub fn trails(&self) -> Ref<'_, Raster> {
        Ref::map(self.inner.borrow(), |state| &state.trails)
    }

    /// Number of frames requested from the surface so far.
    #[must_use]
    pub fn repaint_count(&self) -> u64 {
        self.inner.borrow().repaints
    }

    /// Asks the surface to show the current state of every registered turtle.
    pub fn repaint(&self) {
        let mut state = self.inner.borrow_mut();
        let poses = state.poses();
        state.repaints = state.repaints.saturating_add(1);
        log::trace!("repaint #{} with {} turtles", state.repaints, poses.len());
        state.surface.present(&poses);
    }

    /// Human readable summary of the world and its turtles.
    #[must_use]
    pub fn describe(&self) -> String {
        self.to_string()
    }

    pub(crate) fn register(&self, cell: &TurtleCell) {
        let mut state = self.inner.borrow_mut();
        if state.turtles.iter().any(|known| Rc::ptr_eq(known, cell)) {
            return;
        }

        state.turtles.push(Rc::clone(cell));
        log::debug!(
            "registered turtle with {} ({} live)",
            state.title,
            state.turtles.len()
        );
    }

    pub(crate) fn next_color(&self) -> Rgb {
        self.inner.borrow_mut().colors.next_color()
    }

    pub(crate) fn draw_path(&self, from: Point, to: Point, color: Rgb) {
        let mut state = self.inner.borrow_mut();
        state.trails.draw_line(from, to, color);
        state.surface.draw_line(from, to, color);
    }
}

impl WorldState {
    fn poses(&self) -> Vec<TurtlePose> {
        self.turtles
            .iter()
            .map(|cell| cell.borrow().pose())
            .collect()
    }
}

impl PartialEq for World {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for World {}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        write!(
            f,
            "{{World({}, {})",
            state.dimensions.width(),
            state.dimensions.height()
        )?;
        for cell in &state.turtles {
            write!(f, ", {}", cell.borrow())?;
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("World")
            .field("title", &state.title)
            .field("dimensions", &state.dimensions)
            .field("turtles", &state.turtles.len())
            .field("repaints", &state.repaints)
            .finish()
    }
}

enum TitleSource<'a> {
    Allocator(&'a TitleAllocator),
    Fixed(String),
}

/// Configures a [`World`] before its window opens.
pub struct WorldBuilder<'a> {
    width: i32,
    height: i32,
    surface: Box<dyn RenderSurface>,
    colors: Option<Box<dyn ColorSource>>,
    title: TitleSource<'a>,
    background: Rgb,
}

impl<'a> WorldBuilder<'a> {
    /// Supplies the colours handed to new turtles.
    #[must_use]
    pub fn colors<C>(mut self, colors: C) -> Self
    where
        C: ColorSource + 'static,
    {
        self.colors = Some(Box::new(colors));
        self
    }

    /// Uses a fixed window title instead of allocating one.
    #[must_use]
    pub fn title<T>(mut self, title: T) -> Self
    where
        T: Into<String>,
    {
        self.title = TitleSource::Fixed(title.into());
        self
    }

    /// Allocates the window title from `titles` instead of the process-wide allocator.
    #[must_use]
    pub fn titles<'b>(self, titles: &'b TitleAllocator) -> WorldBuilder<'b> {
        WorldBuilder {
            width: self.width,
            height: self.height,
            surface: self.surface,
            colors: self.colors,
            title: TitleSource::Allocator(titles),
            background: self.background,
        }
    }

    /// Colour the trail image starts out with.
    #[must_use]
    pub fn background(mut self, background: Rgb) -> Self {
        self.background = background;
        self
    }

    /// Validates the configuration, opens the surface and shows an empty frame.
    pub fn build(self) -> Result<World, WorldError> {
        let dimensions = Dimensions::new(self.width, self.height)?;
        let title = match self.title {
            TitleSource::Allocator(titles) => titles.allocate(),
            TitleSource::Fixed(title) => title,
        };
        let colors = self
            .colors
            .unwrap_or_else(|| Box::new(RandomColors::from_entropy()));

        let mut surface = self.surface;
        surface.open(&title, dimensions);
        surface.clear(self.background);

        log::info!(
            "opened {title} ({}x{})",
            dimensions.width(),
            dimensions.height()
        );

        let world = World {
            inner: Rc::new(RefCell::new(WorldState {
                dimensions,
                title,
                trails: Raster::new(dimensions, self.background),
                turtles: Vec::new(),
                surface,
                colors,
                repaints: 0,
            })),
        };
        world.repaint();
        Ok(world)
    }
}

impl fmt::Debug for WorldBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldBuilder")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("background", &self.background)
            .finish_non_exhaustive()
    }
}
