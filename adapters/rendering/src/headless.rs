//! In-memory surface used by tests and windowless runs.

use std::{cell::RefCell, rc::Rc};

use turtle_world_core::{Dimensions, Point, Raster, RenderSurface, Rgb, TurtlePose, BACKGROUND};

use crate::sprite::compose;

#[derive(Debug, Default)]
struct HeadlessState {
    title: Option<String>,
    trails: Option<Raster>,
    poses: Vec<TurtlePose>,
    lines: u64,
    presented: u64,
}

/// Surface that keeps its image in memory instead of showing a window.
///
/// Clones share state, so a caller can hand one clone to a world and keep
/// another to inspect what the world asked for.
#[derive(Clone, Debug, Default)]
pub struct HeadlessSurface {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessSurface {
    /// Creates a surface that has not been opened yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Title the surface was opened with.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        self.state.borrow().title.clone()
    }

    /// Extent the surface was opened with.
    #[must_use]
    pub fn dimensions(&self) -> Option<Dimensions> {
        self.state
            .borrow()
            .trails
            .as_ref()
            .map(Raster::dimensions)
    }

    /// Number of frames requested so far.
    #[must_use]
    pub fn presented(&self) -> u64 {
        self.state.borrow().presented
    }

    /// Number of trail segments drawn so far.
    #[must_use]
    pub fn lines_drawn(&self) -> u64 {
        self.state.borrow().lines
    }

    /// Poses passed to the most recent frame request.
    #[must_use]
    pub fn poses(&self) -> Vec<TurtlePose> {
        self.state.borrow().poses.clone()
    }

    /// Copy of the persistent trail image without any turtles on top.
    #[must_use]
    pub fn trails(&self) -> Option<Raster> {
        self.state.borrow().trails.clone()
    }

    /// The most recent frame: trails with every visible turtle painted over them.
    #[must_use]
    pub fn snapshot(&self) -> Option<Raster> {
        let state = self.state.borrow();
        state
            .trails
            .as_ref()
            .map(|trails| compose(trails, &state.poses))
    }
}

impl RenderSurface for HeadlessSurface {
    fn open(&mut self, title: &str, dimensions: Dimensions) {
        let mut state = self.state.borrow_mut();
        state.title = Some(title.to_owned());
        state.trails = Some(Raster::new(dimensions, BACKGROUND));
    }

    fn clear(&mut self, color: Rgb) {
        if let Some(trails) = self.state.borrow_mut().trails.as_mut() {
            trails.fill(color);
        }
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Rgb) {
        let mut state = self.state.borrow_mut();
        if let Some(trails) = state.trails.as_mut() {
            trails.draw_line(from, to, color);
        }
        state.lines = state.lines.saturating_add(1);
    }

    fn present(&mut self, turtles: &[TurtlePose]) {
        let mut state = self.state.borrow_mut();
        state.poses.clear();
        state.poses.extend_from_slice(turtles);
        state.presented = state.presented.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawing_before_open_only_counts() {
        let mut surface = HeadlessSurface::new();
        surface.draw_line(Point::new(0, 0), Point::new(3, 3), Rgb::BLACK);

        assert_eq!(surface.lines_drawn(), 1);
        assert!(surface.trails().is_none());
        assert!(surface.snapshot().is_none());
    }

    #[test]
    fn clones_observe_the_same_state() {
        let observer = HeadlessSurface::new();
        let mut surface = observer.clone();
        let dimensions = Dimensions::new(10, 10).expect("valid");

        surface.open("World", dimensions);
        surface.clear(Rgb::BLACK);
        surface.present(&[]);

        assert_eq!(observer.title().as_deref(), Some("World"));
        assert_eq!(observer.dimensions(), Some(dimensions));
        assert_eq!(observer.presented(), 1);
        let trails = observer.trails().expect("opened");
        assert!(trails.pixels().iter().all(|pixel| *pixel == Rgb::BLACK));
    }
}
