//! Surface that forwards drawing requests to a window running elsewhere.
//!
//! The world lives on the driver thread while toolkits usually insist on
//! owning the main thread. [`ChannelSurface`] turns every surface call into a
//! [`SurfaceUpdate`] message; the backend pumps them into a
//! [`SurfaceReplica`] once per displayed frame.
//!
//! Image updates travel over an unbounded channel and are never dropped.
//! Frame requests travel over a single-slot channel: a newer request
//! replaces one the window has not picked up yet, so a driver issuing
//! commands faster than the display refreshes queues at most one frame.

use flume::{Receiver, Sender, TryRecvError, TrySendError};

use turtle_world_core::{Dimensions, Point, Raster, RenderSurface, Rgb, TurtlePose, BACKGROUND};

/// Drawing request forwarded from a world to a window backend.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceUpdate {
    /// A world opened with the given title and extent.
    Open {
        /// Title allocated for the world.
        title: String,
        /// Extent of the world.
        dimensions: Dimensions,
    },
    /// The persistent image was filled with a solid colour.
    Clear(Rgb),
    /// A trail segment was drawn.
    Line {
        /// Start of the segment.
        from: Point,
        /// End of the segment.
        to: Point,
        /// Colour of the segment.
        color: Rgb,
    },
    /// A frame was requested with the given turtle poses.
    Present(Vec<TurtlePose>),
}

/// Creates a connected surface and receiver pair.
#[must_use]
pub fn channel() -> (ChannelSurface, SurfaceReceiver) {
    let (updates, pending_updates) = flume::unbounded();
    let (frames, pending_frames) = flume::bounded(1);
    (
        ChannelSurface {
            updates,
            frames,
            stale_frames: pending_frames.clone(),
            connected: true,
        },
        SurfaceReceiver {
            updates: pending_updates,
            frames: pending_frames,
        },
    )
}

/// Surface half of [`channel`]; hand it to the world.
///
/// Requests are fire-and-forget. Once the receiving window has gone away
/// further requests are dropped.
#[derive(Debug)]
pub struct ChannelSurface {
    updates: Sender<SurfaceUpdate>,
    frames: Sender<Vec<TurtlePose>>,
    stale_frames: Receiver<Vec<TurtlePose>>,
    connected: bool,
}

impl ChannelSurface {
    /// Whether the receiving side was still listening at the last request.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    fn disconnect(&mut self) {
        log::debug!("window closed; dropping further drawing requests");
        self.connected = false;
    }

    fn send(&mut self, update: SurfaceUpdate) {
        if !self.connected {
            return;
        }

        if self.updates.send(update).is_err() {
            self.disconnect();
        }
    }

    fn send_frame(&mut self, poses: Vec<TurtlePose>) {
        if !self.connected {
            return;
        }

        // Our own `stale_frames` handle keeps the frame channel open.
        if self.frames.receiver_count() <= 1 {
            self.disconnect();
            return;
        }

        let mut poses = poses;
        loop {
            match self.frames.try_send(poses) {
                Ok(()) => return,
                Err(TrySendError::Full(rejected)) => {
                    let _ = self.stale_frames.try_recv();
                    poses = rejected;
                }
                Err(TrySendError::Disconnected(_)) => {
                    self.disconnect();
                    return;
                }
            }
        }
    }
}

impl RenderSurface for ChannelSurface {
    fn open(&mut self, title: &str, dimensions: Dimensions) {
        self.send(SurfaceUpdate::Open {
            title: title.to_owned(),
            dimensions,
        });
    }

    fn clear(&mut self, color: Rgb) {
        self.send(SurfaceUpdate::Clear(color));
    }

    fn draw_line(&mut self, from: Point, to: Point, color: Rgb) {
        self.send(SurfaceUpdate::Line { from, to, color });
    }

    fn present(&mut self, turtles: &[TurtlePose]) {
        self.send_frame(turtles.to_vec());
    }
}

/// Receiving half of [`channel`]; owned by the window backend.
#[derive(Debug)]
pub struct SurfaceReceiver {
    updates: Receiver<SurfaceUpdate>,
    frames: Receiver<Vec<TurtlePose>>,
}

impl SurfaceReceiver {
    /// Applies every pending update to `replica` without blocking.
    ///
    /// Image updates are applied in order, followed by the latest frame
    /// request if one is waiting. Returns the number of updates applied.
    pub fn pump(&self, replica: &mut SurfaceReplica) -> usize {
        let mut applied = 0;
        loop {
            match self.updates.try_recv() {
                Ok(update) => {
                    replica.apply(update);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    replica.driver_finished = true;
                    break;
                }
            }
        }

        match self.frames.try_recv() {
            Ok(poses) => {
                replica.apply(SurfaceUpdate::Present(poses));
                applied += 1;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => replica.driver_finished = true,
        }
        applied
    }
}

/// Window-side copy of everything a world has drawn.
#[derive(Clone, Debug, Default)]
pub struct SurfaceReplica {
    title: Option<String>,
    trails: Option<Raster>,
    poses: Vec<TurtlePose>,
    trails_dirty: bool,
    frames_requested: u64,
    driver_finished: bool,
}

impl SurfaceReplica {
    /// Creates an empty replica.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a single update.
    pub fn apply(&mut self, update: SurfaceUpdate) {
        match update {
            SurfaceUpdate::Open { title, dimensions } => {
                self.title = Some(title);
                self.trails = Some(Raster::new(dimensions, BACKGROUND));
                self.poses.clear();
                self.trails_dirty = true;
            }
            SurfaceUpdate::Clear(color) => {
                if let Some(trails) = self.trails.as_mut() {
                    trails.fill(color);
                    self.trails_dirty = true;
                }
            }
            SurfaceUpdate::Line { from, to, color } => {
                if let Some(trails) = self.trails.as_mut() {
                    trails.draw_line(from, to, color);
                    self.trails_dirty = true;
                }
            }
            SurfaceUpdate::Present(poses) => {
                self.poses = poses;
                self.frames_requested = self.frames_requested.saturating_add(1);
            }
        }
    }

    /// Title of the world feeding the replica.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Persistent trail image, once the world has opened.
    #[must_use]
    pub fn trails(&self) -> Option<&Raster> {
        self.trails.as_ref()
    }

    /// Poses from the most recent frame request.
    #[must_use]
    pub fn poses(&self) -> &[TurtlePose] {
        &self.poses
    }

    /// Number of frame requests received.
    #[must_use]
    pub fn frames_requested(&self) -> u64 {
        self.frames_requested
    }

    /// Whether the world side has dropped its surface.
    #[must_use]
    pub fn driver_finished(&self) -> bool {
        self.driver_finished
    }

    /// Returns whether the trail image changed since the last call and resets the flag.
    pub fn take_trails_dirty(&mut self) -> bool {
        std::mem::take(&mut self.trails_dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(x: i32) -> TurtlePose {
        TurtlePose {
            position: Point::new(x, 0),
            heading: 0,
            size: 1,
            color: Rgb::BLACK,
            limb_color: Rgb::BLACK.brighter(),
            visible: true,
        }
    }

    #[test]
    fn pending_presents_coalesce_into_the_latest_poses() {
        let (mut surface, receiver) = channel();
        let mut replica = SurfaceReplica::new();

        surface.open("World", Dimensions::new(8, 8).expect("valid"));
        surface.present(&[pose(1)]);
        surface.present(&[pose(2), pose(3)]);

        assert_eq!(receiver.pump(&mut replica), 2);
        assert_eq!(replica.title(), Some("World"));
        assert_eq!(replica.poses(), &[pose(2), pose(3)]);
        assert_eq!(replica.frames_requested(), 1);
        assert!(!replica.driver_finished());
    }

    #[test]
    fn lines_are_replayed_into_the_trail_image() {
        let (mut surface, receiver) = channel();
        let mut replica = SurfaceReplica::new();

        surface.open("World", Dimensions::new(8, 8).expect("valid"));
        let _ = receiver.pump(&mut replica);
        assert!(replica.take_trails_dirty());
        assert!(!replica.take_trails_dirty());

        surface.draw_line(Point::new(0, 3), Point::new(7, 3), Rgb::BLACK);
        let _ = receiver.pump(&mut replica);

        assert!(replica.take_trails_dirty());
        let trails = replica.trails().expect("opened");
        assert_eq!(trails.pixel(4, 3), Some(Rgb::BLACK));
    }

    #[test]
    fn lines_are_never_coalesced() {
        let (mut surface, receiver) = channel();
        let mut replica = SurfaceReplica::new();

        surface.open("World", Dimensions::new(16, 16).expect("valid"));
        for row in 0..16 {
            surface.draw_line(Point::new(0, row), Point::new(15, row), Rgb::BLACK);
            surface.present(&[pose(row)]);
        }

        assert_eq!(receiver.pump(&mut replica), 18);
        assert_eq!(replica.poses(), &[pose(15)]);
        let trails = replica.trails().expect("opened");
        assert!(trails.pixels().iter().all(|pixel| *pixel == Rgb::BLACK));
    }

    #[test]
    fn updates_before_open_are_ignored() {
        let mut replica = SurfaceReplica::new();
        replica.apply(SurfaceUpdate::Line {
            from: Point::new(0, 0),
            to: Point::new(1, 1),
            color: Rgb::BLACK,
        });

        assert!(replica.trails().is_none());
        assert!(!replica.take_trails_dirty());
    }

    #[test]
    fn dropping_either_side_is_tolerated() {
        let (mut surface, receiver) = channel();
        drop(receiver);
        surface.present(&[]);

        assert!(!surface.is_connected());

        let (mut surface, receiver) = channel();
        drop(receiver);
        surface.draw_line(Point::new(0, 0), Point::new(1, 1), Rgb::BLACK);

        assert!(!surface.is_connected());

        let (surface, receiver) = channel();
        drop(surface);
        let mut replica = SurfaceReplica::new();

        assert_eq!(receiver.pump(&mut replica), 0);
        assert!(replica.driver_finished());
    }
}
