//! Driver programs that put a world through its paces.

use std::{io::Write, thread, time::Duration};

use anyhow::{Context, Result};
use rand::Rng;
use turtle_world::{Turtle, World};

/// Turtles the `art` program keeps alive at most.
const ART_CAPACITY: usize = 255;

/// Iterations of the spiral phase of the `sample` program.
const SPIRAL_STEPS: u32 = 100_000;

/// Iterations of the wandering phase of the `sample` program.
const WANDER_STEPS: u32 = 100;

/// Delays inserted between commands so a human can follow along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Pacing {
    phase: Duration,
    wander_step: Duration,
    frame: Duration,
}

impl Pacing {
    /// Delays suitable for watching a window, with `phase` between program phases.
    pub(crate) const fn realtime(phase: Duration) -> Self {
        Self {
            phase,
            wander_step: Duration::from_millis(200),
            frame: Duration::from_millis(1000 / 60),
        }
    }

    /// No delays at all.
    pub(crate) const fn none() -> Self {
        Self {
            phase: Duration::ZERO,
            wander_step: Duration::ZERO,
            frame: Duration::ZERO,
        }
    }

    fn pause(duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

/// The introductory tour: a short walk, a chase, a spiral and a random stroll.
///
/// Returns the turtle that did most of the work.
pub(crate) fn run_sample<R, W>(
    world: &World,
    rng: &mut R,
    pacing: Pacing,
    out: &mut W,
) -> Result<Turtle>
where
    R: Rng,
    W: Write,
{
    let walker = Turtle::new(world);
    let target = Turtle::at(world, 100, 120);

    walker.forward(20);
    for _ in 0..3 {
        walker.turn(45);
        walker.forward(20);
    }
    Pacing::pause(pacing.phase);

    walker.turn(45);
    walker.forward(20);
    target.forward(40);
    Pacing::pause(pacing.phase);

    walker.turn_to(target.x(), target.y());
    walker.forward(120);
    Pacing::pause(pacing.phase);

    walker.forward(200);
    for _ in 0..SPIRAL_STEPS {
        walker.turn(15);
        walker.forward(10);
    }
    log::debug!("spiral finished at {}", walker);
    Pacing::pause(pacing.phase);

    for step in 0..WANDER_STEPS {
        if step % 20 == 19 {
            if walker.is_path_enabled() {
                walker.disable_path();
            } else {
                walker.enable_path();
            }
        }
        walker.turn(rng.gen_range(0..100) - 50);
        walker.forward(3 + rng.gen_range(0..10));
        Pacing::pause(pacing.wander_step);
    }

    writeln!(out, "{walker}").context("failed to write sample output")?;
    writeln!(out, "This is a sample program!").context("failed to write sample output")?;
    Ok(walker)
}

/// Outcome of an `art` run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ArtSummary {
    pub(crate) spawned: usize,
    pub(crate) peak: usize,
}

/// Random swarm: spawns pairs of turtles, retires one per frame and lets the rest wander.
///
/// Every turtle is removed from the world before returning.
pub(crate) fn run_art<R>(world: &World, rng: &mut R, frames: u32, pacing: Pacing) -> ArtSummary
where
    R: Rng,
{
    let mut swarm: Vec<Turtle> = Vec::with_capacity(ART_CAPACITY + 1);
    let mut summary = ArtSummary::default();

    for _ in 0..frames {
        if swarm.len() < ART_CAPACITY {
            for _ in 0..2 {
                let (x, y) = random_position(world, rng);
                swarm.push(Turtle::at(world, x, y));
                summary.spawned += 1;
            }
            summary.peak = summary.peak.max(swarm.len());
        }

        if !swarm.is_empty() {
            let retired = swarm.swap_remove(rng.gen_range(0..swarm.len()));
            world.remove(&retired);
        }

        for turtle in &swarm {
            turtle.turn(rng.gen_range(0..60) - 30);
            turtle.forward(rng.gen_range(0..10));
        }

        Pacing::pause(pacing.frame);
    }

    for turtle in swarm.drain(..) {
        world.remove(&turtle);
    }

    log::info!(
        "art finished: {} turtles spawned, at most {} alive",
        summary.spawned,
        summary.peak
    );
    summary
}

fn random_position<R: Rng>(world: &World, rng: &mut R) -> (i32, i32) {
    let x = rng.gen_range(0..world.width());
    let y = rng.gen_range(0..world.height());
    (
        i32::try_from(x).unwrap_or(i32::MAX),
        i32::try_from(y).unwrap_or(i32::MAX),
    )
}
