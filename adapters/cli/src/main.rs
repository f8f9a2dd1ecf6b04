#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Turtle World driver programs.
//!
//! Worlds are single-threaded, while the window toolkit insists on owning
//! the main thread. In windowed mode the driver therefore runs on a spawned
//! thread and talks to the window through a channel surface; headless runs
//! stay on the main thread and skip every pause.

mod programs;
mod settings;

use std::{io, path::PathBuf, thread};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use turtle_world::{TitleAllocator, World};
use turtle_world_core::{
    Dimensions, RandomColors, RenderSurface, TurtlePose, BACKGROUND, DEFAULT_WIDTH,
};
use turtle_world_rendering::{
    Color, HeadlessSurface, Presentation, RenderingBackend, SurfaceReceiver,
};
use turtle_world_rendering_macroquad::MacroquadBackend;

use programs::{run_art, run_sample, Pacing};
use settings::{Overrides, Settings, SettingsFile};

/// Driver program to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum Program {
    /// Two turtles walk, chase, spiral and wander.
    #[default]
    Sample,
    /// A swarm of randomly spawned turtles scribbles over the canvas.
    Art,
}

impl Program {
    /// Width and height used when neither flags nor settings name them.
    const fn default_extent(self) -> i32 {
        match self {
            Self::Sample => DEFAULT_WIDTH,
            Self::Art => 600,
        }
    }
}

/// Command-line arguments for the Turtle World CLI.
#[derive(Debug, Parser)]
#[command(name = "turtle-world", version, about = "Watch turtles draw their paths")]
struct CliArgs {
    /// Driver program to run.
    #[arg(value_enum, default_value_t = Program::Sample)]
    program: Program,

    /// World width in pixels.
    #[arg(long, value_name = "PIXELS", allow_negative_numbers = true)]
    width: Option<i32>,

    /// World height in pixels.
    #[arg(long, value_name = "PIXELS", allow_negative_numbers = true)]
    height: Option<i32>,

    /// Seed for turtle colours and random movement.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of iterations of the `art` program.
    #[arg(long)]
    frames: Option<u32>,

    /// Pause between phases of the `sample` program, in milliseconds.
    #[arg(long = "pause-ms", value_name = "MILLIS")]
    pause_ms: Option<u64>,

    /// Run without a window and without pauses.
    #[arg(long)]
    headless: bool,

    /// Print the final turtle poses as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Settings file; defaults to `turtle-world.toml` when present.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Synchronise the window with the display refresh rate.
    #[arg(long)]
    vsync: bool,

    /// Log the frame rate once per second.
    #[arg(long = "show-fps")]
    show_fps: bool,
}

impl CliArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            width: self.width,
            height: self.height,
            seed: self.seed,
            frames: self.frames,
            pause_ms: self.pause_ms,
            headless: self.headless,
            vsync: self.vsync,
            show_fps: self.show_fps,
        }
    }
}

/// Everything the driver thread needs to run a program.
#[derive(Clone, Debug)]
struct Run {
    program: Program,
    settings: Settings,
    title: String,
    json: bool,
    pacing: Pacing,
}

/// Final state printed by `--json`.
#[derive(Debug, Serialize)]
struct Report {
    title: String,
    width: u32,
    height: u32,
    turtles: Vec<TurtlePose>,
}

impl Report {
    fn from_world(world: &World) -> Self {
        Self {
            title: world.title(),
            width: world.width(),
            height: world.height(),
            turtles: world.poses(),
        }
    }
}

/// Entry point for the Turtle World command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let file = SettingsFile::discover(args.config.as_deref())?;
    let settings = Settings::resolve(file, args.overrides(), args.program.default_extent());
    log::debug!("resolved settings: {settings:?}");

    let title = TitleAllocator::global().allocate();
    let pacing = if settings.headless {
        Pacing::none()
    } else {
        Pacing::realtime(settings.pause)
    };
    let run = Run {
        program: args.program,
        settings,
        title,
        json: args.json,
        pacing,
    };

    if run.settings.headless {
        drive(&run, HeadlessSurface::new())
    } else {
        run_windowed(run)
    }
}

fn run_windowed(run: Run) -> Result<()> {
    let dimensions = Dimensions::new(run.settings.width, run.settings.height)
        .context("cannot open a window for this world")?;
    let presentation = Presentation::new(run.title.clone(), Color::from(BACKGROUND), dimensions);
    let backend = MacroquadBackend::new()
        .with_vsync(run.settings.vsync)
        .with_show_fps(run.settings.show_fps);

    let json = run.json;
    let (surface, receiver) = turtle_world_rendering::channel();
    let driver = thread::Builder::new()
        .name("turtle-driver".to_owned())
        .spawn(move || drive(&run, surface))
        .context("failed to spawn the driver thread")?;

    show(backend, presentation, receiver)?;

    if driver.is_finished() {
        driver
            .join()
            .map_err(|_| anyhow!("driver thread panicked"))??;
    } else if json {
        log::warn!("{}", unfinished_notice(json));
    } else {
        log::info!("{}", unfinished_notice(json));
    }
    Ok(())
}

fn unfinished_notice(json: bool) -> &'static str {
    if json {
        "window closed before the program finished; skipping the --json report"
    } else {
        "window closed before the program finished"
    }
}

fn show(
    backend: MacroquadBackend,
    presentation: Presentation,
    receiver: SurfaceReceiver,
) -> Result<()> {
    backend
        .run(presentation, receiver)
        .context("rendering backend failed")
}

fn drive<S>(run: &Run, surface: S) -> Result<()>
where
    S: RenderSurface + 'static,
{
    let mut rng = match run.settings.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let world = World::builder(run.settings.width, run.settings.height, surface)
        .title(run.title.clone())
        .colors(RandomColors::seeded(rng.gen()))
        .build()
        .context("failed to create the world")?;

    match run.program {
        Program::Sample => {
            let _walker = run_sample(&world, &mut rng, run.pacing, &mut io::stdout().lock())?;
        }
        Program::Art => {
            let _summary = run_art(&world, &mut rng, run.settings.frames, run.pacing);
        }
    }

    if run.json {
        let report = serde_json::to_string_pretty(&Report::from_world(&world))
            .context("failed to serialise the final turtle poses")?;
        println!("{report}");
    }
    Ok(())
}
