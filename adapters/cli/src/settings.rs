//! Run configuration assembled from an optional TOML file and command-line flags.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Settings file picked up from the working directory when `--config` is absent.
pub(crate) const DEFAULT_SETTINGS_FILE: &str = "turtle-world.toml";

/// Default number of iterations of the `art` program: one minute at 60 frames per second.
pub(crate) const DEFAULT_FRAMES: u32 = 60 * 60;

/// Default pause between the phases of the `sample` program.
pub(crate) const DEFAULT_PAUSE: Duration = Duration::from_millis(1000);

/// Values read from a settings file. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SettingsFile {
    pub(crate) width: Option<i32>,
    pub(crate) height: Option<i32>,
    pub(crate) seed: Option<u64>,
    pub(crate) frames: Option<u32>,
    pub(crate) pause_ms: Option<u64>,
    pub(crate) headless: Option<bool>,
    pub(crate) vsync: Option<bool>,
    pub(crate) show_fps: Option<bool>,
}

impl SettingsFile {
    /// Parses settings from TOML text.
    pub(crate) fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("settings file is not valid TOML")
    }

    /// Loads the explicit `path`, or the default file when it exists.
    pub(crate) fn discover(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
        };

        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        log::debug!("loaded settings from {}", path.display());
        Self::parse(&text).with_context(|| format!("in {}", path.display()))
    }
}

/// Flags that take precedence over the settings file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) width: Option<i32>,
    pub(crate) height: Option<i32>,
    pub(crate) seed: Option<u64>,
    pub(crate) frames: Option<u32>,
    pub(crate) pause_ms: Option<u64>,
    pub(crate) headless: bool,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
}

/// Fully resolved configuration for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) width: i32,
    pub(crate) height: i32,
    pub(crate) seed: Option<u64>,
    pub(crate) frames: u32,
    pub(crate) pause: Duration,
    pub(crate) headless: bool,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
}

impl Settings {
    /// Layers command-line overrides on top of file values and built-in defaults.
    ///
    /// `default_extent` sizes both axes when neither source names them.
    pub(crate) fn resolve(file: SettingsFile, overrides: Overrides, default_extent: i32) -> Self {
        Self {
            width: overrides.width.or(file.width).unwrap_or(default_extent),
            height: overrides.height.or(file.height).unwrap_or(default_extent),
            seed: overrides.seed.or(file.seed),
            frames: overrides.frames.or(file.frames).unwrap_or(DEFAULT_FRAMES),
            pause: overrides
                .pause_ms
                .or(file.pause_ms)
                .map_or(DEFAULT_PAUSE, Duration::from_millis),
            headless: overrides.headless || file.headless.unwrap_or(false),
            vsync: overrides.vsync || file.vsync.unwrap_or(false),
            show_fps: overrides.show_fps || file.show_fps.unwrap_or(false),
        }
    }
}
