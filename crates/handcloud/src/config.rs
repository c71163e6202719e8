//! Application configuration loaded from TOML
//!
//! ```toml
//! [scene]
//! shape = "heart"
//! particle_count = 5000
//!
//! [source]
//! kind = "contour"
//!
//! [run]
//! fps = 30.0
//! snapshot_dir = "frames"
//! ```

use crate::cli::Args;
use anyhow::{Context, Result};
use handcloud_control::SourceConfig;
use handcloud_core::{LogConfig, ParticleColor, SceneConfig, ShapeKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Frame loop and output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Frames per second; 0 runs unthrottled
    pub fps: f32,
    /// Stop after this many frames
    pub frames: Option<u64>,
    /// Manual distance used when no camera source runs
    pub distance: f32,
    /// Still image or frame directory for the contour source
    pub input: Option<PathBuf>,
    /// Landmark recording for the landmark source
    pub landmarks: Option<PathBuf>,
    /// Where snapshots go; none means stats only
    pub snapshot_dir: Option<PathBuf>,
    /// Snapshot every N frames
    pub snapshot_every: u64,
    /// Snapshot width in pixels
    pub snapshot_width: u32,
    /// Snapshot height in pixels
    pub snapshot_height: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            fps: 60.0,
            frames: None,
            distance: 0.5,
            input: None,
            landmarks: None,
            snapshot_dir: None,
            snapshot_every: 30,
            snapshot_width: 800,
            snapshot_height: 600,
        }
    }
}

/// Whole application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Particle scene
    pub scene: SceneConfig,
    /// Distance source
    pub source: SourceConfig,
    /// Logging
    pub logging: LogConfig,
    /// Frame loop
    pub run: RunConfig,
}

impl AppConfig {
    /// `config.toml` in the user config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("handcloud");
            p.push("config.toml");
            p
        })
    }

    /// Load from `path`; a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Apply command-line overrides. Invalid shape and color values are
    /// reported and replaced or ignored; nothing here fails.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(name) = &args.shape {
            self.scene.shape = name.parse().unwrap_or_else(|e| {
                warn!("{}, using {}", e, ShapeKind::default());
                ShapeKind::default()
            });
        }
        if let Some(hex) = &args.color {
            match hex.parse::<ParticleColor>() {
                Ok(color) => self.scene.color = color,
                Err(e) => warn!("{}, keeping {}", e, self.scene.color),
            }
        }
        if let Some(count) = args.count {
            self.scene.particle_count = count;
        }
        if args.seed.is_some() {
            self.scene.seed = args.seed;
        }
        if let Some(kind) = args.source {
            self.source.kind = kind;
        }
        if let Some(fps) = args.fps {
            self.run.fps = fps.max(0.0);
        }
        if args.frames.is_some() {
            self.run.frames = args.frames;
        }
        if let Some(distance) = args.distance {
            self.run.distance = distance;
        }
        if args.input.is_some() {
            self.run.input = args.input.clone();
        }
        if args.landmarks.is_some() {
            self.run.landmarks = args.landmarks.clone();
        }
        if args.snapshot_dir.is_some() {
            self.run.snapshot_dir = args.snapshot_dir.clone();
        }
        if let Some(every) = args.snapshot_every {
            self.run.snapshot_every = every.max(1);
        }
    }
}
