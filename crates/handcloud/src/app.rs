//! Frame loop
//!
//! One thread does everything per frame, in order: poll the distance source,
//! feed the controller, tick, present, then sleep out the rest of the frame
//! budget.

use crate::config::AppConfig;
use crate::renderer::{SnapshotRenderer, StatsRenderer};
use anyhow::{Context, Result};
use handcloud_control::{DistanceRouter, LandmarkTracker, ReplayTracker, SourceKind};
use handcloud_core::{ParticleController, ParticleRenderer, RenderFrame};
use handcloud_vision::{CameraSource, ImageSequenceCamera, SyntheticHandCamera};
use std::fs;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const REFERENCE_DT: f32 = 1.0 / 60.0;

/// Where finished frames go
pub enum Output {
    /// PNG snapshots
    Snapshots(SnapshotRenderer),
    /// Extent logging only
    Stats(StatsRenderer),
}

impl ParticleRenderer for Output {
    fn present(&mut self, frame: &RenderFrame<'_>) {
        match self {
            Self::Snapshots(r) => r.present(frame),
            Self::Stats(r) => r.present(frame),
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport {
    /// Frames simulated
    pub frames: u64,
    /// Distance at the end of the run
    pub final_distance: f32,
    /// Scale at the end of the run
    pub final_scale: f32,
    /// Snapshots written
    pub snapshots: usize,
}

/// The running application
pub struct App {
    controller: ParticleController,
    router: DistanceRouter,
    output: Output,
    fps: f32,
    frames: Option<u64>,
}

impl App {
    /// Build the scene, the distance source and the output from configuration.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let controller = ParticleController::new(&config.scene);

        let mut router = DistanceRouter::new(config.source.fallback());

        let camera = match (config.source.kind, &config.run.input) {
            (SourceKind::Contour, Some(path)) => Some(Box::new(
                ImageSequenceCamera::new(path, f64::from(config.run.fps.max(1.0))),
            ) as Box<dyn CameraSource>),
            (SourceKind::Contour, None) => {
                info!("No input frames given, using the synthetic camera");
                Some(Box::new(SyntheticHandCamera::new()) as Box<dyn CameraSource>)
            }
            _ => None,
        };
        let tracker = config.run.landmarks.as_ref().map(|path| {
            Box::new(ReplayTracker::from_file(path, f64::from(config.run.fps)))
                as Box<dyn LandmarkTracker>
        });

        // A source that cannot start leaves the router on manual control.
        match config.source.build_source(camera, tracker) {
            Ok(source) => {
                if let Err(e) = router.activate(source) {
                    debug!("Source start error: {:?}", e);
                }
            }
            Err(e) => warn!(
                "{} source unavailable, using manual control: {}",
                config.source.kind, e
            ),
        }
        router.set_manual(config.run.distance);
        info!("Distance source: {}", router.status());

        let output = match &config.run.snapshot_dir {
            Some(dir) => {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create snapshot directory {}", dir.display()))?;
                info!("Writing snapshots to {}", dir.display());
                Output::Snapshots(SnapshotRenderer::new(
                    dir,
                    config.run.snapshot_every,
                    config.run.snapshot_width,
                    config.run.snapshot_height,
                ))
            }
            None => Output::Stats(StatsRenderer::new(config.run.snapshot_every)),
        };

        Ok(Self {
            controller,
            router,
            output,
            fps: config.run.fps.max(0.0),
            frames: config.run.frames,
        })
    }

    /// Advance one frame of `dt` seconds
    pub fn step(&mut self, dt: f32) {
        let distance = self.router.poll();
        self.controller.set_distance(distance.value());
        self.controller.tick(dt);
        self.controller.present(&mut self.output);
    }

    /// Run until the frame limit, or forever when there is none.
    pub fn run(&mut self) -> RunReport {
        let budget = (self.fps > 0.0).then(|| Duration::from_secs_f32(1.0 / self.fps));
        let dt = budget.map_or(REFERENCE_DT, |b| b.as_secs_f32());
        info!(
            "Running {} at {}",
            self.frames
                .map_or_else(|| "until interrupted".to_string(), |n| format!("{n} frames")),
            budget.map_or_else(|| "full speed".to_string(), |_| format!("{} fps", self.fps))
        );

        let mut frame = 0u64;
        while self.frames.map_or(true, |limit| frame < limit) {
            let started = Instant::now();
            self.step(dt);
            frame += 1;

            if let Some(budget) = budget {
                let elapsed = started.elapsed();
                if elapsed < budget {
                    std::thread::sleep(budget - elapsed);
                }
            }
        }

        self.router.stop();
        self.report(frame)
    }

    /// The scene controller
    pub fn controller(&self) -> &ParticleController {
        &self.controller
    }

    /// The distance router
    pub fn router(&self) -> &DistanceRouter {
        &self.router
    }

    fn report(&self, frames: u64) -> RunReport {
        let snapshots = match &self.output {
            Output::Snapshots(r) => {
                if r.failures() > 0 {
                    warn!("{} snapshots failed to save", r.failures());
                }
                r.written().len()
            }
            Output::Stats(r) => {
                r.summarize();
                0
            }
        };

        RunReport {
            frames,
            final_distance: self.controller.distance().value(),
            final_scale: self.controller.transform().scale,
            snapshots,
        }
    }
}
