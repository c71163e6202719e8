//! Scene controller
//!
//! Owns every piece of mutable scene state: the selected shape and color, the
//! particle buffer, the random source, the frame updater and the current
//! distance signal. UI controls and distance sources talk to this type only.

use crate::config::MAX_PARTICLE_COUNT;
use crate::update::MIN_SCALE;
use crate::{
    DistanceSignal, FrameTransform, FrameUpdater, ParticleBuffer, ParticleColor,
    ParticleRenderer, PointStyle, RenderFrame, Result, SceneConfig, ShapeGenerator, ShapeKind,
};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, warn};

/// Step applied by one manual scale nudge
pub const SCALE_NUDGE: f32 = 0.1;

/// Single owner of the particle scene.
pub struct ParticleController<R = StdRng> {
    shape: ShapeKind,
    color: ParticleColor,
    count: usize,
    buffer: ParticleBuffer,
    generator: ShapeGenerator<R>,
    updater: FrameUpdater,
    distance: DistanceSignal,
    scale_offset: f32,
    point_style: PointStyle,
    transform: FrameTransform,
    frame_index: u64,
}

impl ParticleController<StdRng> {
    /// Build a controller from configuration, seeding from `config.seed` when set.
    pub fn new(config: &SceneConfig) -> Self {
        Self::with_generator(config, ShapeGenerator::from_seed_option(config.seed))
    }
}

impl<R: Rng> ParticleController<R> {
    /// Build a controller around an explicit generator
    pub fn with_generator(config: &SceneConfig, mut generator: ShapeGenerator<R>) -> Self {
        let count = clamp_count(config.particle_count);
        let buffer = ParticleBuffer::generate(config.shape, count, config.color, &mut generator);

        info!(
            "Particle scene initialized: {} x {} particles, color {}",
            config.shape, count, config.color
        );

        Self {
            shape: config.shape,
            color: config.color,
            count,
            buffer,
            generator,
            updater: FrameUpdater::new(config.update.clone()),
            distance: DistanceSignal::default(),
            scale_offset: 0.0,
            point_style: config.point_style,
            transform: FrameTransform::default(),
            frame_index: 0,
        }
    }

    /// Current shape
    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    /// Current shared color
    pub fn color(&self) -> ParticleColor {
        self.color
    }

    /// Current particle count
    pub fn count(&self) -> usize {
        self.count
    }

    /// Current distance signal
    pub fn distance(&self) -> DistanceSignal {
        self.distance
    }

    /// Particle buffer as last updated
    pub fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }

    /// Transform reported by the most recent tick
    pub fn transform(&self) -> FrameTransform {
        self.transform
    }

    /// Number of ticks run so far
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Select a shape and resample the whole buffer.
    ///
    /// Selecting the current shape again still resamples.
    pub fn set_shape(&mut self, shape: ShapeKind) {
        self.shape = shape;
        self.regenerate();
    }

    /// Select a shape by UI identifier, falling back to the default shape.
    pub fn set_shape_by_name(&mut self, name: &str) -> ShapeKind {
        let shape = name.parse().unwrap_or_else(|e| {
            warn!("{}, using {}", e, ShapeKind::default());
            ShapeKind::default()
        });
        self.set_shape(shape);
        shape
    }

    /// Recolor every particle in place.
    pub fn set_color(&mut self, color: ParticleColor) {
        self.color = color;
        self.buffer.recolor(color);
        debug!("Particle color set to {}", color);
    }

    /// Recolor from a `#rrggbb` string; invalid input leaves the color unchanged.
    pub fn set_color_hex(&mut self, hex: &str) -> Result<()> {
        let color = hex.parse()?;
        self.set_color(color);
        Ok(())
    }

    /// Change the particle count, reallocating the buffer.
    pub fn set_count(&mut self, count: usize) {
        let clamped = clamp_count(count);
        if clamped != count {
            warn!(
                "Particle count {} exceeds limit, using {}",
                count, MAX_PARTICLE_COUNT
            );
        }
        self.count = clamped;
        self.regenerate();
    }

    /// Store a new distance signal; clamped into [0, 1].
    pub fn set_distance(&mut self, distance: f32) {
        self.distance = DistanceSignal::new(distance);
    }

    /// Nudge the reported scale up or down on top of the distance-driven scale.
    pub fn adjust_scale(&mut self, delta: f32) {
        if delta.is_finite() {
            self.scale_offset += delta;
            debug!("Manual scale offset: {:.2}", self.scale_offset);
        }
    }

    /// Drop any manual scale offset
    pub fn reset_scale(&mut self) {
        self.scale_offset = 0.0;
    }

    /// Advance the scene by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> FrameTransform {
        let mut transform = self.updater.tick(
            &mut self.buffer,
            self.shape,
            self.distance,
            dt,
            &mut self.generator,
        );
        transform.scale = (transform.scale + self.scale_offset).max(MIN_SCALE);

        self.transform = transform;
        self.frame_index += 1;
        transform
    }

    /// Snapshot of the current frame for a renderer
    pub fn render_frame(&self) -> RenderFrame<'_> {
        RenderFrame {
            frame_index: self.frame_index,
            positions: self.buffer.positions(),
            colors: self.buffer.colors(),
            transform: self.transform,
            style: self.point_style,
        }
    }

    /// Hand the current frame to `renderer`
    pub fn present(&self, renderer: &mut dyn ParticleRenderer) {
        renderer.present(&self.render_frame());
    }

    fn regenerate(&mut self) {
        self.buffer =
            ParticleBuffer::generate(self.shape, self.count, self.color, &mut self.generator);
        info!("Regenerated {} particles as {}", self.count, self.shape);
    }
}

fn clamp_count(count: usize) -> usize {
    count.min(MAX_PARTICLE_COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ParticleController {
        let config = SceneConfig {
            particle_count: 300,
            seed: Some(42),
            ..Default::default()
        };
        ParticleController::new(&config)
    }

    #[test]
    fn test_initial_state() {
        let c = controller();
        assert_eq!(c.shape(), ShapeKind::ChristmasTree);
        assert_eq!(c.count(), 300);
        assert_eq!(c.buffer().len(), 300);
        assert_eq!(c.distance().value(), 0.5);
        assert_eq!(c.frame_index(), 0);
    }

    #[test]
    fn test_unknown_shape_falls_back() {
        let mut c = controller();
        c.set_shape(ShapeKind::Star);
        let chosen = c.set_shape_by_name("default");
        assert_eq!(chosen, ShapeKind::ChristmasTree);
        assert_eq!(c.shape(), ShapeKind::ChristmasTree);
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        let mut c = controller();
        let before = c.color();
        assert!(c.set_color_hex("not-a-color").is_err());
        assert_eq!(c.color(), before);
        c.set_color_hex("#ff0000").unwrap();
        assert_eq!(c.buffer().colors()[0], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_manual_scale_nudges() {
        let mut c = controller();
        c.set_distance(0.0);
        assert_eq!(c.tick(1.0 / 60.0).scale, 0.5);

        c.adjust_scale(SCALE_NUDGE);
        assert!((c.tick(1.0 / 60.0).scale - 0.6).abs() < 1e-6);

        c.adjust_scale(-10.0);
        assert_eq!(c.tick(1.0 / 60.0).scale, MIN_SCALE);

        c.reset_scale();
        assert_eq!(c.tick(1.0 / 60.0).scale, 0.5);
    }

    #[test]
    fn test_count_is_capped() {
        let mut c = controller();
        c.set_count(MAX_PARTICLE_COUNT + 1);
        assert_eq!(c.count(), MAX_PARTICLE_COUNT);
        assert_eq!(c.buffer().len(), MAX_PARTICLE_COUNT);
    }
}
