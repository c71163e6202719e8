//! Per-frame particle animation and cloud transform.

use crate::{DistanceSignal, ParticleBuffer, ShapeGenerator, ShapeKind, UpdateParams};
use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::Rng;
use std::f32::consts::TAU;
use tracing::trace;

/// Longest stretch, in reference frames, a single tick may simulate.
pub const MAX_FRAMES_PER_TICK: f32 = 4.0;

/// Smallest scale ever reported to the renderer.
pub const MIN_SCALE: f32 = 0.05;

/// Uniform transform the renderer applies to the whole cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransform {
    /// Scale after smoothing and manual offset
    pub scale: f32,
    /// Scale the distance signal asks for
    pub target_scale: f32,
    /// Accumulated rotation per axis, radians in [0, 2π)
    pub rotation: Vec3,
}

impl FrameTransform {
    /// Cloud-to-world matrix
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_euler(
                EulerRot::XYZ,
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            ),
            Vec3::ZERO,
        )
    }
}

impl Default for FrameTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            target_scale: 1.0,
            rotation: Vec3::ZERO,
        }
    }
}

/// Advances the particle buffer once per display refresh.
#[derive(Debug, Clone)]
pub struct FrameUpdater {
    params: UpdateParams,
    rotation: Vec3,
    scale: Option<f32>,
}

impl FrameUpdater {
    /// Create an updater at rest
    pub fn new(params: UpdateParams) -> Self {
        Self {
            params,
            rotation: Vec3::ZERO,
            scale: None,
        }
    }

    /// Animation constants in use
    pub fn params(&self) -> &UpdateParams {
        &self.params
    }

    /// Scale requested by `distance`, before smoothing.
    ///
    /// Non-decreasing in the distance for any non-negative spread factor.
    pub fn target_scale(&self, distance: DistanceSignal) -> f32 {
        self.params.base_scale + distance.value() * self.params.spread_factor
    }

    /// Convert elapsed seconds into reference frames.
    pub fn frames_for(&self, dt: f32) -> f32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0.0;
        }
        (dt * self.params.reference_fps).min(MAX_FRAMES_PER_TICK)
    }

    /// Forget rotation and smoothing history
    pub fn reset(&mut self) {
        self.rotation = Vec3::ZERO;
        self.scale = None;
    }

    /// Animate `buffer` by `dt` seconds and report the cloud transform.
    pub fn tick<R: Rng>(
        &mut self,
        buffer: &mut ParticleBuffer,
        shape: ShapeKind,
        distance: DistanceSignal,
        dt: f32,
        generator: &mut ShapeGenerator<R>,
    ) -> FrameTransform {
        let frames = self.frames_for(dt);

        if shape.is_ballistic() {
            self.integrate_ballistic(buffer, frames, generator);
        } else {
            self.drift(buffer, frames, generator);
        }

        // Phases are stored wrapped; only the angle is ever read.
        let phase_step = self.params.phase_step * frames;
        for phase in &mut buffer.phases {
            *phase = (*phase + phase_step).rem_euclid(TAU);
        }

        self.rotation = (self.rotation + self.params.rotation_step * frames)
            .map(|angle| angle.rem_euclid(TAU));

        let target_scale = self.target_scale(distance);
        let scale = match self.scale {
            Some(current) => {
                let smoothing = self.params.scale_smoothing.clamp(0.0, 1.0);
                // Closing `smoothing` of the gap per reference frame compounds over `frames`.
                let blend = 1.0 - (1.0 - smoothing).powf(frames);
                current + (target_scale - current) * blend
            }
            None => target_scale,
        };
        self.scale = Some(scale);

        FrameTransform {
            scale,
            target_scale,
            rotation: self.rotation,
        }
    }

    fn integrate_ballistic<R: Rng>(
        &self,
        buffer: &mut ParticleBuffer,
        frames: f32,
        generator: &mut ShapeGenerator<R>,
    ) {
        let count = buffer.len();
        let gravity = Vec3::new(0.0, self.params.gravity * frames, 0.0);
        let mut respawned = 0usize;

        for (i, (position, velocity)) in buffer
            .positions
            .iter_mut()
            .zip(buffer.velocities.iter_mut())
            .enumerate()
        {
            *position += *velocity * frames;
            *velocity -= gravity;

            if position.y < self.params.respawn_floor {
                *position = generator.generate(ShapeKind::Fireworks, i, count);
                *velocity = generator.respawn_velocity();
                respawned += 1;
            }
        }

        if respawned > 0 {
            trace!("Relaunched {} fireworks particles", respawned);
        }
    }

    fn drift<R: Rng>(
        &self,
        buffer: &mut ParticleBuffer,
        frames: f32,
        generator: &mut ShapeGenerator<R>,
    ) {
        let amplitude = self.params.jitter * frames;
        if amplitude <= 0.0 {
            return;
        }
        for position in &mut buffer.positions {
            *position += generator.jitter(amplitude);
        }
    }
}

impl Default for FrameUpdater {
    fn default() -> Self {
        Self::new(UpdateParams::default())
    }
}
