//! The particle buffer: one record per particle, stored as parallel arrays.

use crate::{ParticleColor, ShapeGenerator, ShapeKind};
use glam::Vec3;
use rand::Rng;

/// All point attributes for one rendered shape instance.
///
/// Length is fixed at creation; changing the particle count or the shape
/// means building a new buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleBuffer {
    pub(crate) positions: Vec<Vec3>,
    pub(crate) velocities: Vec<Vec3>,
    pub(crate) colors: Vec<[f32; 3]>,
    pub(crate) phases: Vec<f32>,
}

impl ParticleBuffer {
    /// Sample `count` particles of `shape`.
    pub fn generate<R: Rng>(
        shape: ShapeKind,
        count: usize,
        color: ParticleColor,
        generator: &mut ShapeGenerator<R>,
    ) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut velocities = Vec::with_capacity(count);
        let mut phases = Vec::with_capacity(count);

        for i in 0..count {
            positions.push(generator.generate(shape, i, count));
            velocities.push(generator.initial_velocity());
            phases.push(generator.phase());
        }

        Self {
            positions,
            velocities,
            colors: vec![color.to_array(); count],
            phases,
        }
    }

    /// Number of particles
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the buffer holds no particles
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Particle positions in cloud space
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Particle velocities (integrated for fireworks only)
    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    /// Per-particle RGB colors
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// Decorative phase angles
    pub fn phases(&self) -> &[f32] {
        &self.phases
    }

    /// Mutable positions, for callers that script the cloud directly
    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    /// Mutable velocities
    pub fn velocities_mut(&mut self) -> &mut [Vec3] {
        &mut self.velocities
    }

    /// Positions as a flat `[x0, y0, z0, x1, ...]` slice of 3·N floats
    pub fn position_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Colors as a flat `[r0, g0, b0, r1, ...]` slice of 3·N floats
    pub fn color_data(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Overwrite every particle's color, leaving positions untouched.
    pub fn recolor(&mut self, color: ParticleColor) {
        let rgb = color.to_array();
        self.colors.iter_mut().for_each(|c| *c = rgb);
    }

    /// Whether every position is finite
    pub fn is_finite(&self) -> bool {
        self.positions.iter().all(|p| p.is_finite())
    }

    /// Smallest axis-aligned box containing every position
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_fills_every_attribute() {
        let mut gen = ShapeGenerator::seeded(5);
        let buffer = ParticleBuffer::generate(
            ShapeKind::Star,
            250,
            ParticleColor::default(),
            &mut gen,
        );
        assert_eq!(buffer.len(), 250);
        assert_eq!(buffer.velocities().len(), 250);
        assert_eq!(buffer.phases().len(), 250);
        assert_eq!(buffer.color_data().len(), 3 * 250);
        assert_eq!(buffer.position_data().len(), 3 * 250);
        assert!(buffer.is_finite());
    }

    #[test]
    fn test_initial_velocities_are_small() {
        let mut gen = ShapeGenerator::seeded(9);
        let buffer = ParticleBuffer::generate(
            ShapeKind::Cube,
            500,
            ParticleColor::default(),
            &mut gen,
        );
        for v in buffer.velocities() {
            assert!(v.abs().max_element() <= 0.05);
        }
    }

    #[test]
    fn test_recolor_keeps_positions() {
        let mut gen = ShapeGenerator::seeded(5);
        let mut buffer = ParticleBuffer::generate(
            ShapeKind::Heart,
            64,
            ParticleColor::default(),
            &mut gen,
        );
        let before = buffer.positions().to_vec();
        let red = ParticleColor::from_hex(0xff0000);
        buffer.recolor(red);

        assert_eq!(buffer.positions(), before.as_slice());
        assert!(buffer.colors().iter().all(|c| *c == [1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_flat_position_layout() {
        let mut gen = ShapeGenerator::seeded(2);
        let buffer = ParticleBuffer::generate(
            ShapeKind::Earth,
            3,
            ParticleColor::default(),
            &mut gen,
        );
        let flat = buffer.position_data();
        assert_eq!(flat[3], buffer.positions()[1].x);
        assert_eq!(flat[8], buffer.positions()[2].z);
    }

    #[test]
    fn test_empty_buffer() {
        let mut gen = ShapeGenerator::seeded(2);
        let buffer =
            ParticleBuffer::generate(ShapeKind::Star, 0, ParticleColor::default(), &mut gen);
        assert!(buffer.is_empty());
        assert!(buffer.bounds().is_none());
    }
}
