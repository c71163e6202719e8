//! Procedural point sampling for every particle shape.
//!
//! Each shape is a pure function of the injected random source. No state is
//! shared between calls except the random source's own cursor, so a seeded
//! [`ShapeGenerator`] reproduces the same cloud.

use crate::CoreError;
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

/// Explosion radius of the fireworks shape.
pub const FIREWORKS_SPEED: f32 = 5.0;
/// Scale applied to the parametric heart curve before the final 0.1 factor.
pub const HEART_SIZE: f32 = 3.0;
/// Outer radius of the star volume.
pub const STAR_RADIUS: f32 = 4.0;
/// Inner radius of the earth shell.
pub const EARTH_RADIUS: f32 = 3.0;
/// Thickness of the earth shell.
pub const EARTH_SHELL: f32 = 0.5;
/// Half the side length of the cube.
pub const CUBE_HALF_EXTENT: f32 = 3.0;

/// The procedural pattern particles are sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    /// Cone tapering to zero at both ends, with occasional sprigs near the base
    #[default]
    #[serde(alias = "christmas", alias = "tree")]
    ChristmasTree,
    /// Dense-cored ball of radius 4
    Star,
    /// A single explosion frame that keeps respawning as a fountain
    Fireworks,
    /// Parametric heart curve extruded by a little depth jitter
    Heart,
    /// Thin spherical shell
    Earth,
    /// Filled cube of side 6
    #[serde(alias = "sphere")]
    Cube,
}

impl ShapeKind {
    /// All shapes in UI order
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::ChristmasTree,
        ShapeKind::Star,
        ShapeKind::Fireworks,
        ShapeKind::Heart,
        ShapeKind::Earth,
        ShapeKind::Cube,
    ];

    /// Canonical identifier, as accepted by [`FromStr`]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChristmasTree => "christmas-tree",
            Self::Star => "star",
            Self::Fireworks => "fireworks",
            Self::Heart => "heart",
            Self::Earth => "earth",
            Self::Cube => "cube",
        }
    }

    /// Whether particles of this shape integrate their velocity every frame.
    pub fn is_ballistic(&self) -> bool {
        matches!(self, Self::Fireworks)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "christmas-tree" | "christmas" | "tree" => Ok(Self::ChristmasTree),
            "star" => Ok(Self::Star),
            "fireworks" => Ok(Self::Fireworks),
            "heart" => Ok(Self::Heart),
            "earth" => Ok(Self::Earth),
            "cube" | "sphere" => Ok(Self::Cube),
            other => Err(CoreError::UnknownShape(other.to_string())),
        }
    }
}

/// Samples particle positions and velocities from an explicit random source.
#[derive(Debug, Clone)]
pub struct ShapeGenerator<R = StdRng> {
    rng: R,
}

impl ShapeGenerator<StdRng> {
    /// Reproducible generator
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Generator seeded from the operating system
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Seeded when a seed is given, entropy-backed otherwise
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> ShapeGenerator<R> {
    /// Wrap an existing random source
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Access the underlying random source
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Sample one position for particle `index` of `count`.
    ///
    /// All current rules are index-independent; the position depends only on
    /// the random draws.
    pub fn generate(&mut self, shape: ShapeKind, _index: usize, _count: usize) -> Vec3 {
        match shape {
            ShapeKind::ChristmasTree => self.christmas_tree(),
            ShapeKind::Star => self.star(),
            ShapeKind::Fireworks => self.fireworks(),
            ShapeKind::Heart => self.heart(),
            ShapeKind::Earth => self.earth(),
            ShapeKind::Cube => self.cube(),
        }
    }

    /// Velocity every particle starts with: each axis in [-0.05, 0.05).
    pub fn initial_velocity(&mut self) -> Vec3 {
        Vec3::new(
            self.centered(0.1),
            self.centered(0.1),
            self.centered(0.1),
        )
    }

    /// Velocity of a fireworks particle relaunched from below the floor.
    pub fn respawn_velocity(&mut self) -> Vec3 {
        let x = self.centered(0.5);
        let y = self.unit() * 0.5;
        let z = self.centered(0.5);
        Vec3::new(x, y, z)
    }

    /// Random decorative phase in [0, 2π)
    pub fn phase(&mut self) -> f32 {
        self.unit() * TAU
    }

    /// Independent per-axis offset, each axis in [-amplitude, amplitude).
    pub fn jitter(&mut self, amplitude: f32) -> Vec3 {
        Vec3::new(
            self.centered(2.0 * amplitude),
            self.centered(2.0 * amplitude),
            self.centered(2.0 * amplitude),
        )
    }

    fn christmas_tree(&mut self) -> Vec3 {
        let t = self.unit();
        // Peaks at 0.75 for t = 0.5, zero at both tips.
        let radius = t * 3.0 * (1.0 - t);
        let theta = self.unit() * TAU;
        let mut y = (t * 12.0 - 6.0) * 0.8;

        if self.unit() > 0.8 && t < 0.3 {
            y += self.unit() * 2.0;
        }

        Vec3::new(radius * theta.cos(), y, radius * theta.sin())
    }

    fn star(&mut self) -> Vec3 {
        // Radius is linear in the draw, not cube-root, which packs the core.
        let r = self.unit() * STAR_RADIUS;
        let theta = self.unit() * TAU;
        let phi = (2.0 * self.unit() - 1.0).acos();
        let mut p = spherical(r, theta, phi);

        if self.unit() > 0.7 {
            let variation = self.centered(0.5);
            p += Vec3::splat(variation);
        }
        p
    }

    fn fireworks(&mut self) -> Vec3 {
        let r = self.unit() * FIREWORKS_SPEED;
        let theta = self.unit() * TAU;
        // Uniform in phi, so the poles are over-sampled.
        let phi = self.unit() * PI;
        spherical(r, theta, phi)
    }

    fn heart(&mut self) -> Vec3 {
        let t = self.unit() * TAU;
        let x = HEART_SIZE * 16.0 * t.sin().powi(3);
        let y = HEART_SIZE
            * (13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos());
        let z = self.centered(2.0);

        let variation = self.centered(0.3);
        Vec3::new(x * 0.1 + variation, y * 0.1 + variation, z)
    }

    fn earth(&mut self) -> Vec3 {
        let r = EARTH_RADIUS + self.unit() * EARTH_SHELL;
        let theta = self.unit() * TAU;
        let phi = (2.0 * self.unit() - 1.0).acos();
        let noise = self.centered(0.2);
        spherical(r, theta, phi) + Vec3::splat(noise)
    }

    fn cube(&mut self) -> Vec3 {
        let side = 2.0 * CUBE_HALF_EXTENT;
        Vec3::new(
            self.centered(side),
            self.centered(side),
            self.centered(side),
        )
    }

    #[inline]
    fn unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Uniform draw in [-width/2, width/2)
    #[inline]
    fn centered(&mut self, width: f32) -> f32 {
        (self.unit() - 0.5) * width
    }
}

#[inline]
fn spherical(r: f32, theta: f32, phi: f32) -> Vec3 {
    let sin_phi = phi.sin();
    Vec3::new(
        r * sin_phi * theta.cos(),
        r * sin_phi * theta.sin(),
        r * phi.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_names_roundtrip() {
        for shape in ShapeKind::ALL {
            assert_eq!(shape.as_str().parse::<ShapeKind>().unwrap(), shape);
        }
    }

    #[test]
    fn test_shape_aliases() {
        assert_eq!("tree".parse::<ShapeKind>().unwrap(), ShapeKind::ChristmasTree);
        assert_eq!("Christmas".parse::<ShapeKind>().unwrap(), ShapeKind::ChristmasTree);
        assert_eq!("sphere".parse::<ShapeKind>().unwrap(), ShapeKind::Cube);
        assert!("pyramid".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn test_default_shape_is_tree() {
        assert_eq!(ShapeKind::default(), ShapeKind::ChristmasTree);
    }

    #[test]
    fn test_seeded_generators_agree() {
        let mut a = ShapeGenerator::seeded(7);
        let mut b = ShapeGenerator::seeded(7);
        for i in 0..32 {
            assert_eq!(
                a.generate(ShapeKind::Heart, i, 32),
                b.generate(ShapeKind::Heart, i, 32)
            );
        }
    }

    #[test]
    fn test_respawn_velocity_points_up() {
        let mut gen = ShapeGenerator::seeded(3);
        for _ in 0..500 {
            let v = gen.respawn_velocity();
            assert!(v.y >= 0.0 && v.y < 0.5);
            assert!(v.x.abs() <= 0.25 && v.z.abs() <= 0.25);
        }
    }

    #[test]
    fn test_zero_jitter_is_zero() {
        let mut gen = ShapeGenerator::seeded(1);
        assert_eq!(gen.jitter(0.0), Vec3::ZERO);
    }

    #[test]
    fn test_fireworks_stay_inside_blast_radius() {
        let mut gen = ShapeGenerator::seeded(11);
        for i in 0..1000 {
            let p = gen.generate(ShapeKind::Fireworks, i, 1000);
            assert!(p.length() <= FIREWORKS_SPEED + 1e-4);
        }
    }
}
