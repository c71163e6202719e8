//! Scene configuration
//!
//! Every field has a default so partial configuration files stay valid.

use crate::{ParticleColor, PointStyle, ShapeKind};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Upper bound on the particle count accepted from configuration or UI.
pub const MAX_PARTICLE_COUNT: usize = 200_000;

/// Initial scene state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Shape sampled at startup
    pub shape: ShapeKind,
    /// Shared particle color
    pub color: ParticleColor,
    /// Number of particles
    pub particle_count: usize,
    /// Seed for a reproducible random source; entropy when absent
    pub seed: Option<u64>,
    /// Per-frame animation constants
    pub update: UpdateParams,
    /// Presentation hints passed through to the renderer
    pub point_style: PointStyle,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            shape: ShapeKind::default(),
            color: ParticleColor::default(),
            particle_count: 1000,
            seed: None,
            update: UpdateParams::default(),
            point_style: PointStyle::default(),
        }
    }
}

/// Per-frame animation constants, each expressed per reference frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateParams {
    /// Downward acceleration applied to fireworks velocity
    pub gravity: f32,
    /// Height below which a fireworks particle is relaunched
    pub respawn_floor: f32,
    /// Half-width of the ambient per-axis drift for non-ballistic shapes
    pub jitter: f32,
    /// Phase advance per particle
    pub phase_step: f32,
    /// Rigid-body rotation of the whole cloud (radians per axis)
    pub rotation_step: Vec3,
    /// Scale at zero distance
    pub base_scale: f32,
    /// Extra scale at full distance
    pub spread_factor: f32,
    /// Fraction of the gap to the target scale closed each frame (1 = immediate)
    pub scale_smoothing: f32,
    /// Frame rate the per-frame constants were tuned for
    pub reference_fps: f32,
}

impl Default for UpdateParams {
    fn default() -> Self {
        Self {
            gravity: 0.01,
            respawn_floor: -5.0,
            jitter: 0.005,
            phase_step: 0.01,
            rotation_step: Vec3::new(0.0, 0.005, 0.0),
            base_scale: 0.5,
            spread_factor: 2.0,
            scale_smoothing: 1.0,
            reference_fps: 60.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_defaults() {
        let config = SceneConfig::default();
        assert_eq!(config.shape, ShapeKind::ChristmasTree);
        assert_eq!(config.particle_count, 1000);
        assert_eq!(config.color.to_hex(), 0x00d4ff);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SceneConfig =
            serde_json::from_str(r##"{ "shape": "heart", "color": "#ff0066" }"##).unwrap();
        assert_eq!(config.shape, ShapeKind::Heart);
        assert_eq!(config.color.to_hex(), 0xff0066);
        assert_eq!(config.particle_count, 1000);
        assert_eq!(config.update, UpdateParams::default());
    }

    #[test]
    fn test_update_params_roundtrip() {
        let params = UpdateParams {
            scale_smoothing: 0.1,
            ..Default::default()
        };
        let json = serde_json::to_string(&params).unwrap();
        let back: UpdateParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params, back);
    }
}
