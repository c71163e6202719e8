//! Renderer contract
//!
//! Presentation lives outside this crate. A renderer receives the particle
//! attributes and one uniform transform per frame and gives nothing back.

use crate::FrameTransform;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Point sprite appearance hints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointStyle {
    /// Sprite size in cloud units
    pub size: f32,
    /// Sprite opacity
    pub opacity: f32,
    /// Additive blending (glow) instead of alpha-over
    pub additive: bool,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            size: 0.1,
            opacity: 0.8,
            additive: true,
        }
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    /// Monotonic frame counter
    pub frame_index: u64,
    /// Particle positions in cloud space
    pub positions: &'a [Vec3],
    /// Particle colors
    pub colors: &'a [[f32; 3]],
    /// Uniform scale and rotation for the whole cloud
    pub transform: FrameTransform,
    /// Sprite appearance
    pub style: PointStyle,
}

/// Receives finished frames
pub trait ParticleRenderer {
    /// Present one frame
    fn present(&mut self, frame: &RenderFrame<'_>);
}
