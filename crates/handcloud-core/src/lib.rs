//! HandCloud Core - Particle Model and Frame Logic
//!
//! This crate contains the CPU-side particle model for HandCloud, including:
//! - Procedural shape sampling (tree, star, fireworks, heart, earth, cube)
//! - The particle buffer and its per-frame update
//! - The normalized hand distance signal
//! - The scene controller that owns all mutable scene state
//! - Scene and logging configuration

#![warn(missing_docs)]

pub use glam::{Mat4, Quat, Vec3};
use thiserror::Error;

pub mod color;
pub mod config;
pub mod controller;
pub mod distance;
pub mod logging;
pub mod particles;
pub mod render;
pub mod shape;
pub mod update;

// --- Re-exports grouped by category ---

// Shapes & Particles
pub use color::ParticleColor;
pub use particles::ParticleBuffer;
pub use shape::{ShapeGenerator, ShapeKind};

// Frame Update
pub use distance::DistanceSignal;
pub use update::{FrameTransform, FrameUpdater};

// Scene State & Presentation
pub use controller::ParticleController;
pub use render::{ParticleRenderer, PointStyle, RenderFrame};

// Configuration
pub use config::{SceneConfig, UpdateParams};
pub use logging::LogConfig;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// Shape identifier did not match any known shape
    #[error("Unknown shape: {0}")]
    UnknownShape(String),

    /// Color string could not be parsed
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Parameter outside its accepted range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// I/O error (log directory handling)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
