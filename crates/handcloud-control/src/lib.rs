//! HandCloud Control - Distance Sources
//!
//! This crate decides where the hand distance signal comes from:
//! - **Manual**: a slider or command-line value
//! - **Contour**: the bright-region estimator from `handcloud-vision`
//! - **Landmark**: an external hand landmark tracker, or a recorded replay of one
//!
//! Exactly one source is active at a time, owned by the [`DistanceRouter`],
//! which falls back to manual control when a source cannot run.
//!
//! ## Modules
//!
//! - [`source`] - The source trait, manual and contour sources
//! - [`landmark`] - Landmark tracker contract and landmark source
//! - [`replay`] - JSON-lines replay tracker
//! - [`router`] - Active source ownership and status reporting
//! - [`config`] - Source configuration
//! - [`error`] - Error types

#![warn(missing_docs)]

/// Source configuration
pub mod config;
/// Error types
pub mod error;
/// Landmark-based distance
pub mod landmark;
/// Recorded landmark playback
pub mod replay;
/// Active source ownership
pub mod router;
/// Source trait and simple sources
pub mod source;

pub use config::SourceConfig;
pub use error::{ControlError, Result};
pub use landmark::{
    LandmarkConfig, LandmarkFrame, LandmarkMetric, LandmarkPoint, LandmarkSource,
    LandmarkTracker, Normalization,
};
pub use replay::{parse_recording, ReplayTracker};
pub use router::{DistanceRouter, SourceStatus};
pub use source::{ContourSource, DistanceSource, ManualSource, SourceKind, SourceReading};
