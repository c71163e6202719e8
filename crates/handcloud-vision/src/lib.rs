//! HandCloud Vision - Hand Presence from Camera Frames
//!
//! This crate turns camera frames into a hand proximity estimate:
//! - Frame model and grayscale/threshold preprocessing
//! - Flood-fill contour extraction and largest-contour selection
//! - The polled hand presence estimator with its Active/Inactive lifecycle
//! - Camera source contract plus file-backed and synthetic cameras

use thiserror::Error;

pub mod camera;
pub mod contour;
pub mod estimator;
pub mod file_camera;
pub mod frame;
pub mod preprocess;
pub mod synthetic;

pub use camera::{CameraConstraints, CameraSource, FacingMode};
pub use contour::{find_contours, largest_contour, BoundingBox, Contour, Point};
pub use estimator::{
    estimate, EstimatorConfig, EstimatorState, HandObservation, HandPresenceEstimator,
};
pub use file_camera::ImageSequenceCamera;
pub use frame::{PixelFormat, VideoFrame};
pub use preprocess::{binarize, grayscale, threshold};
pub use synthetic::SyntheticHandCamera;

/// Vision errors
#[derive(Error, Debug)]
pub enum VisionError {
    /// Permission denied, no device, or nothing to play back
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    /// The camera track ended
    #[error("Camera stream ended")]
    StreamEnded,

    /// A frame could not be captured
    #[error("Frame capture failed: {0}")]
    Capture(String),

    /// Frame buffer does not match its declared dimensions
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Image decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for vision operations
pub type Result<T> = std::result::Result<T, VisionError>;
