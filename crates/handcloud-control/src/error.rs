//! Error types for distance sources
use thiserror::Error;

/// Distance source errors
#[derive(Error, Debug)]
pub enum ControlError {
    /// Camera permission denied or no device
    #[error("Camera unavailable: {0}")]
    CameraUnavailable(String),

    /// The external landmark tracker could not be loaded or started
    #[error("Tracking library unavailable: {0}")]
    TrackingLibraryUnavailable(String),

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Frame processing error
    #[error("Vision error: {0}")]
    Vision(#[from] handcloud_vision::VisionError),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for control operations
pub type Result<T> = std::result::Result<T, ControlError>;
