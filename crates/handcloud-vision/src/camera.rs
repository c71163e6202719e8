//! Camera source contract

use crate::{Result, VideoFrame};
use serde::{Deserialize, Serialize};

/// Which way the camera faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front camera, facing the user
    #[default]
    User,
    /// Rear camera
    Environment,
}

/// Requested capture settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConstraints {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Preferred camera
    pub facing_mode: FacingMode,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            facing_mode: FacingMode::User,
        }
    }
}

/// A source of video frames that can be started and stopped.
///
/// `capture_frame` returns `Ok(None)` when no new frame is ready yet and
/// [`crate::VisionError::StreamEnded`] once the track is gone.
pub trait CameraSource: Send {
    /// Acquire the device; fails with `CameraUnavailable` when it cannot be opened.
    fn start(&mut self, constraints: &CameraConstraints) -> Result<()>;

    /// Release the device. Stopping a stopped camera is a no-op.
    fn stop(&mut self);

    /// Whether frames are flowing
    fn is_streaming(&self) -> bool;

    /// Grab the current frame
    fn capture_frame(&mut self) -> Result<Option<VideoFrame>>;

    /// Human-readable name for logs
    fn name(&self) -> &str;
}

impl<C: CameraSource + ?Sized> CameraSource for Box<C> {
    fn start(&mut self, constraints: &CameraConstraints) -> Result<()> {
        (**self).start(constraints)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn is_streaming(&self) -> bool {
        (**self).is_streaming()
    }

    fn capture_frame(&mut self) -> Result<Option<VideoFrame>> {
        (**self).capture_frame()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
