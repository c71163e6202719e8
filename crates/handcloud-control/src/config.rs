//! Distance source configuration

use crate::{
    ContourSource, ControlError, DistanceSource, LandmarkConfig, LandmarkSource,
    LandmarkTracker, ManualSource, Result, SourceKind,
};
use handcloud_core::DistanceSignal;
use handcloud_vision::{CameraConstraints, CameraSource, EstimatorConfig};
use serde::{Deserialize, Serialize};

/// Which source to run and how to tune it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Active source
    pub kind: SourceKind,
    /// Distance used before any reading and after the camera stops
    pub fallback_distance: f32,
    /// Requested camera settings
    pub camera: CameraConstraints,
    /// Contour estimator tuning
    pub estimator: EstimatorConfig,
    /// Landmark source tuning
    pub landmark: LandmarkConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Manual,
            fallback_distance: DistanceSignal::FALLBACK,
            camera: CameraConstraints::default(),
            estimator: EstimatorConfig::default(),
            landmark: LandmarkConfig::default(),
        }
    }
}

impl SourceConfig {
    /// Fallback distance as a signal
    pub fn fallback(&self) -> DistanceSignal {
        DistanceSignal::new(self.fallback_distance)
    }

    /// Build the configured source from whichever devices are available.
    ///
    /// A contour source needs a camera and a landmark source needs a tracker;
    /// a missing one is reported as unavailable.
    pub fn build_source(
        &self,
        camera: Option<Box<dyn CameraSource>>,
        tracker: Option<Box<dyn LandmarkTracker>>,
    ) -> Result<Box<dyn DistanceSource>> {
        match self.kind {
            SourceKind::Manual => Ok(Box::new(ManualSource::new(self.fallback()))),
            SourceKind::Contour => {
                let camera = camera.ok_or_else(|| {
                    ControlError::CameraUnavailable("no camera configured".to_string())
                })?;
                Ok(Box::new(ContourSource::new(camera, self.camera, self.estimator)))
            }
            SourceKind::Landmark => {
                let tracker = tracker.ok_or_else(|| {
                    ControlError::TrackingLibraryUnavailable("no landmark tracker configured".to_string())
                })?;
                Ok(Box::new(LandmarkSource::new(tracker, self.landmark)))
            }
        }
    }
}
