//! Hand presence estimator
//!
//! Per frame: grayscale, threshold, flood-fill contours, keep the largest one
//! above the size floor, and map its bounding-box width to a distance in
//! `[min_distance, max_distance]`. A wider box means a hand closer to the lens.

use crate::{
    binarize, find_contours, largest_contour, BoundingBox, CameraConstraints, CameraSource,
    Result, VideoFrame, VisionError,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Estimator tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Grayscale cutoff; pixels at or above are foreground
    pub threshold: u8,
    /// Smallest heuristic contour area accepted as a hand
    pub min_area: f64,
    /// Smallest number of contour points accepted as a hand
    pub min_points: usize,
    /// Lower bound of the reported distance
    pub min_distance: f32,
    /// Upper bound of the reported distance
    pub max_distance: f32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            threshold: 100,
            min_area: 1000.0,
            min_points: 10,
            min_distance: 0.1,
            max_distance: 1.0,
        }
    }
}

/// Estimator lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EstimatorState {
    /// No camera, nothing processed
    #[default]
    Inactive,
    /// Camera acquired; frames are processed on every poll
    Active,
}

/// The hand found in one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandObservation {
    /// Bounding-box width over frame width, clamped to the configured range
    pub distance: f32,
    /// Bounds of the selected contour
    pub bounding_box: BoundingBox,
    /// Heuristic area of the selected contour
    pub area: f64,
    /// Pixels in the selected contour
    pub point_count: usize,
    /// Contours found in the frame before filtering
    pub contour_count: usize,
}

/// Run the pipeline on one frame.
///
/// Returns `Ok(None)` when no contour qualifies.
pub fn estimate(frame: &VideoFrame, config: &EstimatorConfig) -> Result<Option<HandObservation>> {
    if frame.width == 0 || frame.height == 0 {
        return Ok(None);
    }

    let binary = binarize(frame, config.threshold)?;
    let contours = find_contours(&binary);

    let Some(hand) = largest_contour(&contours, config.min_area, config.min_points) else {
        return Ok(None);
    };
    let Some(bounding_box) = hand.bounding_box() else {
        return Ok(None);
    };

    let lo = config.min_distance.min(config.max_distance);
    let hi = config.max_distance.max(config.min_distance);
    let distance = (bounding_box.width() as f32 / frame.width as f32).clamp(lo, hi);

    Ok(Some(HandObservation {
        distance,
        bounding_box,
        area: hand.area(),
        point_count: hand.len(),
        contour_count: contours.len(),
    }))
}

/// Polled estimator over a camera
///
/// The estimator does no scheduling of its own; the caller polls once per
/// display refresh. After [`HandPresenceEstimator::stop`] returns, polls do
/// not touch the camera.
pub struct HandPresenceEstimator<C: CameraSource> {
    camera: C,
    config: EstimatorConfig,
    state: EstimatorState,
    last_distance: Option<f32>,
    frames_processed: u64,
}

impl<C: CameraSource> HandPresenceEstimator<C> {
    /// Wrap a camera; starts Inactive.
    pub fn new(camera: C, config: EstimatorConfig) -> Self {
        Self {
            camera,
            config,
            state: EstimatorState::Inactive,
            last_distance: None,
            frames_processed: 0,
        }
    }

    /// Acquire the camera and go Active.
    ///
    /// On failure the estimator stays Inactive; a retry needs another call.
    pub fn start(&mut self, constraints: &CameraConstraints) -> Result<()> {
        if self.state == EstimatorState::Active {
            return Ok(());
        }

        match self.camera.start(constraints) {
            Ok(()) => {
                info!("Hand estimator active on camera '{}'", self.camera.name());
                self.state = EstimatorState::Active;
                Ok(())
            }
            Err(e) => {
                warn!("Camera '{}' could not be started: {}", self.camera.name(), e);
                self.camera.stop();
                Err(match e {
                    VisionError::CameraUnavailable(msg) => VisionError::CameraUnavailable(msg),
                    other => VisionError::CameraUnavailable(other.to_string()),
                })
            }
        }
    }

    /// Release the camera and go Inactive.
    pub fn stop(&mut self) {
        if self.state == EstimatorState::Active {
            info!("Hand estimator stopped");
        }
        self.camera.stop();
        self.state = EstimatorState::Inactive;
    }

    /// Process the current frame.
    ///
    /// `Ok(None)` while Inactive, when the camera has no new frame, or when no
    /// contour qualifies; the last distance is kept in those cases. A track
    /// that ends returns the estimator to Inactive and yields `StreamEnded`.
    pub fn poll(&mut self) -> Result<Option<HandObservation>> {
        if self.state != EstimatorState::Active {
            return Ok(None);
        }

        let frame = match self.camera.capture_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(None),
            Err(VisionError::StreamEnded) => {
                info!("Camera '{}' track ended", self.camera.name());
                self.stop();
                return Err(VisionError::StreamEnded);
            }
            Err(e) => return Err(e),
        };

        self.frames_processed += 1;
        let observation = estimate(&frame, &self.config)?;
        match &observation {
            Some(obs) => {
                debug!(
                    distance = obs.distance,
                    width = obs.bounding_box.width(),
                    contours = obs.contour_count,
                    "hand observed"
                );
                self.last_distance = Some(obs.distance);
            }
            None => debug!("no qualifying contour"),
        }
        Ok(observation)
    }

    /// Current lifecycle state
    pub fn state(&self) -> EstimatorState {
        self.state
    }

    /// Whether the estimator is Active
    pub fn is_active(&self) -> bool {
        self.state == EstimatorState::Active
    }

    /// Distance from the most recent frame that had a hand
    pub fn last_distance(&self) -> Option<f32> {
        self.last_distance
    }

    /// Estimator tuning
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// The underlying camera
    pub fn camera(&self) -> &C {
        &self.camera
    }

    /// Frames run through the pipeline since construction
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }
}

impl<C: CameraSource> Drop for HandPresenceEstimator<C> {
    fn drop(&mut self) {
        self.camera.stop();
    }
}
