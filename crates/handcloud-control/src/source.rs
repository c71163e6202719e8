//! Distance sources
//!
//! Every source reports proximity in the canonical `[0, 1]` range of
//! [`DistanceSignal`]. The contour estimator already reports a clamped width
//! ratio in `[0.1, 1.0]`, which passes through unchanged.

use crate::{ControlError, Result};
use handcloud_core::DistanceSignal;
use handcloud_vision::{
    CameraConstraints, CameraSource, EstimatorConfig, HandPresenceEstimator, VisionError,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which source drives the distance signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Slider or command-line value
    #[default]
    Manual,
    /// Bright-region contour estimator over camera frames
    Contour,
    /// External hand landmark tracker
    Landmark,
}

impl SourceKind {
    /// Identifier used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Contour => "contour",
            Self::Landmark => "landmark",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "contour" => Ok(Self::Contour),
            "landmark" => Ok(Self::Landmark),
            other => Err(ControlError::InvalidParameter(format!(
                "unknown distance source '{other}'"
            ))),
        }
    }
}

/// Outcome of one poll
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceReading {
    /// Nothing new since the last poll
    Idle,
    /// A fresh distance
    Distance {
        /// Normalized proximity
        value: DistanceSignal,
        /// Hands that contributed
        hands: usize,
    },
    /// A frame was processed but no hand was found; keep the previous distance
    NoHands,
    /// The camera or tracker stopped delivering frames
    Ended,
}

/// A pluggable producer of the distance signal
pub trait DistanceSource: Send {
    /// Which kind of source this is
    fn kind(&self) -> SourceKind;

    /// Name for logs and status messages
    fn name(&self) -> &str;

    /// Acquire the camera or tracker
    fn start(&mut self) -> Result<()>;

    /// Release the camera or tracker; nothing is processed afterwards
    fn stop(&mut self);

    /// Whether the source is producing readings
    fn is_active(&self) -> bool;

    /// Collect whatever arrived since the last poll
    fn poll(&mut self) -> Result<SourceReading>;

    /// Accept a value from the manual control.
    ///
    /// Returns whether this source is driven by it.
    fn set_manual(&mut self, _value: DistanceSignal) -> bool {
        false
    }
}

/// Distance set directly by the user
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManualSource {
    value: DistanceSignal,
}

impl ManualSource {
    /// Start at `value`
    pub fn new(value: DistanceSignal) -> Self {
        Self { value }
    }

    /// Current value
    pub fn value(&self) -> DistanceSignal {
        self.value
    }
}

impl Default for ManualSource {
    fn default() -> Self {
        Self::new(DistanceSignal::default())
    }
}

impl DistanceSource for ManualSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Manual
    }

    fn name(&self) -> &str {
        "manual"
    }

    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) {}

    fn is_active(&self) -> bool {
        true
    }

    fn poll(&mut self) -> Result<SourceReading> {
        Ok(SourceReading::Distance {
            value: self.value,
            hands: 0,
        })
    }

    fn set_manual(&mut self, value: DistanceSignal) -> bool {
        self.value = value;
        true
    }
}

/// Contour estimator over a camera
pub struct ContourSource<C: CameraSource> {
    estimator: HandPresenceEstimator<C>,
    constraints: CameraConstraints,
    name: String,
}

impl<C: CameraSource> ContourSource<C> {
    /// Wrap a camera; the camera is opened by [`DistanceSource::start`].
    pub fn new(camera: C, constraints: CameraConstraints, config: EstimatorConfig) -> Self {
        let name = format!("contour ({})", camera.name());
        Self {
            estimator: HandPresenceEstimator::new(camera, config),
            constraints,
            name,
        }
    }

    /// The wrapped estimator
    pub fn estimator(&self) -> &HandPresenceEstimator<C> {
        &self.estimator
    }
}

impl<C: CameraSource> DistanceSource for ContourSource<C> {
    fn kind(&self) -> SourceKind {
        SourceKind::Contour
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self) -> Result<()> {
        self.estimator.start(&self.constraints).map_err(|e| match e {
            VisionError::CameraUnavailable(msg) => ControlError::CameraUnavailable(msg),
            other => ControlError::CameraUnavailable(other.to_string()),
        })
    }

    fn stop(&mut self) {
        self.estimator.stop();
    }

    fn is_active(&self) -> bool {
        self.estimator.is_active()
    }

    fn poll(&mut self) -> Result<SourceReading> {
        if !self.estimator.is_active() {
            return Ok(SourceReading::Idle);
        }

        let processed = self.estimator.frames_processed();
        match self.estimator.poll() {
            Ok(Some(obs)) => Ok(SourceReading::Distance {
                value: DistanceSignal::new(obs.distance),
                hands: 1,
            }),
            Ok(None) if self.estimator.frames_processed() > processed => {
                Ok(SourceReading::NoHands)
            }
            Ok(None) => Ok(SourceReading::Idle),
            Err(VisionError::StreamEnded) => Ok(SourceReading::Ended),
            Err(e) => Err(e.into()),
        }
    }
}
