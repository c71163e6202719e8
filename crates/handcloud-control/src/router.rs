//! Source router
//!
//! Holds exactly one active [`DistanceSource`]. When a source fails to start
//! or errors while running, the router drops back to manual control at the
//! fallback distance. Camera stops reset the distance to the fallback.

use crate::{ControlError, DistanceSource, ManualSource, Result, SourceKind, SourceReading};
use handcloud_core::DistanceSignal;
use std::fmt;
use tracing::{info, warn};

/// Most recent user-visible source status
#[derive(Debug, Clone, PartialEq)]
pub enum SourceStatus {
    /// Manual control, no camera or tracker involved
    Manual,
    /// A source was started
    Activated {
        /// Kind of the source
        kind: SourceKind,
        /// Source name
        name: String,
    },
    /// A source could not start or stopped with an error; control fell back to manual
    Failed {
        /// Kind of the failed source
        kind: SourceKind,
        /// Why it failed
        reason: String,
    },
    /// Hands are being tracked
    HandsTracked {
        /// Hands in the latest frame
        hands: usize,
    },
    /// Frames arrive but contain no hand
    NoHands,
    /// The camera or tracker was stopped
    CameraStopped,
}

impl SourceStatus {
    /// Whether this status reports a failure
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "Manual control"),
            Self::Activated { kind, name } => write!(f, "{kind} source active: {name}"),
            Self::Failed { kind, reason } => {
                write!(f, "{kind} source failed ({reason}); using manual control")
            }
            Self::HandsTracked { hands: 1 } => write!(f, "Tracking 1 hand"),
            Self::HandsTracked { hands } => write!(f, "Tracking {hands} hands"),
            Self::NoHands => write!(f, "No hands detected"),
            Self::CameraStopped => write!(f, "Camera stopped"),
        }
    }
}

/// Owns the active distance source and the current distance
pub struct DistanceRouter {
    source: Box<dyn DistanceSource>,
    distance: DistanceSignal,
    fallback: DistanceSignal,
    status: SourceStatus,
}

impl DistanceRouter {
    /// Start under manual control at `fallback`
    pub fn new(fallback: DistanceSignal) -> Self {
        Self {
            source: Box::new(ManualSource::new(fallback)),
            distance: fallback,
            fallback,
            status: SourceStatus::Manual,
        }
    }

    /// Start `source` and make it the active one.
    ///
    /// The previous source is stopped first. On failure the router is left
    /// under manual control at the fallback distance and the error is returned
    /// for display.
    pub fn activate(&mut self, mut source: Box<dyn DistanceSource>) -> Result<()> {
        self.source.stop();

        let kind = source.kind();
        match source.start() {
            Ok(()) => {
                let status = if kind == SourceKind::Manual {
                    SourceStatus::Manual
                } else {
                    SourceStatus::Activated {
                        kind,
                        name: source.name().to_string(),
                    }
                };
                self.source = source;
                self.set_status(status);
                Ok(())
            }
            Err(e) => {
                source.stop();
                self.degrade(kind, &e);
                Err(e)
            }
        }
    }

    /// Stop the active source and return to manual control at the fallback distance.
    pub fn stop(&mut self) {
        let was_tracking = self.source.kind() != SourceKind::Manual;
        self.source.stop();
        self.source = Box::new(ManualSource::new(self.fallback));
        self.distance = self.fallback;
        if was_tracking {
            self.set_status(SourceStatus::CameraStopped);
        }
    }

    /// Value from the manual control; ignored while a camera source is active.
    pub fn set_manual(&mut self, value: f32) {
        let value = DistanceSignal::new(value);
        if self.source.set_manual(value) {
            self.distance = value;
        }
    }

    /// Poll the active source and return the current distance.
    pub fn poll(&mut self) -> DistanceSignal {
        match self.source.poll() {
            Ok(SourceReading::Idle) => {}
            Ok(SourceReading::Distance { value, hands }) => {
                self.distance = value;
                if self.source.kind() != SourceKind::Manual {
                    self.set_status(SourceStatus::HandsTracked { hands });
                }
            }
            Ok(SourceReading::NoHands) => self.set_status(SourceStatus::NoHands),
            Ok(SourceReading::Ended) => self.stop(),
            Err(e) => {
                let kind = self.source.kind();
                self.source.stop();
                self.degrade(kind, &e);
            }
        }
        self.distance
    }

    /// Current distance
    pub fn distance(&self) -> DistanceSignal {
        self.distance
    }

    /// Most recent status
    pub fn status(&self) -> &SourceStatus {
        &self.status
    }

    /// Kind of the active source
    pub fn active_kind(&self) -> SourceKind {
        self.source.kind()
    }

    /// Name of the active source
    pub fn active_name(&self) -> &str {
        self.source.name()
    }

    fn degrade(&mut self, kind: SourceKind, error: &ControlError) {
        warn!("{} source failed, falling back to manual: {}", kind, error);
        self.source = Box::new(ManualSource::new(self.fallback));
        self.distance = self.fallback;
        self.set_status(SourceStatus::Failed {
            kind,
            reason: error.to_string(),
        });
    }

    fn set_status(&mut self, status: SourceStatus) {
        if status != self.status {
            info!("Source status: {}", status);
            self.status = status;
        }
    }
}

impl Drop for DistanceRouter {
    fn drop(&mut self) {
        self.source.stop();
    }
}

impl Default for DistanceRouter {
    fn default() -> Self {
        Self::new(DistanceSignal::default())
    }
}
