//! Landmark-based distance source
//!
//! An external tracker delivers frames of hands, each a list of normalized
//! `(x, y, z)` points in the 21-point hand topology. One metric is measured
//! per hand, up to two hands are averaged, and the raw average is normalized
//! into `[0, 1]`.

use crate::{ControlError, DistanceSource, Result, SourceKind, SourceReading};
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use handcloud_core::{DistanceSignal, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Wrist landmark index
pub const WRIST: usize = 0;
/// Thumb tip landmark index
pub const THUMB_TIP: usize = 4;
/// Index finger tip landmark index
pub const INDEX_FINGER_TIP: usize = 8;
/// Middle finger knuckle landmark index
pub const MIDDLE_FINGER_MCP: usize = 9;
/// Pinky tip landmark index
pub const PINKY_TIP: usize = 20;

/// Frames buffered between the tracker and the source
pub const LANDMARK_QUEUE: usize = 16;

/// One landmark in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkPoint {
    /// Horizontal, 0 at the left edge, 1 at the right
    pub x: f32,
    /// Vertical, 0 at the top, 1 at the bottom
    pub y: f32,
    /// Depth relative to the wrist
    #[serde(default)]
    pub z: f32,
}

impl LandmarkPoint {
    /// New point
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<LandmarkPoint> for Vec3 {
    fn from(p: LandmarkPoint) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

/// Hands seen in one tracker frame
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// One ordered landmark list per hand
    #[serde(default)]
    pub hands: Vec<Vec<LandmarkPoint>>,
}

/// Which landmark pair is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LandmarkMetric {
    /// Thumb tip to index finger tip
    #[default]
    Pinch,
    /// Thumb tip to pinky tip
    Spread,
    /// Wrist to middle finger knuckle; grows as the hand nears the camera
    Palm,
}

impl LandmarkMetric {
    /// The two landmark indices measured
    pub fn landmarks(&self) -> (usize, usize) {
        match self {
            Self::Pinch => (THUMB_TIP, INDEX_FINGER_TIP),
            Self::Spread => (THUMB_TIP, PINKY_TIP),
            Self::Palm => (WRIST, MIDDLE_FINGER_MCP),
        }
    }

    /// 3D distance between the two landmarks, `None` if the hand is too short
    pub fn measure(&self, hand: &[LandmarkPoint]) -> Option<f32> {
        let (a, b) = self.landmarks();
        let a: Vec3 = (*hand.get(a)?).into();
        let b: Vec3 = (*hand.get(b)?).into();
        Some(a.distance(b))
    }
}

/// Mapping from the raw metric to `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Normalization {
    /// `clamp(raw * gain, floor, ceiling)` mapped linearly onto `[0, 1]`
    #[default]
    Gain,
    /// `raw / max(raw seen since start)`
    RunningMax,
}

/// Landmark source tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandmarkConfig {
    /// Landmark pair to measure
    pub metric: LandmarkMetric,
    /// Normalization mode
    pub normalization: Normalization,
    /// Multiplier for [`Normalization::Gain`]
    pub gain: f32,
    /// Gained value mapped to 0
    pub gain_floor: f32,
    /// Gained value mapped to 1
    pub gain_ceiling: f32,
    /// Hands averaged per frame
    pub max_hands: usize,
}

impl Default for LandmarkConfig {
    fn default() -> Self {
        Self {
            metric: LandmarkMetric::Pinch,
            normalization: Normalization::Gain,
            gain: 10.0,
            gain_floor: 0.5,
            gain_ceiling: 2.0,
            max_hands: 2,
        }
    }
}

/// External hand tracker contract.
///
/// `start` hands the tracker a sender; the tracker pushes one
/// [`LandmarkFrame`] per processed camera frame until stopped. Dropping the
/// sender ends the stream.
pub trait LandmarkTracker: Send {
    /// Load the tracking model and begin delivering frames
    fn start(&mut self, sender: Sender<LandmarkFrame>) -> Result<()>;

    /// Stop delivering frames
    fn stop(&mut self);

    /// Name for logs
    fn name(&self) -> &str;
}

impl<T: LandmarkTracker + ?Sized> LandmarkTracker for Box<T> {
    fn start(&mut self, sender: Sender<LandmarkFrame>) -> Result<()> {
        (**self).start(sender)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Distance from hand landmarks
pub struct LandmarkSource<T: LandmarkTracker> {
    tracker: T,
    config: LandmarkConfig,
    receiver: Option<Receiver<LandmarkFrame>>,
    running_max: f32,
    name: String,
}

impl<T: LandmarkTracker> LandmarkSource<T> {
    /// Wrap a tracker; it is started by [`DistanceSource::start`].
    pub fn new(tracker: T, config: LandmarkConfig) -> Self {
        let name = format!("landmark ({})", tracker.name());
        Self {
            tracker,
            config,
            receiver: None,
            running_max: 0.0,
            name,
        }
    }

    /// Source tuning
    pub fn config(&self) -> &LandmarkConfig {
        &self.config
    }

    /// Average metric over the measurable hands, with the number of hands used
    pub fn raw_metric(&self, frame: &LandmarkFrame) -> Option<(f32, usize)> {
        let values: Vec<f32> = frame
            .hands
            .iter()
            .filter_map(|hand| self.config.metric.measure(hand))
            .take(self.config.max_hands.max(1))
            .collect();

        if values.is_empty() {
            return None;
        }
        let avg = values.iter().sum::<f32>() / values.len() as f32;
        Some((avg, values.len()))
    }

    /// Map a raw metric into `[0, 1]`, updating the running maximum
    pub fn normalize(&mut self, raw: f32) -> DistanceSignal {
        match self.config.normalization {
            Normalization::Gain => {
                let floor = self.config.gain_floor.min(self.config.gain_ceiling);
                let ceiling = self.config.gain_ceiling.max(self.config.gain_floor);
                let span = ceiling - floor;
                if span <= f32::EPSILON {
                    return DistanceSignal::new(DistanceSignal::MAX);
                }
                let gained = (raw * self.config.gain).clamp(floor, ceiling);
                DistanceSignal::new((gained - floor) / span)
            }
            Normalization::RunningMax => {
                self.running_max = self.running_max.max(raw);
                if self.running_max <= 0.0 {
                    DistanceSignal::new(DistanceSignal::MIN)
                } else {
                    DistanceSignal::new(raw / self.running_max)
                }
            }
        }
    }

    fn process(&mut self, frame: &LandmarkFrame) -> SourceReading {
        match self.raw_metric(frame) {
            Some((raw, hands)) => {
                let value = self.normalize(raw);
                debug!(raw, distance = value.value(), hands, "landmark frame");
                SourceReading::Distance { value, hands }
            }
            None => SourceReading::NoHands,
        }
    }
}

impl<T: LandmarkTracker> DistanceSource for LandmarkSource<T> {
    fn kind(&self) -> SourceKind {
        SourceKind::Landmark
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn start(&mut self) -> Result<()> {
        if self.receiver.is_some() {
            return Ok(());
        }

        let (tx, rx) = bounded(LANDMARK_QUEUE);
        self.tracker.start(tx).map_err(|e| match e {
            ControlError::TrackingLibraryUnavailable(msg) => {
                ControlError::TrackingLibraryUnavailable(msg)
            }
            other => ControlError::TrackingLibraryUnavailable(other.to_string()),
        })?;

        info!("Landmark tracker '{}' started", self.tracker.name());
        self.receiver = Some(rx);
        self.running_max = 0.0;
        Ok(())
    }

    fn stop(&mut self) {
        if self.receiver.take().is_some() {
            info!("Landmark tracker '{}' stopped", self.tracker.name());
        }
        self.tracker.stop();
    }

    fn is_active(&self) -> bool {
        self.receiver.is_some()
    }

    fn poll(&mut self) -> Result<SourceReading> {
        let Some(receiver) = self.receiver.clone() else {
            return Ok(SourceReading::Idle);
        };

        let mut reading = SourceReading::Idle;
        loop {
            match receiver.try_recv() {
                Ok(frame) => {
                    let next = self.process(&frame);
                    // An empty frame later in the queue does not hide a hand seen earlier.
                    let keep = next == SourceReading::NoHands
                        && matches!(reading, SourceReading::Distance { .. });
                    if !keep {
                        reading = next;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if reading == SourceReading::Idle {
                        warn!("Landmark tracker '{}' disconnected", self.tracker.name());
                        self.stop();
                        return Ok(SourceReading::Ended);
                    }
                    break;
                }
            }
        }
        Ok(reading)
    }
}

impl<T: LandmarkTracker> Drop for LandmarkSource<T> {
    fn drop(&mut self) {
        self.tracker.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullTracker;

    impl LandmarkTracker for NullTracker {
        fn start(&mut self, _sender: Sender<LandmarkFrame>) -> Result<()> {
            Ok(())
        }
        fn stop(&mut self) {}
        fn name(&self) -> &str {
            "null"
        }
    }

    /// Queues `frames` on start and keeps the sender for later pushes.
    struct QueuedTracker {
        frames: Vec<LandmarkFrame>,
        sender: Option<Sender<LandmarkFrame>>,
    }

    impl LandmarkTracker for QueuedTracker {
        fn start(&mut self, sender: Sender<LandmarkFrame>) -> Result<()> {
            for frame in self.frames.drain(..) {
                sender.try_send(frame).unwrap();
            }
            self.sender = Some(sender);
            Ok(())
        }
        fn stop(&mut self) {
            self.sender = None;
        }
        fn name(&self) -> &str {
            "queued"
        }
    }

    fn pinch_hand(gap: f32) -> Vec<LandmarkPoint> {
        hand_with(
            THUMB_TIP,
            LandmarkPoint::new(0.0, 0.0, 0.0),
            INDEX_FINGER_TIP,
            LandmarkPoint::new(gap, 0.0, 0.0),
        )
    }

    fn hand_with(a: usize, pa: LandmarkPoint, b: usize, pb: LandmarkPoint) -> Vec<LandmarkPoint> {
        let mut hand = vec![LandmarkPoint::default(); 21];
        hand[a] = pa;
        hand[b] = pb;
        hand
    }

    #[test]
    fn test_pinch_measures_thumb_to_index() {
        let hand = hand_with(
            THUMB_TIP,
            LandmarkPoint::new(0.1, 0.1, 0.0),
            INDEX_FINGER_TIP,
            LandmarkPoint::new(0.4, 0.5, 0.0),
        );
        let d = LandmarkMetric::Pinch.measure(&hand).unwrap();
        assert!((d - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_short_hand_is_skipped() {
        let hand = vec![LandmarkPoint::default(); 10];
        assert!(LandmarkMetric::Pinch.measure(&hand).is_some());
        assert!(LandmarkMetric::Spread.measure(&hand).is_none());
    }

    #[test]
    fn test_gain_normalization() {
        let mut source = LandmarkSource::new(NullTracker, LandmarkConfig::default());
        assert_eq!(source.normalize(0.0).value(), 0.0);
        assert_eq!(source.normalize(0.05).value(), 0.0);
        assert!((source.normalize(0.125).value() - 0.5).abs() < 1e-6);
        assert_eq!(source.normalize(0.2).value(), 1.0);
        assert_eq!(source.normalize(3.0).value(), 1.0);
    }

    #[test]
    fn test_running_max_normalization() {
        let config = LandmarkConfig {
            normalization: Normalization::RunningMax,
            ..Default::default()
        };
        let mut source = LandmarkSource::new(NullTracker, config);
        assert_eq!(source.normalize(0.0).value(), 0.0);
        assert_eq!(source.normalize(0.2).value(), 1.0);
        assert!((source.normalize(0.1).value() - 0.5).abs() < 1e-6);
        assert_eq!(source.normalize(0.4).value(), 1.0);
        assert!((source.normalize(0.1).value() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_averages_at_most_two_hands() {
        let source = LandmarkSource::new(NullTracker, LandmarkConfig::default());
        let hand = |d: f32| {
            hand_with(
                THUMB_TIP,
                LandmarkPoint::new(0.0, 0.0, 0.0),
                INDEX_FINGER_TIP,
                LandmarkPoint::new(d, 0.0, 0.0),
            )
        };
        let frame = LandmarkFrame {
            hands: vec![hand(0.1), hand(0.3), hand(0.9)],
        };
        let (raw, hands) = source.raw_metric(&frame).unwrap();
        assert_eq!(hands, 2);
        assert!((raw - 0.2).abs() < 1e-6);

        assert!(source.raw_metric(&LandmarkFrame::default()).is_none());
    }

    #[test]
    fn test_empty_frame_after_hand_keeps_hand_reading() {
        let tracker = QueuedTracker {
            frames: vec![
                LandmarkFrame {
                    hands: vec![pinch_hand(0.3)],
                },
                LandmarkFrame::default(),
            ],
            sender: None,
        };
        let mut source = LandmarkSource::new(tracker, LandmarkConfig::default());
        source.start().unwrap();

        match source.poll().unwrap() {
            SourceReading::Distance { value, hands } => {
                assert_eq!(value.value(), 1.0);
                assert_eq!(hands, 1);
            }
            other => panic!("expected a distance, got {other:?}"),
        }

        let sender = source.tracker.sender.clone().unwrap();
        sender.try_send(LandmarkFrame::default()).unwrap();
        assert_eq!(source.poll().unwrap(), SourceReading::NoHands);
        assert_eq!(source.poll().unwrap(), SourceReading::Idle);
    }
}
