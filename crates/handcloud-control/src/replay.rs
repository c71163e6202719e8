//! Landmark tracker that replays recorded frames
//!
//! Recordings are JSON lines, one [`LandmarkFrame`] per line:
//!
//! ```text
//! {"hands":[[{"x":0.5,"y":0.5,"z":0.0}, ...]]}
//! {"hands":[]}
//! ```

use crate::{ControlError, LandmarkFrame, LandmarkTracker, Result};
use crossbeam_channel::{SendTimeoutError, Sender};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

const SEND_POLL: Duration = Duration::from_millis(50);

/// Parse a JSON-lines recording; blank lines are skipped.
pub fn parse_recording(text: &str) -> Result<Vec<LandmarkFrame>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| {
                ControlError::InvalidParameter(format!("recording line {}: {}", i + 1, e))
            })
        })
        .collect()
}

/// Replays landmark frames on a background thread at a fixed interval
pub struct ReplayTracker {
    path: Option<PathBuf>,
    frames: Arc<Vec<LandmarkFrame>>,
    interval: Duration,
    looping: bool,
    stop_flag: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    name: String,
}

impl ReplayTracker {
    /// Replay a recording file; the file is read on `start`.
    pub fn from_file<P: AsRef<Path>>(path: P, fps: f64) -> Self {
        let path = path.as_ref().to_path_buf();
        let mut tracker = Self::from_frames(Vec::new(), fps);
        tracker.name = format!("replay:{}", path.display());
        tracker.path = Some(path);
        tracker
    }

    /// Replay frames already in memory
    pub fn from_frames(frames: Vec<LandmarkFrame>, fps: f64) -> Self {
        let interval = if fps > 0.0 {
            Duration::from_secs_f64(1.0 / fps)
        } else {
            Duration::ZERO
        };
        Self {
            path: None,
            frames: Arc::new(frames),
            interval,
            looping: false,
            stop_flag: Arc::new(AtomicBool::new(false)),
            worker: None,
            name: "replay".to_string(),
        }
    }

    /// Start over after the last frame instead of ending the stream
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Frames loaded so far
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn load(&mut self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let text = std::fs::read_to_string(path).map_err(|e| {
            ControlError::TrackingLibraryUnavailable(format!("{}: {}", path.display(), e))
        })?;
        let frames = parse_recording(&text)?;
        info!("Landmark recording loaded: {} frames from {}", frames.len(), path.display());
        self.frames = Arc::new(frames);
        Ok(())
    }
}

impl LandmarkTracker for ReplayTracker {
    fn start(&mut self, sender: Sender<LandmarkFrame>) -> Result<()> {
        self.stop();
        self.load()?;
        if self.frames.is_empty() {
            return Err(ControlError::TrackingLibraryUnavailable(format!(
                "{} has no frames",
                self.name
            )));
        }

        let frames = Arc::clone(&self.frames);
        let stop_flag = Arc::new(AtomicBool::new(false));
        self.stop_flag = Arc::clone(&stop_flag);
        let interval = self.interval;
        let looping = self.looping;

        let handle = thread::Builder::new()
            .name("handcloud-replay".to_string())
            .spawn(move || {
                'replay: loop {
                    for frame in frames.iter() {
                        // Block on a full queue, but keep checking for stop.
                        let mut pending = frame.clone();
                        loop {
                            if stop_flag.load(Ordering::Relaxed) {
                                break 'replay;
                            }
                            match sender.send_timeout(pending, SEND_POLL) {
                                Ok(()) => break,
                                Err(SendTimeoutError::Timeout(f)) => pending = f,
                                Err(SendTimeoutError::Disconnected(_)) => break 'replay,
                            }
                        }
                        if !interval.is_zero() {
                            thread::sleep(interval);
                        }
                    }
                    if !looping {
                        break;
                    }
                }
                debug!("Replay worker finished");
            })?;

        self.worker = Some(handle);
        Ok(())
    }

    fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("Replay worker panicked");
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for ReplayTracker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recording_skips_blank_lines() {
        let text = r#"{"hands":[[{"x":0.1,"y":0.2,"z":0.0}]]}

{"hands":[]}
"#;
        let frames = parse_recording(text).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].hands[0][0].y, 0.2);
        assert!(frames[1].hands.is_empty());
    }

    #[test]
    fn test_parse_recording_reports_line() {
        let err = parse_recording("{\"hands\":[]}\nnot json\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_missing_recording_is_unavailable() {
        let mut tracker = ReplayTracker::from_file("/nonexistent/hands.jsonl", 30.0);
        let (tx, _rx) = crossbeam_channel::bounded(1);
        assert!(matches!(
            tracker.start(tx),
            Err(ControlError::TrackingLibraryUnavailable(_))
        ));
    }
}
