//! Camera backed by a still image or a directory of numbered frames
//!
//! Useful for replaying recorded sessions and for running without a device.
//! Frames keep their on-disk resolution; the requested constraints are only
//! logged.

use crate::{CameraConstraints, CameraSource, Result, VideoFrame, VisionError};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Plays back image files as if they came from a camera
pub struct ImageSequenceCamera {
    path: PathBuf,
    name: String,
    fps: f64,
    looping: bool,
    frames: Vec<PathBuf>,
    current_frame: usize,
    current_time: Duration,
    cached_frame: Option<(usize, VideoFrame)>,
    streaming: bool,
}

impl ImageSequenceCamera {
    /// Describe a camera over `path`. Nothing is read until [`CameraSource::start`].
    pub fn new<P: AsRef<Path>>(path: P, fps: f64) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = format!("file:{}", path.display());
        Self {
            path,
            name,
            fps: if fps > 0.0 { fps } else { 30.0 },
            looping: true,
            frames: Vec::new(),
            current_frame: 0,
            current_time: Duration::ZERO,
            cached_frame: None,
            streaming: false,
        }
    }

    /// Stop with `StreamEnded` after the last frame instead of wrapping around
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Number of frames found by the last `start`
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Check if the file format is supported
    pub fn is_supported_image(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| {
                matches!(
                    ext.as_str(),
                    "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp" | "webp"
                )
            })
    }

    fn scan(&self) -> Result<Vec<PathBuf>> {
        if !self.path.exists() {
            return Err(VisionError::CameraUnavailable(format!(
                "Not found: {}",
                self.path.display()
            )));
        }

        if self.path.is_file() {
            return Ok(vec![self.path.clone()]);
        }

        let mut frames: Vec<PathBuf> = WalkDir::new(&self.path)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| p.is_file() && Self::is_supported_image(p))
            .collect();
        frames.sort();

        if frames.is_empty() {
            return Err(VisionError::CameraUnavailable(format!(
                "No image files found in directory: {}",
                self.path.display()
            )));
        }
        Ok(frames)
    }

    fn load_frame(&mut self, index: usize) -> Result<VideoFrame> {
        if let Some((cached_index, frame)) = &self.cached_frame {
            if *cached_index == index {
                return Ok(frame.clone());
            }
        }

        let image = image::open(&self.frames[index])?;
        let frame = VideoFrame::from_rgba_image(image.to_rgba8());
        self.cached_frame = Some((index, frame.clone()));
        Ok(frame)
    }
}

impl CameraSource for ImageSequenceCamera {
    fn start(&mut self, constraints: &CameraConstraints) -> Result<()> {
        let frames = self.scan()?;
        info!(
            "Image sequence camera opened: {} frames @ {:.2} fps from {} (requested {}x{})",
            frames.len(),
            self.fps,
            self.path.display(),
            constraints.width,
            constraints.height
        );

        self.frames = frames;
        self.current_frame = 0;
        self.current_time = Duration::ZERO;
        self.cached_frame = None;
        self.streaming = true;
        Ok(())
    }

    fn stop(&mut self) {
        if self.streaming {
            debug!("Image sequence camera stopped: {}", self.path.display());
        }
        self.streaming = false;
        self.cached_frame = None;
    }

    fn is_streaming(&self) -> bool {
        self.streaming
    }

    fn capture_frame(&mut self) -> Result<Option<VideoFrame>> {
        if !self.streaming {
            return Ok(None);
        }

        if self.current_frame >= self.frames.len() {
            if !self.looping {
                self.streaming = false;
                return Err(VisionError::StreamEnded);
            }
            self.current_frame = 0;
        }

        let frame = self.load_frame(self.current_frame)?.with_pts(self.current_time);
        self.current_frame += 1;
        self.current_time += Duration::from_secs_f64(1.0 / self.fps);
        Ok(Some(frame))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_frames(dir: &Path, count: usize) {
        for i in 0..count {
            let img = RgbImage::from_pixel(8, 6, Rgb([i as u8 * 10, 0, 0]));
            img.save(dir.join(format!("frame_{i:03}.png"))).unwrap();
        }
    }

    #[test]
    fn test_missing_path_is_unavailable() {
        let mut camera = ImageSequenceCamera::new("/nonexistent/handcloud/frames", 30.0);
        let err = camera.start(&CameraConstraints::default()).unwrap_err();
        assert!(matches!(err, VisionError::CameraUnavailable(_)));
        assert!(!camera.is_streaming());
    }

    #[test]
    fn test_empty_directory_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let mut camera = ImageSequenceCamera::new(dir.path(), 30.0);
        assert!(matches!(
            camera.start(&CameraConstraints::default()),
            Err(VisionError::CameraUnavailable(_))
        ));
    }

    #[test]
    fn test_sequence_plays_in_name_order_and_loops() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), 3);
        std::fs::write(dir.path().join("readme.txt"), b"not a frame").unwrap();

        let mut camera = ImageSequenceCamera::new(dir.path(), 10.0);
        camera.start(&CameraConstraints::default()).unwrap();
        assert_eq!(camera.frame_count(), 3);

        let reds: Vec<u8> = (0..4)
            .map(|_| camera.capture_frame().unwrap().unwrap().data[0])
            .collect();
        assert_eq!(reds, vec![0, 10, 20, 0]);
    }

    #[test]
    fn test_sequence_without_looping_ends() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), 2);

        let mut camera = ImageSequenceCamera::new(dir.path(), 10.0).with_looping(false);
        camera.start(&CameraConstraints::default()).unwrap();
        let first = camera.capture_frame().unwrap().unwrap();
        let second = camera.capture_frame().unwrap().unwrap();
        assert_eq!(first.pts, Duration::ZERO);
        assert_eq!(second.pts, Duration::from_millis(100));
        assert!(matches!(camera.capture_frame(), Err(VisionError::StreamEnded)));
        assert!(!camera.is_streaming());
    }

    #[test]
    fn test_stopped_camera_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), 1);
        let mut camera = ImageSequenceCamera::new(dir.path().join("frame_000.png"), 30.0);
        camera.start(&CameraConstraints::default()).unwrap();
        assert!(camera.capture_frame().unwrap().is_some());
        camera.stop();
        assert!(camera.capture_frame().unwrap().is_none());
    }
}
