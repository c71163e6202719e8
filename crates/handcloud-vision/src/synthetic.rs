//! Synthetic camera drawing a bright "hand" that moves toward and away from the lens

use crate::{CameraConstraints, CameraSource, PixelFormat, Result, VideoFrame, VisionError};
use std::f32::consts::TAU;
use std::time::Duration;
use tracing::debug;

const BACKGROUND_LEVEL: u8 = 20;
const HAND_LEVEL: u8 = 220;

/// Generates frames with a bright rectangle on a dark background.
///
/// The rectangle width sweeps between `min_width` and `max_width` (fractions of
/// the frame width) with a cosine over `period` frames, starting at the widest.
pub struct SyntheticHandCamera {
    min_width: f32,
    max_width: f32,
    height_fraction: f32,
    period: u32,
    hand_visible: bool,
    width: u32,
    height: u32,
    frame_index: u64,
    frame_interval: Duration,
    streaming: bool,
}

impl Default for SyntheticHandCamera {
    fn default() -> Self {
        Self {
            min_width: 0.15,
            max_width: 0.9,
            height_fraction: 0.6,
            period: 240,
            hand_visible: true,
            width: 0,
            height: 0,
            frame_index: 0,
            frame_interval: Duration::from_secs_f64(1.0 / 30.0),
            streaming: false,
        }
    }
}

impl SyntheticHandCamera {
    /// Default sweep: 15% to 90% of the frame width over 240 frames
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sweep range as fractions of the frame width, clamped to [0, 1]
    pub fn with_width_range(mut self, min: f32, max: f32) -> Self {
        let min = min.clamp(0.0, 1.0);
        let max = max.clamp(0.0, 1.0);
        self.min_width = min.min(max);
        self.max_width = min.max(max);
        self
    }

    /// Frames per full sweep; zero holds the widest position
    pub fn with_period(mut self, period: u32) -> Self {
        self.period = period;
        self
    }

    /// Show or hide the hand; hidden frames are all background
    pub fn set_hand_visible(&mut self, visible: bool) {
        self.hand_visible = visible;
    }

    /// Rectangle width fraction at a frame index
    pub fn width_fraction_at(&self, frame_index: u64) -> f32 {
        if self.period == 0 {
            return self.max_width;
        }
        let phase = (frame_index % self.period as u64) as f32 / self.period as f32;
        let t = 0.5 + 0.5 * (phase * TAU).cos();
        self.min_width + (self.max_width - self.min_width) * t
    }

    fn render(&self) -> Result<VideoFrame> {
        let bpp = PixelFormat::Rgba8.bytes_per_pixel();
        let mut data = vec![BACKGROUND_LEVEL; self.width as usize * self.height as usize * bpp];
        for alpha in data.iter_mut().skip(3).step_by(bpp) {
            *alpha = 255;
        }

        if self.hand_visible {
            let rect_w = ((self.width as f32 * self.width_fraction_at(self.frame_index)).round()
                as u32)
                .min(self.width);
            // Odd widths score zero contour area and would read as no hand.
            let rect_w = rect_w - rect_w % 2;
            let rect_h =
                ((self.height as f32 * self.height_fraction).round() as u32).min(self.height);
            let x0 = (self.width - rect_w) / 2;
            let y0 = (self.height - rect_h) / 2;

            for y in y0..y0 + rect_h {
                let row = y as usize * self.width as usize;
                for x in x0..x0 + rect_w {
                    let i = (row + x as usize) * bpp;
                    data[i..i + 3].fill(HAND_LEVEL);
                }
            }
        }

        Ok(VideoFrame::new(data, PixelFormat::Rgba8, self.width, self.height)?
            .with_pts(self.frame_interval * self.frame_index as u32))
    }
}

impl CameraSource for SyntheticHandCamera {
    fn start(&mut self, constraints: &CameraConstraints) -> Result<()> {
        if constraints.width == 0 || constraints.height == 0 {
            return Err(VisionError::CameraUnavailable(format!(
                "cannot synthesize {}x{} frames",
                constraints.width, constraints.height
            )));
        }

        self.width = constraints.width;
        self.height = constraints.height;
        self.frame_index = 0;
        self.streaming = true;
        debug!("Synthetic camera started at {}x{}", self.width, self.height);
        Ok(())
    }

    fn stop(&mut self) {
        self.streaming = false;
    }

    fn is_streaming(&self) -> bool {
        self.streaming
    }

    fn capture_frame(&mut self) -> Result<Option<VideoFrame>> {
        if !self.streaming {
            return Ok(None);
        }
        let frame = self.render()?;
        self.frame_index += 1;
        Ok(Some(frame))
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}
