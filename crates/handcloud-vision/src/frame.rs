//! Captured video frames

use crate::{Result, VisionError};
use image::{RgbImage, RgbaImage};
use std::time::Duration;

/// Pixel layout of a [`VideoFrame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// 8-bit RGBA, as read back from a canvas
    #[default]
    Rgba8,
    /// 8-bit RGB
    Rgb8,
}

impl PixelFormat {
    /// Bytes per pixel
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Rgba8 => 4,
            Self::Rgb8 => 3,
        }
    }
}

/// One captured frame
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    /// Raw pixel bytes, row-major
    pub data: Vec<u8>,
    /// Pixel layout of `data`
    pub format: PixelFormat,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Presentation timestamp relative to stream start
    pub pts: Duration,
}

impl VideoFrame {
    /// Wrap raw bytes, checking the buffer length against the dimensions.
    pub fn new(data: Vec<u8>, format: PixelFormat, width: u32, height: u32) -> Result<Self> {
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if data.len() != expected {
            return Err(VisionError::InvalidFrame(format!(
                "{}x{} {:?} needs {} bytes, got {}",
                width,
                height,
                format,
                expected,
                data.len()
            )));
        }

        Ok(Self {
            data,
            format,
            width,
            height,
            pts: Duration::ZERO,
        })
    }

    /// Take ownership of an RGBA image
    pub fn from_rgba_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            data: image.into_raw(),
            format: PixelFormat::Rgba8,
            width,
            height,
            pts: Duration::ZERO,
        }
    }

    /// Take ownership of an RGB image
    pub fn from_rgb_image(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            data: image.into_raw(),
            format: PixelFormat::Rgb8,
            width,
            height,
            pts: Duration::ZERO,
        }
    }

    /// Set the presentation timestamp
    pub fn with_pts(mut self, pts: Duration) -> Self {
        self.pts = pts;
        self
    }

    /// Number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Iterate `[r, g, b]` triples in row-major order
    pub fn rgb_pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data
            .chunks_exact(self.format.bytes_per_pixel())
            .map(|px| [px[0], px[1], px[2]])
    }
}
