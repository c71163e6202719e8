//! Grayscale conversion and binarization

use crate::{Result, VideoFrame, VisionError};
use image::GrayImage;

/// Foreground value in a binary image
pub const FOREGROUND: u8 = 255;
/// Background value in a binary image
pub const BACKGROUND: u8 = 0;

/// Intensity of each pixel as the rounded mean of its red, green and blue channels.
pub fn grayscale(frame: &VideoFrame) -> Result<GrayImage> {
    let data: Vec<u8> = frame
        .rgb_pixels()
        .map(|[r, g, b]| ((r as u16 + g as u16 + b as u16 + 1) / 3) as u8)
        .collect();

    GrayImage::from_raw(frame.width, frame.height, data).ok_or_else(|| {
        VisionError::InvalidFrame(format!(
            "{}x{} frame has {} bytes",
            frame.width,
            frame.height,
            frame.data.len()
        ))
    })
}

/// Binarize in place: below `cutoff` becomes background, the rest foreground.
pub fn threshold(gray: &mut GrayImage, cutoff: u8) {
    for value in gray.iter_mut() {
        *value = if *value < cutoff { BACKGROUND } else { FOREGROUND };
    }
}

/// Grayscale then threshold
pub fn binarize(frame: &VideoFrame, cutoff: u8) -> Result<GrayImage> {
    let mut gray = grayscale(frame)?;
    threshold(&mut gray, cutoff);
    Ok(gray)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PixelFormat;

    fn frame(pixels: &[[u8; 3]]) -> VideoFrame {
        let data = pixels.iter().flat_map(|p| [p[0], p[1], p[2], 255]).collect();
        VideoFrame::new(data, PixelFormat::Rgba8, pixels.len() as u32, 1).unwrap()
    }

    #[test]
    fn test_grayscale_is_channel_mean() {
        let gray = grayscale(&frame(&[[0, 0, 0], [255, 255, 255], [90, 100, 110], [100, 100, 101]]))
            .unwrap();
        assert_eq!(gray.as_raw(), &vec![0, 255, 100, 100]);
    }

    #[test]
    fn test_grayscale_rounds_to_nearest() {
        // 299 / 3 = 99.67
        let gray = grayscale(&frame(&[[99, 100, 100]])).unwrap();
        assert_eq!(gray.as_raw()[0], 100);
    }

    #[test]
    fn test_threshold_boundary() {
        let binary = binarize(&frame(&[[99, 99, 99], [100, 100, 100], [200, 200, 200]]), 100)
            .unwrap();
        assert_eq!(binary.as_raw(), &vec![BACKGROUND, FOREGROUND, FOREGROUND]);
    }
}
