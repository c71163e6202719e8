//! Headless renderers
//!
//! `SnapshotRenderer` splats the cloud through a perspective camera into PNG
//! files. `StatsRenderer` only tracks and logs the cloud extent.

use glam::{Mat4, Vec3};
use handcloud_core::{ParticleRenderer, RenderFrame};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Vertical field of view in degrees
pub const FOV_Y_DEGREES: f32 = 75.0;
/// Camera position on the +Z axis, looking at the origin
pub const EYE_DISTANCE: f32 = 10.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;

/// Particle projected to the image plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// Column in pixels
    pub x: f32,
    /// Row in pixels, 0 at the top
    pub y: f32,
    /// Sprite radius in pixels
    pub radius: f32,
}

/// Perspective camera looking down -Z from `(0, 0, EYE_DISTANCE)`
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveCamera {
    view_proj: Mat4,
    width: u32,
    height: u32,
    focal: f32,
}

impl PerspectiveCamera {
    /// Camera for a `width` x `height` image
    pub fn new(width: u32, height: u32) -> Self {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        let fov = FOV_Y_DEGREES.to_radians();
        let proj = Mat4::perspective_rh(fov, aspect, NEAR, FAR);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, EYE_DISTANCE), Vec3::ZERO, Vec3::Y);
        Self {
            view_proj: proj * view,
            width,
            height,
            focal: height as f32 / (2.0 * (fov / 2.0).tan()),
        }
    }

    /// Project a world-space point; `None` when behind the camera or off screen.
    pub fn project(&self, world: Vec3, size: f32) -> Option<ScreenPoint> {
        let clip = self.view_proj * world.extend(1.0);
        if clip.w <= NEAR {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 {
            return None;
        }
        Some(ScreenPoint {
            x: (ndc.x + 1.0) * 0.5 * self.width as f32,
            y: (1.0 - ndc.y) * 0.5 * self.height as f32,
            radius: (size * self.focal / clip.w * 0.5).max(1.0),
        })
    }
}

/// Writes every `every`-th frame as `frame_NNNNNN.png`
pub struct SnapshotRenderer {
    dir: PathBuf,
    every: u64,
    camera: PerspectiveCamera,
    width: u32,
    height: u32,
    written: Vec<PathBuf>,
    failures: usize,
}

impl SnapshotRenderer {
    /// Renderer writing into `dir`, which must exist
    pub fn new(dir: &Path, every: u64, width: u32, height: u32) -> Self {
        Self {
            dir: dir.to_path_buf(),
            every: every.max(1),
            camera: PerspectiveCamera::new(width, height),
            width,
            height,
            written: Vec::new(),
            failures: 0,
        }
    }

    /// Files written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Snapshots that failed to save
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Rasterize one frame
    pub fn rasterize(&self, frame: &RenderFrame<'_>) -> RgbaImage {
        let (w, h) = (self.width as usize, self.height as usize);
        let mut accum = vec![[0.0f32; 3]; w * h];
        let model = frame.transform.matrix();
        let opacity = frame.style.opacity.clamp(0.0, 1.0);

        for (position, color) in frame.positions.iter().zip(frame.colors) {
            let Some(p) = self.camera.project(model.transform_point3(*position), frame.style.size)
            else {
                continue;
            };

            let r = p.radius;
            let x0 = (p.x - r).floor().max(0.0) as usize;
            let y0 = (p.y - r).floor().max(0.0) as usize;
            let x1 = ((p.x + r).ceil() as usize).min(w);
            let y1 = ((p.y + r).ceil() as usize).min(h);

            for y in y0..y1 {
                for x in x0..x1 {
                    let dx = x as f32 + 0.5 - p.x;
                    let dy = y as f32 + 0.5 - p.y;
                    if dx * dx + dy * dy > r * r {
                        continue;
                    }
                    let px = &mut accum[y * w + x];
                    for (dst, &src) in px.iter_mut().zip(color.iter()) {
                        *dst = if frame.style.additive {
                            *dst + src * opacity
                        } else {
                            *dst * (1.0 - opacity) + src * opacity
                        };
                    }
                }
            }
        }

        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let px = accum[y as usize * w + x as usize];
            let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            Rgba([to_u8(px[0]), to_u8(px[1]), to_u8(px[2]), 255])
        })
    }
}

impl ParticleRenderer for SnapshotRenderer {
    fn present(&mut self, frame: &RenderFrame<'_>) {
        if frame.frame_index % self.every != 0 {
            return;
        }

        let path = self.dir.join(format!("frame_{:06}.png", frame.frame_index));
        match self.rasterize(frame).save(&path) {
            Ok(()) => {
                debug!("Snapshot written: {}", path.display());
                self.written.push(path);
            }
            Err(e) => {
                error!("Failed to write snapshot {}: {}", path.display(), e);
                self.failures += 1;
            }
        }
    }
}

/// Logs cloud extent and scale
#[derive(Debug, Default)]
pub struct StatsRenderer {
    frames: u64,
    last_scale: f32,
    last_extent: Option<(Vec3, Vec3)>,
    log_every: u64,
}

impl StatsRenderer {
    /// Log once every `log_every` frames
    pub fn new(log_every: u64) -> Self {
        Self {
            log_every: log_every.max(1),
            ..Default::default()
        }
    }

    /// Log the final summary
    pub fn summarize(&self) {
        if let Some((min, max)) = self.last_extent {
            info!(
                "Rendered {} frames, final scale {:.3}, extent {:?}",
                self.frames,
                self.last_scale,
                max - min
            );
        } else {
            info!("Rendered {} frames", self.frames);
        }
    }
}

impl ParticleRenderer for StatsRenderer {
    fn present(&mut self, frame: &RenderFrame<'_>) {
        self.frames += 1;
        self.last_scale = frame.transform.scale;

        let model = frame.transform.matrix();
        self.last_extent = frame
            .positions
            .iter()
            .map(|p| model.transform_point3(*p))
            .fold(None, |acc, p| match acc {
                None => Some((p, p)),
                Some((min, max)) => Some((min.min(p), max.max(p))),
            });

        if self.frames % self.log_every == 0 {
            debug!(
                frame = frame.frame_index,
                scale = frame.transform.scale,
                extent = ?self.last_extent.map(|(min, max)| max - min),
                "cloud"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handcloud_core::{FrameTransform, PointStyle};

    fn frame<'a>(positions: &'a [Vec3], colors: &'a [[f32; 3]], index: u64) -> RenderFrame<'a> {
        RenderFrame {
            frame_index: index,
            positions,
            colors,
            transform: FrameTransform::default(),
            style: PointStyle::default(),
        }
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = PerspectiveCamera::new(800, 600);
        let p = camera.project(Vec3::ZERO, 0.1).unwrap();
        assert!((p.x - 400.0).abs() < 1e-3);
        assert!((p.y - 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_up_is_up_on_screen() {
        let camera = PerspectiveCamera::new(800, 600);
        let p = camera.project(Vec3::new(0.0, 2.0, 0.0), 0.1).unwrap();
        assert!(p.y < 300.0);
    }

    #[test]
    fn test_points_behind_camera_are_culled() {
        let camera = PerspectiveCamera::new(800, 600);
        assert!(camera.project(Vec3::new(0.0, 0.0, 20.0), 0.1).is_none());
        assert!(camera.project(Vec3::new(500.0, 0.0, 0.0), 0.1).is_none());
    }

    #[test]
    fn test_rasterize_lights_center() {
        let renderer = SnapshotRenderer::new(Path::new("."), 1, 64, 48);
        let positions = [Vec3::ZERO];
        let colors = [[1.0, 1.0, 1.0]];
        let image = renderer.rasterize(&frame(&positions, &colors, 1));
        assert!(image.get_pixel(32, 24)[0] > 0);
        assert_eq!(image.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_snapshot_cadence() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = SnapshotRenderer::new(dir.path(), 2, 32, 24);
        let positions = [Vec3::ZERO];
        let colors = [[1.0, 0.0, 0.0]];
        for i in 1..=5 {
            renderer.present(&frame(&positions, &colors, i));
        }
        assert_eq!(renderer.written().len(), 2);
        assert!(dir.path().join("frame_000002.png").exists());
        assert!(dir.path().join("frame_000004.png").exists());
        assert_eq!(renderer.failures(), 0);
    }

    #[test]
    fn test_stats_track_scaled_extent() {
        let mut stats = StatsRenderer::new(10);
        let positions = [Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 0.0)];
        let colors = [[1.0; 3]; 2];
        let mut f = frame(&positions, &colors, 1);
        f.transform.scale = 2.0;
        stats.present(&f);

        let (min, max) = stats.last_extent.unwrap();
        assert_eq!(min, Vec3::new(-2.0, 0.0, 0.0));
        assert_eq!(max, Vec3::new(2.0, 4.0, 0.0));
        assert_eq!(stats.frames, 1);
        assert_eq!(stats.last_scale, 2.0);
    }
}
