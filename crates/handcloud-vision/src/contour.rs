//! Connected-component extraction by flood fill
//!
//! A "contour" here is every foreground pixel of one 4-connected region, in
//! the order the flood fill visited them. The order is a serpentine walk down
//! and up the columns, not a boundary trace, so [`Contour::area`] is a
//! heuristic. It depends on the parity of the column count: a filled `w x h`
//! rectangle scores `w * (h - 1) / 2` when `w` is even and exactly 0 when `w`
//! is odd, so odd-width regions never pass a minimum-area filter.

use crate::preprocess::BACKGROUND;
use image::GrayImage;

/// Pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    /// Column
    pub x: u32,
    /// Row
    pub y: u32,
}

impl Point {
    /// New point
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Inclusive axis-aligned pixel bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// Leftmost column
    pub min_x: u32,
    /// Topmost row
    pub min_y: u32,
    /// Rightmost column
    pub max_x: u32,
    /// Bottom row
    pub max_y: u32,
}

impl BoundingBox {
    /// Width in pixels, counting both edge columns
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Height in pixels, counting both edge rows
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }
}

/// One connected foreground region
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contour {
    points: Vec<Point>,
}

impl Contour {
    /// Wrap points in visitation order
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Points in visitation order
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of pixels in the region
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the region is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shoelace area over the points in visitation order.
    ///
    /// Fewer than three points have zero area.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }

        let twice_area: f64 = self
            .points
            .iter()
            .zip(self.points.iter().cycle().skip(1))
            .map(|(p1, p2)| {
                p1.x as f64 * p2.y as f64 - p2.x as f64 * p1.y as f64
            })
            .sum();

        twice_area.abs() / 2.0
    }

    /// Bounds of the region, `None` when empty
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.points.first()?;
        let init = BoundingBox {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };

        Some(self.points.iter().fold(init, |b, p| BoundingBox {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }
}

/// Extract every 4-connected foreground region of a binary image, in scan order.
pub fn find_contours(binary: &GrayImage) -> Vec<Contour> {
    let (width, height) = binary.dimensions();
    let pixels = binary.as_raw();
    let mut visited = vec![false; pixels.len()];
    let mut stack = Vec::new();
    let mut contours = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let idx = index(width, x, y);
            if pixels[idx] != BACKGROUND && !visited[idx] {
                let contour = flood_fill(binary, &mut visited, &mut stack, Point::new(x, y));
                contours.push(contour);
            }
        }
    }

    contours
}

/// Iterative fill from `start`; `stack` is scratch space reused across regions.
fn flood_fill(
    binary: &GrayImage,
    visited: &mut [bool],
    stack: &mut Vec<Point>,
    start: Point,
) -> Contour {
    let (width, height) = binary.dimensions();
    let pixels = binary.as_raw();
    let is_open = |visited: &[bool], x: u32, y: u32| {
        let idx = index(width, x, y);
        pixels[idx] != BACKGROUND && !visited[idx]
    };

    let mut points = Vec::new();
    stack.clear();
    stack.push(start);

    while let Some(p) = stack.pop() {
        let idx = index(width, p.x, p.y);
        if visited[idx] {
            continue;
        }
        visited[idx] = true;
        points.push(p);

        // Push order fixes the visitation order the area heuristic depends on.
        if p.x + 1 < width && is_open(visited, p.x + 1, p.y) {
            stack.push(Point::new(p.x + 1, p.y));
        }
        if p.x > 0 && is_open(visited, p.x - 1, p.y) {
            stack.push(Point::new(p.x - 1, p.y));
        }
        if p.y + 1 < height && is_open(visited, p.x, p.y + 1) {
            stack.push(Point::new(p.x, p.y + 1));
        }
        if p.y > 0 && is_open(visited, p.x, p.y - 1) {
            stack.push(Point::new(p.x, p.y - 1));
        }
    }

    Contour { points }
}

/// Largest contour by [`Contour::area`] among those with at least `min_area`
/// and at least `min_points` pixels. Ties go to the earliest contour.
pub fn largest_contour(contours: &[Contour], min_area: f64, min_points: usize) -> Option<&Contour> {
    contours
        .iter()
        .filter(|c| c.len() >= min_points)
        .map(|c| (c, c.area()))
        .filter(|(_, area)| *area >= min_area)
        .fold(None, |best: Option<(&Contour, f64)>, (c, area)| match best {
            Some((_, best_area)) if area <= best_area => best,
            _ => Some((c, area)),
        })
        .map(|(c, _)| c)
}

#[inline]
fn index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}
