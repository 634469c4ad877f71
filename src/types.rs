use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Largest landmark coordinate magnitude, in pixels, that box fitting
/// accepts. Keeps squaring and expansion of any accepted point set well
/// inside `i32`.
pub const MAX_COORDINATE: f32 = 1e8;

/// A 2D point with floating-point coordinates in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An axis-aligned box in integer pixel coordinates.
///
/// `right` and `bottom` are exclusive edges, so `width = right - left`.
/// Boxes produced by this crate always keep `left <= right` and
/// `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl FaceBox {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build a box from a top-left corner and a size, the layout most
    /// face detectors report.
    pub const fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x.saturating_add(width), y.saturating_add(height))
    }

    /// Saturates at `i32::MAX` for boxes wider than `i32` can hold.
    pub const fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    pub const fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Whether every edge lies within [`MAX_COORDINATE`] of the origin.
    pub fn is_in_range(&self) -> bool {
        let limit = MAX_COORDINATE as i32;
        [self.left, self.top, self.right, self.bottom]
            .iter()
            .all(|v| (-limit..=limit).contains(v))
    }

    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    /// Overlap of this box with the image, or `None` when they are disjoint.
    pub fn intersect(&self, bounds: ImageBounds) -> Option<FaceBox> {
        let left = self.left.max(0);
        let top = self.top.max(0);
        let right = self.right.min(bounds.width_i32());
        let bottom = self.bottom.min(bounds.height_i32());
        if left < right && top < bottom {
            Some(FaceBox::new(left, top, right, bottom))
        } else {
            None
        }
    }

    /// Convert a point from image coordinates to normalized [0,1] coordinates
    /// relative to this box.
    pub fn normalize_point(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.left as f32) / self.width() as f32,
            (p.y - self.top as f32) / self.height() as f32,
        )
    }
}

/// Pixel dimensions of the image a box must fit into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBounds {
    pub width: u32,
    pub height: u32,
}

impl ImageBounds {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub(crate) fn width_i32(&self) -> i32 {
        i32::try_from(self.width).unwrap_or(i32::MAX)
    }

    pub(crate) fn height_i32(&self) -> i32 {
        i32::try_from(self.height).unwrap_or(i32::MAX)
    }
}

/// A face candidate reported by a detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Detector score. Its scale depends on the backend.
    pub confidence: f64,
    pub face_box: FaceBox,
}

impl Detection {
    pub const fn new(confidence: f64, face_box: FaceBox) -> Self {
        Self {
            confidence,
            face_box,
        }
    }
}

/// The landmark points annotated on one image.
/// The iBUG annotation scheme uses 68 landmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub points: Vec<Point>,
}

impl Shape {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn num_landmarks(&self) -> usize {
        self.points.len()
    }

    /// Check the landmark count and that every coordinate is finite and
    /// within [`MAX_COORDINATE`].
    pub fn validate(&self, expected: usize) -> Result<()> {
        if self.points.len() != expected {
            return Err(Error::LandmarkCount {
                expected,
                found: self.points.len(),
            });
        }
        check_points(&self.points)
    }

    /// Flatten shape to a vector of [x0, y0, x1, y1, ...] coordinates.
    pub fn to_flat_vec(&self) -> Vec<f32> {
        let mut v = Vec::with_capacity(self.points.len() * 2);
        for p in &self.points {
            v.push(p.x);
            v.push(p.y);
        }
        v
    }
}

impl std::ops::Index<usize> for Shape {
    type Output = Point;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.points[idx]
    }
}

/// Reject empty point sets, non-finite coordinates and coordinates beyond
/// [`MAX_COORDINATE`].
pub(crate) fn check_points(points: &[Point]) -> Result<()> {
    if points.is_empty() {
        return Err(Error::EmptyPoints);
    }
    for (index, p) in points.iter().enumerate() {
        if !p.is_finite() {
            return Err(Error::NonFiniteCoordinate { index });
        }
        if p.x.abs() > MAX_COORDINATE || p.y.abs() > MAX_COORDINATE {
            return Err(Error::CoordinateOutOfRange { index });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_box_dimensions() {
        let b = FaceBox::from_xywh(10, 20, 30, 40);
        assert_eq!(b, FaceBox::new(10, 20, 40, 60));
        assert_eq!(b.width(), 30);
        assert_eq!(b.height(), 40);
        assert_eq!(b.area(), 1200);
    }

    #[test]
    fn face_box_dimensions_saturate() {
        let tall = FaceBox::new(0, -2_000_000_000, 10, 2_000_000_000);
        assert_eq!(tall.height(), i32::MAX);
        assert_eq!(tall.width(), 10);
        assert!(!tall.is_in_range());
        assert!(FaceBox::new(-100, 0, 100_000_000, 50).is_in_range());

        let wide = FaceBox::from_xywh(i32::MAX - 5, 0, 100, 10);
        assert_eq!(wide.right, i32::MAX);
    }

    #[test]
    fn face_box_normalization() {
        let b = FaceBox::new(100, 100, 300, 300);

        let center = b.normalize_point(Point::new(200.0, 200.0));
        assert!((center.x - 0.5).abs() < 1e-6);
        assert!((center.y - 0.5).abs() < 1e-6);

        let corner = b.normalize_point(Point::new(300.0, 100.0));
        assert_eq!(corner, Point::new(1.0, 0.0));
    }

    #[test]
    fn intersect_clips_to_image() {
        let bounds = ImageBounds::new(50, 40);
        assert_eq!(
            FaceBox::new(-10, -5, 30, 60).intersect(bounds),
            Some(FaceBox::new(0, 0, 30, 40))
        );
        assert_eq!(FaceBox::new(60, 0, 80, 10).intersect(bounds), None);
    }

    #[test]
    fn shape_validation() {
        let shape = Shape::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert!(shape.validate(2).is_ok());
        assert!(matches!(
            shape.validate(68),
            Err(Error::LandmarkCount {
                expected: 68,
                found: 2
            })
        ));

        let bad = Shape::new(vec![Point::new(0.0, 0.0), Point::new(f32::NAN, 1.0)]);
        assert!(matches!(
            bad.validate(2),
            Err(Error::NonFiniteCoordinate { index: 1 })
        ));
    }

    #[test]
    fn huge_coordinates_are_rejected() {
        let far = Shape::new(vec![Point::new(0.0, 0.0), Point::new(2e9, 0.0)]);
        let err = far.validate(2).unwrap_err();
        assert!(matches!(err, Error::CoordinateOutOfRange { index: 1 }));
        assert!(err.is_invalid_argument());

        let edge = Shape::new(vec![Point::new(-MAX_COORDINATE, MAX_COORDINATE)]);
        assert!(edge.validate(1).is_ok());
    }

    #[test]
    fn shape_flattening() {
        let shape = Shape::new(vec![Point::new(0.1, 0.2), Point::new(0.3, 0.4)]);
        assert_eq!(shape.to_flat_vec(), vec![0.1, 0.2, 0.3, 0.4]);
        assert_eq!(shape[1], Point::new(0.3, 0.4));
    }
}
