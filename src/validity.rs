//! Predicates deciding whether a box is usable as a face crop.

use crate::types::{FaceBox, ImageBounds, Point};

/// True when the box covers the minimal bounding box of `points`.
///
/// Vacuously true for an empty point set.
pub fn points_in_box(points: &[Point], b: &FaceBox) -> bool {
    points.iter().all(|p| {
        b.left as f32 <= p.x.floor()
            && b.top as f32 <= p.y.floor()
            && b.right as f32 >= p.x.ceil()
            && b.bottom as f32 >= p.y.ceil()
    })
}

/// True when all four edges lie within `[0, width] x [0, height]`.
pub fn box_in_image(b: &FaceBox, bounds: ImageBounds) -> bool {
    b.left >= 0
        && b.top >= 0
        && b.right <= bounds.width_i32()
        && b.bottom <= bounds.height_i32()
}

pub fn is_square(b: &FaceBox) -> bool {
    b.width() == b.height()
}

/// A box is valid when it is square, inside the image and contains every
/// landmark.
pub fn is_valid(b: &FaceBox, points: &[Point], bounds: ImageBounds) -> bool {
    is_square(b) && box_in_image(b, bounds) && points_in_box(points, b)
}

/// True when the landmarks themselves lie inside the image.
///
/// Annotation files whose points fall outside the image are usually corrupt;
/// batch drivers reject them before fitting.
pub fn points_in_image(points: &[Point], bounds: ImageBounds) -> bool {
    crate::geometry::minimal_box(points)
        .map(|b| box_in_image(&b, bounds))
        .unwrap_or(false)
}
