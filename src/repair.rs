//! Strategies that pull an out-of-image box back inside the image.
//!
//! Neither strategy claims success; the caller re-validates the result.

use crate::types::{FaceBox, ImageBounds};

/// Translate the box rigidly so that crossed edges move back inside.
///
/// Only attempted when the box is no larger than the image on both axes;
/// otherwise the box is returned unchanged. Horizontal correction runs
/// before vertical correction. Size and squareness are preserved.
pub fn fit_by_shifting(b: FaceBox, bounds: ImageBounds) -> FaceBox {
    let cols = bounds.width_i32();
    let rows = bounds.height_i32();

    if b.width() > cols || b.height() > rows {
        return b;
    }

    let mut dx = 0;
    if b.left < 0 {
        dx = b.left.saturating_neg();
    } else if b.right > cols {
        dx = cols - b.right;
    }

    let mut dy = 0;
    if b.top < 0 {
        dy = b.top.saturating_neg();
    } else if b.bottom > rows {
        dy = rows - b.bottom;
    }

    crate::geometry::move_box(b, (dx, dy))
}

/// Clamp the box to the image, then trim the longer axis back to a square.
///
/// The longer axis loses `delta = |width - height|`. When neither end of that
/// axis sits on the image border the cut is split, with the odd unit taken
/// from the second end (right or bottom). When an end touches the border the
/// whole cut comes from the other end. The result is always in-image and
/// square, but may no longer contain every landmark.
pub fn fit_by_shrinking(b: FaceBox, bounds: ImageBounds) -> FaceBox {
    let cols = bounds.width_i32();
    let rows = bounds.height_i32();

    let mut out = FaceBox::new(
        b.left.clamp(0, cols),
        b.top.clamp(0, rows),
        b.right.clamp(0, cols),
        b.bottom.clamp(0, rows),
    );

    let width = out.width();
    let height = out.height();
    let delta = (width - height).abs();
    let half = delta / 2;
    let extra = delta % 2;

    if width > height {
        if out.left != 0 && out.right != cols {
            out.left += half;
            out.right -= half + extra;
        } else if out.left == 0 {
            out.right -= delta;
        } else {
            out.left += delta;
        }
    } else if height > width {
        if out.top != 0 && out.bottom != rows {
            out.top += half;
            out.bottom -= half + extra;
        } else if out.top == 0 {
            out.bottom -= delta;
        } else {
            out.top += delta;
        }
    }

    out
}
