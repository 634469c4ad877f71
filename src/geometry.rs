//! Box arithmetic over landmark point sets.
//!
//! All functions are pure: they take boxes by value and return new ones.
//! Edge arithmetic saturates at the `i32` limits instead of wrapping.

use crate::error::{Error, Result};
use crate::types::{check_points, FaceBox, Point};

/// Slack added before flooring the expansion delta, so ratios that are not
/// exactly representable (1.2, 1.3, ...) do not lose a pixel.
const EXPAND_EPSILON: f64 = 1e-9;

/// Smallest integer box containing every point.
///
/// Uses floor for the leading edges and ceil for the trailing edges so the
/// box still contains the points after integer conversion.
pub fn minimal_box(points: &[Point]) -> Result<FaceBox> {
    check_points(points)?;

    let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
    let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    Ok(FaceBox::new(
        min_x.floor() as i32,
        min_y.floor() as i32,
        max_x.ceil() as i32,
        max_y.ceil() as i32,
    ))
}

/// Grow the short side of a box until it is square.
///
/// The growth is split between both edges of the short axis. When the
/// difference is odd the extra unit goes to the second edge (right or
/// bottom), so squaring an already squared box is a no-op.
pub fn square_box(b: FaceBox) -> FaceBox {
    let diff = b.height().saturating_sub(b.width());
    if diff == 0 {
        return b;
    }

    let delta = (diff / 2).abs();
    let extra = (diff % 2).abs();
    let mut out = b;
    if diff > 0 {
        // Slim box: widen.
        out.left = out.left.saturating_sub(delta);
        out.right = out.right.saturating_add(delta).saturating_add(extra);
    } else {
        // Short box: heighten.
        out.top = out.top.saturating_sub(delta);
        out.bottom = out.bottom.saturating_add(delta).saturating_add(extra);
    }
    out
}

/// Translate a box by `(dx, dy)`. No clamping.
pub fn move_box(b: FaceBox, offset: (i32, i32)) -> FaceBox {
    let (dx, dy) = offset;
    FaceBox::new(
        b.left.saturating_add(dx),
        b.top.saturating_add(dy),
        b.right.saturating_add(dx),
        b.bottom.saturating_add(dy),
    )
}

/// Scale a box about its center.
///
/// The margin added to every edge is `floor(width * (ratio - 1) / 2)`, so a
/// square input stays square. Fails with [`Error::InvalidRatio`] when `ratio`
/// is below 1 or not finite.
pub fn expand_box(b: FaceBox, ratio: f64) -> Result<FaceBox> {
    if !ratio.is_finite() || ratio < 1.0 {
        return Err(Error::InvalidRatio(ratio));
    }

    // The float-to-int cast saturates for huge ratios.
    let delta = (b.width() as f64 * (ratio - 1.0) / 2.0 + EXPAND_EPSILON).floor() as i32;
    Ok(FaceBox::new(
        b.left.saturating_sub(delta),
        b.top.saturating_sub(delta),
        b.right.saturating_add(delta),
        b.bottom.saturating_add(delta),
    ))
}
