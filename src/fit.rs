//! Repair orchestration: shift, then shrink, then fall back to the minimal box.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::geometry::minimal_box;
use crate::repair::{fit_by_shifting, fit_by_shrinking};
use crate::types::{FaceBox, ImageBounds, Point};
use crate::validity::is_valid;

/// The step at which fitting produced its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitStage {
    /// The starting box was already valid.
    Original,
    /// Valid after a rigid translation.
    Shifted,
    /// Valid after clamping and trimming to a square.
    Shrunk,
    /// No valid box was found; the box is the minimal bounding box of the
    /// landmarks and may be neither square nor inside the image.
    Minimal,
}

/// Where the starting box came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoxSource {
    /// Index into the detections handed to the selector.
    Detection(usize),
    /// Derived from the landmark points.
    Landmarks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitOutcome {
    pub face_box: FaceBox,
    pub stage: FitStage,
    pub source: BoxSource,
}

impl FitOutcome {
    /// Whether the minimal-box fallback was used. Degraded samples are
    /// usually flagged or excluded from training sets.
    pub fn is_degraded(&self) -> bool {
        self.stage == FitStage::Minimal
    }
}

/// Turn `face_box` into a square, in-image box containing `points`.
///
/// Tries the box itself, then [`fit_by_shifting`], then [`fit_by_shrinking`]
/// on the original box, and finally returns `minimal_box(points)` with
/// [`FitStage::Minimal`]. The only errors are malformed point sets.
pub fn fit_box_to_image(
    face_box: FaceBox,
    points: &[Point],
    bounds: ImageBounds,
    source: BoxSource,
) -> Result<FitOutcome> {
    // Validates the points up front and doubles as the last resort.
    let fallback = minimal_box(points)?;

    let outcome = |face_box: FaceBox, stage: FitStage| FitOutcome {
        face_box,
        stage,
        source,
    };

    if is_valid(&face_box, points, bounds) {
        return Ok(outcome(face_box, FitStage::Original));
    }

    let shifted = fit_by_shifting(face_box, bounds);
    if is_valid(&shifted, points, bounds) {
        debug!(?face_box, ?shifted, "box fitted by shifting");
        return Ok(outcome(shifted, FitStage::Shifted));
    }

    let shrunk = fit_by_shrinking(face_box, bounds);
    if is_valid(&shrunk, points, bounds) {
        debug!(?face_box, ?shrunk, "box fitted by shrinking");
        return Ok(outcome(shrunk, FitStage::Shrunk));
    }

    warn!(
        ?face_box,
        width = bounds.width,
        height = bounds.height,
        "no square in-image box found, using minimal box"
    );
    Ok(outcome(fallback, FitStage::Minimal))
}
