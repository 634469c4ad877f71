//! Choosing the starting box for a sample and fitting it to the image.

use tracing::debug;

use crate::error::{Error, Result};
use crate::fit::{fit_box_to_image, BoxSource, FitOutcome, FitStage};
use crate::geometry::{expand_box, minimal_box, move_box, square_box};
use crate::params::FitParams;
use crate::types::{check_points, Detection, FaceBox, ImageBounds, Point};
use crate::validity::{box_in_image, points_in_box};

/// Find a square, in-image face box that contains every landmark.
///
/// Detections are tried in order. Each usable one is moved down by half its
/// height/width discrepancy and squared; the first square that contains all
/// landmarks becomes the starting box. Without such a detection the starting
/// box is the landmarks' minimal box, squared and expanded by
/// `params.margin_ratio`. A starting box already inside the image is returned
/// as is; otherwise it goes through [`fit_box_to_image`].
///
/// # Example
///
/// ```
/// use face_fit::{fit_face_box, FaceBox, FitParams, FitStage, ImageBounds, Point};
///
/// let points = [
///     Point::new(0.0, 0.0),
///     Point::new(10.0, 0.0),
///     Point::new(10.0, 10.0),
///     Point::new(0.0, 10.0),
/// ];
/// let outcome = fit_face_box(&points, ImageBounds::new(100, 100), &[], &FitParams::default())
///     .unwrap();
/// assert_eq!(outcome.face_box, FaceBox::new(0, 0, 12, 12));
/// assert_eq!(outcome.stage, FitStage::Shifted);
/// ```
pub fn fit_face_box(
    points: &[Point],
    bounds: ImageBounds,
    detections: &[Detection],
    params: &FitParams,
) -> Result<FitOutcome> {
    check_points(points)?;
    params.validate()?;

    let (start, source) = match select_detection(points, detections, params.min_confidence) {
        Some((index, face_box)) => (face_box, BoxSource::Detection(index)),
        None => {
            let min_box = minimal_box(points)?;
            let start = expand_box(square_box(min_box), params.margin_ratio)?;
            (start, BoxSource::Landmarks)
        }
    };
    debug!(?start, ?source, "selected starting box");

    if box_in_image(&start, bounds) {
        return Ok(FitOutcome {
            face_box: start,
            stage: FitStage::Original,
            source,
        });
    }
    fit_box_to_image(start, points, bounds, source)
}

/// The first detection whose recentred square contains all landmarks,
/// with its index. Detections with an edge beyond
/// [`MAX_COORDINATE`](crate::MAX_COORDINATE) are ignored.
pub fn select_detection(
    points: &[Point],
    detections: &[Detection],
    min_confidence: f64,
) -> Option<(usize, FaceBox)> {
    detections
        .iter()
        .enumerate()
        .filter(|(_, d)| d.confidence.is_finite() && d.confidence >= min_confidence)
        .filter(|(index, d)| {
            let in_range = d.face_box.is_in_range();
            if !in_range {
                debug!(index, face_box = ?d.face_box, "ignoring out-of-range detection");
            }
            in_range
        })
        .map(|(index, d)| (index, square_detection(d.face_box)))
        .find(|(_, face_box)| points_in_box(points, face_box))
}

/// Detectors frame the face from the brows down, so the box is lowered by
/// half the height/width discrepancy before squaring.
fn square_detection(face_box: FaceBox) -> FaceBox {
    let offset_y = (face_box.height().saturating_sub(face_box.width()) / 2).abs();
    square_box(move_box(face_box, (0, offset_y)))
}

/// Fit an annotated face rectangle that comes without landmarks.
///
/// The rectangle is squared, expanded by `ratio` and fitted so that the
/// result still covers the original rectangle. Rectangles narrower or
/// shorter than `min_size` are rejected with [`Error::RegionTooSmall`].
pub fn fit_region(
    region: FaceBox,
    bounds: ImageBounds,
    ratio: f64,
    min_size: i32,
) -> Result<FitOutcome> {
    if region.width() < min_size || region.height() < min_size {
        return Err(Error::RegionTooSmall {
            width: region.width(),
            height: region.height(),
            min_size,
        });
    }

    let corners = [
        Point::new(region.left as f32, region.top as f32),
        Point::new(region.right as f32, region.bottom as f32),
    ];
    let start = expand_box(square_box(region), ratio)?;
    fit_box_to_image(start, &corners, bounds, BoxSource::Landmarks)
}
