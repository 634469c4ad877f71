//! Cropping fitted face boxes out of images for training sets.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fit::{FitOutcome, FitStage};
use crate::types::{FaceBox, ImageBounds, Shape};

/// A face crop ready to be written, with landmarks relative to the crop.
#[derive(Debug, Clone)]
pub struct FaceCrop {
    /// `target_size` × `target_size` pixels.
    pub image: DynamicImage,

    /// Landmarks normalized to [0,1] over the crop region.
    pub points: Shape,

    /// The part of the source image that was cropped.
    pub region: FaceBox,
}

/// Metadata written next to each exported crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropLabel {
    /// Normalized landmarks as `[x0, y0, x1, y1, ...]`.
    pub points: Vec<f32>,

    /// The fitted box in source-image pixels.
    pub face_box: FaceBox,

    /// The part of the source image that was cropped.
    pub region: FaceBox,

    pub stage: FitStage,

    /// Set when the fit fell back to the minimal box, so the crop may be
    /// neither square nor fully inside the image.
    pub degraded: bool,
}

impl CropLabel {
    pub fn new(crop: &FaceCrop, outcome: &FitOutcome) -> Self {
        Self {
            points: crop.points.to_flat_vec(),
            face_box: outcome.face_box,
            region: crop.region,
            stage: outcome.stage,
            degraded: outcome.is_degraded(),
        }
    }
}

/// Crop `face_box` out of `image`, resize it to `target_size` and map the
/// landmarks into normalized crop coordinates.
///
/// The crop is the overlap of the box with the image, so degraded
/// (minimal-box) fits that stick out of the image still produce a crop.
pub fn extract_face(
    image: &DynamicImage,
    shape: &Shape,
    face_box: FaceBox,
    target_size: u32,
) -> Result<FaceCrop> {
    if target_size == 0 {
        return Err(Error::InvalidParams("target_size must be > 0".to_string()));
    }

    let (width, height) = image.dimensions();
    let region = face_box
        .intersect(ImageBounds::new(width, height))
        .ok_or(Error::EmptyCrop)?;

    let mut face = image.crop_imm(
        region.left as u32,
        region.top as u32,
        region.width() as u32,
        region.height() as u32,
    );
    if face.width() != target_size || face.height() != target_size {
        face = face.resize_exact(target_size, target_size, FilterType::Triangle);
    }

    let points = shape
        .points
        .iter()
        .map(|&p| region.normalize_point(p))
        .collect();

    Ok(FaceCrop {
        image: face,
        points: Shape::new(points),
        region,
    })
}

/// Pad a non-square image onto a square canvas filled with `fill`, centering
/// the original along its short axis. Square images are returned unchanged.
pub fn pad_to_square(image: &DynamicImage, fill: Rgb<u8>) -> DynamicImage {
    let (width, height) = image.dimensions();
    if width == height {
        return image.clone();
    }

    let side = width.max(height);
    let mut canvas = RgbImage::from_pixel(side, side, fill);
    let x = (side - width) / 2;
    let y = (side - height) / 2;
    image::imageops::overlay(&mut canvas, &image.to_rgb8(), x as i64, y as i64);
    DynamicImage::ImageRgb8(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::BoxSource;
    use crate::types::Point;
    use approx::assert_relative_eq;

    fn make_test_image(width: u32, height: u32) -> DynamicImage {
        let mut img = RgbImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgb([
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                128,
            ]);
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn crops_and_resizes_to_target() {
        let image = make_test_image(200, 150);
        let shape = Shape::new(vec![Point::new(60.0, 60.0), Point::new(100.0, 100.0)]);
        let crop = extract_face(&image, &shape, FaceBox::new(50, 50, 110, 110), 32).unwrap();

        assert_eq!(crop.image.dimensions(), (32, 32));
        assert_eq!(crop.region, FaceBox::new(50, 50, 110, 110));
        assert_relative_eq!(crop.points[0].x, 10.0 / 60.0);
        assert_relative_eq!(crop.points[1].y, 50.0 / 60.0);
    }

    #[test]
    fn crop_already_at_target_size_is_not_resampled() {
        let image = make_test_image(64, 64);
        let shape = Shape::new(vec![Point::new(10.0, 10.0)]);
        let crop = extract_face(&image, &shape, FaceBox::new(0, 0, 32, 32), 32).unwrap();
        assert_eq!(
            crop.image.to_rgb8().get_pixel(5, 7),
            image.to_rgb8().get_pixel(5, 7)
        );
    }

    #[test]
    fn degraded_box_is_clipped_to_image() {
        let image = make_test_image(100, 50);
        let shape = Shape::new(vec![Point::new(10.0, 10.0)]);
        let crop = extract_face(&image, &shape, FaceBox::new(-10, -10, 60, 60), 16).unwrap();
        assert_eq!(crop.region, FaceBox::new(0, 0, 60, 50));
        assert_eq!(crop.image.dimensions(), (16, 16));
    }

    #[test]
    fn disjoint_box_is_an_error() {
        let image = make_test_image(100, 50);
        let shape = Shape::new(vec![Point::new(10.0, 10.0)]);
        let err = extract_face(&image, &shape, FaceBox::new(120, 0, 140, 20), 16).unwrap_err();
        assert!(matches!(err, Error::EmptyCrop));
    }

    #[test]
    fn label_marks_degraded_fits() {
        let image = make_test_image(100, 50);
        let shape = Shape::new(vec![Point::new(5.0, 10.0), Point::new(95.0, 40.0)]);
        let outcome = FitOutcome {
            face_box: FaceBox::new(5, 10, 95, 40),
            stage: FitStage::Minimal,
            source: BoxSource::Landmarks,
        };
        let crop = extract_face(&image, &shape, outcome.face_box, 16).unwrap();
        let label = CropLabel::new(&crop, &outcome);

        assert!(label.degraded);
        assert_eq!(label.points.len(), 4);
        let json: serde_json::Value = serde_json::to_value(&label).unwrap();
        assert_eq!(json["stage"], "Minimal");
        assert_eq!(json["degraded"], true);
        assert_eq!(json["region"]["right"], 95);
    }

    #[test]
    fn label_of_clean_fit_is_not_degraded() {
        let image = make_test_image(64, 64);
        let shape = Shape::new(vec![Point::new(10.0, 10.0)]);
        let outcome = FitOutcome {
            face_box: FaceBox::new(0, 0, 32, 32),
            stage: FitStage::Shifted,
            source: BoxSource::Detection(0),
        };
        let crop = extract_face(&image, &shape, outcome.face_box, 32).unwrap();
        let label = CropLabel::new(&crop, &outcome);
        assert!(!label.degraded);
        assert_eq!(label.stage, FitStage::Shifted);
        assert_relative_eq!(label.points[0], 10.0 / 32.0);
    }

    #[test]
    fn pads_wide_image_vertically() {
        let image = make_test_image(40, 20);
        let padded = pad_to_square(&image, Rgb([200, 200, 200]));
        assert_eq!(padded.dimensions(), (40, 40));

        let rgb = padded.to_rgb8();
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([200, 200, 200]));
        // Original rows start at y = 10.
        assert_eq!(rgb.get_pixel(0, 10), image.to_rgb8().get_pixel(0, 0));
    }

    #[test]
    fn square_image_is_unchanged() {
        let image = make_test_image(30, 30);
        assert_eq!(pad_to_square(&image, Rgb([0, 0, 0])).dimensions(), (30, 30));
    }
}
