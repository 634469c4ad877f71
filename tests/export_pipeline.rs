//! Read a .pts file next to an image, fit a box and export the crop.

use face_fit::{
    extract_face, fit_face_box, points_in_image, read_pts, CropLabel, ExportParams, FitParams,
    FitStage, ImageBounds,
};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use std::fmt::Write as _;

/// 68 points on a 17x4 grid, roughly where a face sits in a 160x120 frame.
fn write_pts(path: &std::path::Path) {
    let mut text = String::from("version: 1\nn_points:  68\n{\n");
    for i in 0..68 {
        let x = 50.0 + (i % 17) as f32 * 3.5;
        let y = 30.0 + (i / 17) as f32 * 15.25;
        writeln!(text, "{x:.6} {y:.6}").unwrap();
    }
    text.push_str("}\n");
    std::fs::write(path, text).unwrap();
}

fn write_png(path: &std::path::Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 64]));
    img.save(path).unwrap();
}

#[test]
fn pts_to_normalized_crop() {
    let dir = tempfile::tempdir().unwrap();
    let pts_path = dir.path().join("face_001.pts");
    let png_path = dir.path().join("face_001.png");
    write_pts(&pts_path);
    write_png(&png_path, 160, 120);

    let params = ExportParams::default();
    let shape = read_pts(&pts_path).unwrap();
    shape.validate(params.expected_landmarks).unwrap();

    let image: DynamicImage = image::open(&png_path).unwrap();
    let (w, h) = image.dimensions();
    let bounds = ImageBounds::new(w, h);
    assert!(points_in_image(&shape.points, bounds));

    let outcome = fit_face_box(&shape.points, bounds, &[], &FitParams::default()).unwrap();
    assert_eq!(outcome.stage, FitStage::Original);

    let crop = extract_face(&image, &shape, outcome.face_box, params.target_size).unwrap();
    assert_eq!(crop.image.dimensions(), (128, 128));
    assert_eq!(crop.points.num_landmarks(), 68);
    for p in &crop.points.points {
        assert!((0.0..=1.0).contains(&p.x), "x out of range: {}", p.x);
        assert!((0.0..=1.0).contains(&p.y), "y out of range: {}", p.y);
    }

    let json_path = dir.path().join("face_001.json");
    std::fs::write(&json_path, serde_json::to_string(&CropLabel::new(&crop, &outcome)).unwrap())
        .unwrap();
    let back: CropLabel =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(back.points.len(), 136);
    assert_eq!(back.stage, FitStage::Original);
    assert!(!back.degraded);
    assert_eq!(back.face_box, outcome.face_box);
}

#[test]
fn wrong_landmark_count_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let pts_path = dir.path().join("short.pts");
    std::fs::write(&pts_path, "version: 1\nn_points: 2\n{\n1 2\n3 4\n}\n").unwrap();

    let shape = read_pts(&pts_path).unwrap();
    let err = shape.validate(68).unwrap_err();
    assert!(err.is_invalid_argument());
}
