use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::detector::FaceDetector;
use crate::error::{Error, Result};
use crate::types::{Detection, FaceBox};

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// Scores are SeetaFace classifier scores, not probabilities; pair this
/// backend with a `min_confidence` on that scale (the engine's own threshold
/// already drops anything under `score_thresh`).
pub struct RustfaceDetector {
    model: rustface::Model,
    min_face_size: u32,
    score_thresh: f64,
}

impl RustfaceDetector {
    /// Load a SeetaFace model file such as `seeta_fd_frontal_v1.0.bin`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let model = rustface::read_model(BufReader::new(file))
            .map_err(|e| Error::Detector(format!("failed to load SeetaFace model: {e}")))?;
        Ok(Self {
            model,
            min_face_size: 20,
            score_thresh: 2.0,
        })
    }

    pub fn min_face_size(mut self, size: u32) -> Self {
        self.min_face_size = size;
        self
    }

    pub fn score_thresh(mut self, thresh: f64) -> Self {
        self.score_thresh = thresh;
        self
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<Detection> {
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(self.min_face_size);
        detector.set_score_thresh(self.score_thresh);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray, width, height));

        faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                Detection::new(
                    face.score(),
                    FaceBox::from_xywh(
                        bbox.x(),
                        bbox.y(),
                        i32::try_from(bbox.width()).unwrap_or(i32::MAX),
                        i32::try_from(bbox.height()).unwrap_or(i32::MAX),
                    ),
                )
            })
            .collect()
    }
}
