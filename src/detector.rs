use crate::error::Result;
use crate::fit::FitOutcome;
use crate::params::FitParams;
use crate::select::fit_face_box;
use crate::types::{Detection, ImageBounds, Shape};

/// Pluggable face detection backend.
///
/// Implement this trait to feed detections from any engine into
/// [`FaceBoxFitter`]. Closures with the matching signature implement it too,
/// which keeps tests free of model files.
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a row-major grayscale buffer of `width` × `height` bytes.
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<Detection>;
}

impl<F> FaceDetector for F
where
    F: Fn(&[u8], u32, u32) -> Vec<Detection> + Send + Sync,
{
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<Detection> {
        self(gray, width, height)
    }
}

/// Fits face boxes for whole images, running the configured detector first.
///
/// ```
/// use face_fit::{Detection, FaceBox, FaceBoxFitter, Point, Shape};
///
/// let fitter = FaceBoxFitter::new().face_detector(Box::new(
///     |_gray: &[u8], _w: u32, _h: u32| vec![Detection::new(0.99, FaceBox::new(20, 20, 60, 60))],
/// ));
/// let shape = Shape::new(vec![Point::new(30.0, 30.0), Point::new(50.0, 50.0)]);
/// let gray = vec![0u8; 100 * 100];
/// let outcome = fitter.fit(&gray, 100, 100, &shape).unwrap();
/// assert_eq!(outcome.face_box, FaceBox::new(20, 20, 60, 60));
/// ```
#[derive(Default)]
pub struct FaceBoxFitter {
    params: FitParams,
    detector: Option<Box<dyn FaceDetector>>,
}

impl FaceBoxFitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(mut self, params: FitParams) -> Self {
        self.params = params;
        self
    }

    /// Use `detector` to propose face boxes. Without one, boxes are derived
    /// from the landmarks alone.
    pub fn face_detector(mut self, detector: Box<dyn FaceDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Run detection on `gray` (if a detector is set) and fit a box for `shape`.
    pub fn fit(&self, gray: &[u8], width: u32, height: u32, shape: &Shape) -> Result<FitOutcome> {
        let detections = match &self.detector {
            Some(detector) => detector.detect(gray, width, height),
            None => Vec::new(),
        };
        tracing::debug!(count = detections.len(), "face detections");
        fit_face_box(
            &shape.points,
            ImageBounds::new(width, height),
            &detections,
            &self.params,
        )
    }
}
