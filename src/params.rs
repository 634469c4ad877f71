//! Parameters for box selection and crop export.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parameters for choosing and fitting a face box.
///
/// # Example
///
/// ```
/// use face_fit::FitParams;
///
/// let params = FitParams::default();
/// assert!((params.margin_ratio - 1.2).abs() < 1e-10);
///
/// let tight = FitParams::default().with_margin_ratio(1.05);
/// assert!(tight.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitParams {
    /// Scale applied to the squared landmark box when no detection is
    /// usable. Must be >= 1.
    pub margin_ratio: f64,

    /// Detections scoring below this are ignored.
    pub min_confidence: f64,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            margin_ratio: 1.2,
            min_confidence: 0.5,
        }
    }
}

impl FitParams {
    #[must_use]
    pub fn with_margin_ratio(mut self, ratio: f64) -> Self {
        self.margin_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_min_confidence(mut self, confidence: f64) -> Self {
        self.min_confidence = confidence;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.margin_ratio.is_finite() || self.margin_ratio < 1.0 {
            return Err(Error::InvalidRatio(self.margin_ratio));
        }
        if self.min_confidence.is_nan() {
            return Err(Error::InvalidParams(
                "min_confidence must not be NaN".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parameters for writing face crops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportParams {
    /// Side length of the exported square crop, in pixels.
    pub target_size: u32,

    /// Landmark count every sample must have (68 for iBUG annotations).
    pub expected_landmarks: usize,
}

impl Default for ExportParams {
    fn default() -> Self {
        Self {
            target_size: 128,
            expected_landmarks: 68,
        }
    }
}

impl ExportParams {
    pub fn validate(&self) -> Result<()> {
        if self.target_size == 0 {
            return Err(Error::InvalidParams("target_size must be > 0".to_string()));
        }
        if self.expected_landmarks == 0 {
            return Err(Error::InvalidParams(
                "expected_landmarks must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
