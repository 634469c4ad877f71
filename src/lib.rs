//! # face-fit
//!
//! Square face-box fitting for facial landmark and face detection datasets.
//!
//! Given the landmark points of one face and the image size, this crate finds
//! a box that is:
//! - **square**, so crops can be resized without distortion,
//! - **inside the image**, so no padding is needed,
//! - **covering every landmark**.
//!
//! ## Algorithm Overview
//!
//! 1. Pick a starting box: the first detector proposal whose recentred square
//!    covers all landmarks, else the landmarks' minimal box, squared and
//!    expanded by a margin.
//! 2. If the starting box lies inside the image, use it.
//! 3. Otherwise repair it: shift it back inside; if that fails, clamp and
//!    trim it to a square; if that fails too, fall back to the minimal box
//!    and flag the sample as degraded.
//!
//! ## Quick Start
//!
//! ```rust
//! use face_fit::{fit_face_box, FitParams, ImageBounds, Point};
//!
//! let points = vec![Point::new(40.0, 42.0), Point::new(61.5, 58.0), Point::new(50.0, 70.2)];
//! let outcome = fit_face_box(&points, ImageBounds::new(120, 90), &[], &FitParams::default())
//!     .unwrap();
//!
//! if outcome.is_degraded() {
//!     eprintln!("no square box fits, got {:?}", outcome.face_box);
//! }
//! ```
//!
//! ## Custom Detectors
//!
//! Implement [`FaceDetector`] (or pass a closure) to propose boxes from any
//! detection engine; see [`FaceBoxFitter`]. With the `rustface` feature the
//! crate ships a SeetaFace backend.

mod detector;
mod error;
pub mod export;
mod fit;
mod geometry;
mod params;
pub mod pts;
mod repair;
#[cfg(feature = "rustface")]
mod rustface_backend;
mod select;
mod types;
mod validity;

pub use detector::{FaceBoxFitter, FaceDetector};
pub use error::{Error, Result};
pub use export::{extract_face, pad_to_square, CropLabel, FaceCrop};
pub use fit::{fit_box_to_image, BoxSource, FitOutcome, FitStage};
pub use geometry::{expand_box, minimal_box, move_box, square_box};
pub use params::{ExportParams, FitParams};
pub use pts::{parse_pts, read_pts};
pub use repair::{fit_by_shifting, fit_by_shrinking};
#[cfg(feature = "rustface")]
pub use rustface_backend::RustfaceDetector;
pub use select::{fit_face_box, fit_region, select_detection};
pub use types::{Detection, FaceBox, ImageBounds, Point, Shape, MAX_COORDINATE};
pub use validity::{box_in_image, is_square, is_valid, points_in_box, points_in_image};
