use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("point set is empty")]
    EmptyPoints,

    #[error("expand ratio must be a finite value >= 1, got {0}")]
    InvalidRatio(f64),

    #[error("landmark {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    #[error("landmark {index} lies outside the supported coordinate range")]
    CoordinateOutOfRange { index: usize },

    #[error("expected {expected} landmarks, found {found}")]
    LandmarkCount { expected: usize, found: usize },

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("region {width}x{height} is smaller than the minimum size {min_size}")]
    RegionTooSmall {
        width: i32,
        height: i32,
        min_size: i32,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed pts file at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("face detector error: {0}")]
    Detector(String),

    #[error("face box does not overlap the image")]
    EmptyCrop,
}

impl Error {
    /// Whether this error was caused by malformed caller input rather than
    /// a failing collaborator (file system, decoder, detector).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::EmptyPoints
                | Error::InvalidRatio(_)
                | Error::NonFiniteCoordinate { .. }
                | Error::CoordinateOutOfRange { .. }
                | Error::LandmarkCount { .. }
                | Error::InvalidParams(_)
                | Error::RegionTooSmall { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
