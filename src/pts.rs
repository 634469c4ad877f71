//! Reader for iBUG `.pts` landmark annotations.
//!
//! ```text
//! version: 1
//! n_points:  68
//! {
//! 336.820955 240.864510
//! ...
//! }
//! ```

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{Point, Shape};

/// Parse the contents of a `.pts` file.
///
/// Header lines (`version`, `n_points`) and braces are skipped; every other
/// non-empty line must hold exactly two numbers.
pub fn parse_pts(text: &str) -> Result<Shape> {
    let mut points = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || is_header(line) {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some(x), Some(y), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(Error::Parse {
                line: idx + 1,
                message: format!("expected two coordinates, got {line:?}"),
            });
        };
        let x = parse_coord(x, idx + 1)?;
        let y = parse_coord(y, idx + 1)?;
        points.push(Point::new(x, y));
    }

    Ok(Shape::new(points))
}

/// Read and parse a `.pts` file.
pub fn read_pts<P: AsRef<Path>>(path: P) -> Result<Shape> {
    let text = fs::read_to_string(path)?;
    parse_pts(&text)
}

fn is_header(line: &str) -> bool {
    line.contains("version") || line.contains("points") || line.contains('{') || line.contains('}')
}

fn parse_coord(field: &str, line: usize) -> Result<f32> {
    field.parse::<f32>().map_err(|e| Error::Parse {
        line,
        message: format!("invalid coordinate {field:?}: {e}"),
    })
}
