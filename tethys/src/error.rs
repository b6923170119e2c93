//! Error types for feature detection.

use thiserror::Error;

use crate::field::Axis;

/// Errors surfaced to the caller of a detector.
///
/// Only malformed input and invalid parameters are reported. Numeric
/// singularities and degenerate geometry are absorbed by the detectors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectionError {
    #[error(
        "Shape mismatch: grid is {rows}x{cols} but lat has {lat_len} and lon has {lon_len} coordinates"
    )]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        lat_len: usize,
        lon_len: usize,
    },

    #[error("Ragged grid: row {row} has {len} samples, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("{axis} coordinate {index} is not finite")]
    NonFiniteCoordinate { axis: Axis, index: usize },

    #[error("{axis} needs at least 2 coordinates to derive a resolution, got {len}")]
    TooFewCoordinates { axis: Axis, len: usize },

    #[error("Grid resolution is degenerate: {km_per_pixel} km per pixel")]
    DegenerateResolution { km_per_pixel: f64 },

    #[error("Grid of {cells} cells exceeds the {max} cell ceiling")]
    GridTooLarge { cells: usize, max: usize },

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl DetectionError {
    /// True for errors caused by the shape or coordinates of the input field.
    pub fn is_input_shape(&self) -> bool {
        !matches!(self, Self::InvalidParameter { .. })
    }

    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DetectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message() {
        let err = DetectionError::ShapeMismatch {
            rows: 3,
            cols: 4,
            lat_len: 2,
            lon_len: 4,
        };
        assert_eq!(
            err.to_string(),
            "Shape mismatch: grid is 3x4 but lat has 2 and lon has 4 coordinates"
        );
        assert!(err.is_input_shape());
    }

    #[test]
    fn test_too_few_coordinates_message() {
        let err = DetectionError::TooFewCoordinates {
            axis: Axis::Latitude,
            len: 1,
        };
        assert_eq!(
            err.to_string(),
            "latitude needs at least 2 coordinates to derive a resolution, got 1"
        );
    }

    #[test]
    fn test_invalid_parameter_is_not_shape_error() {
        let err = DetectionError::invalid("threshold", "must be finite");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'threshold': must be finite"
        );
        assert!(!err.is_input_shape());
    }
}
