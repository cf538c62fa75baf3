//! Error taxonomy for mesh building and terrain queries.

use thiserror::Error;

/// Failures surfaced by geometry construction and height queries.
///
/// Edit operations are total over their input domain and never return these;
/// degenerate ranges and falloffs simply affect no points.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SculptError {
    #[error("fan triangulation needs at least 3 points, got {count}")]
    InsufficientPoints { count: usize },

    #[error("height grid must be at least 2x2, got {width}x{height}")]
    DegenerateGrid { width: usize, height: usize },

    #[error("no points within {radius} of {position:?}")]
    NoPointsInRadius { position: [f32; 3], radius: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SculptError::InsufficientPoints { count: 2 };
        assert_eq!(
            err.to_string(),
            "fan triangulation needs at least 3 points, got 2"
        );

        let err = SculptError::DegenerateGrid {
            width: 1,
            height: 4,
        };
        assert_eq!(err.to_string(), "height grid must be at least 2x2, got 1x4");

        let err = SculptError::NoPointsInRadius {
            position: [1.0, 2.0, 3.0],
            radius: 0.1,
        };
        assert_eq!(
            err.to_string(),
            "no points within 0.1 of [1.0, 2.0, 3.0]"
        );
    }
}
