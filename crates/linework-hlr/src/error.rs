//! Error types for scene assembly and rendering.

use linework_math::MathError;
use thiserror::Error;

/// Errors that abort a render.
///
/// Degenerate geometry (parallel faces, zero-length segments) never shows up
/// here; only configuration mistakes and unresolvable scene references do.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HlrError {
    /// The screen plane is not strictly between the origin and the eye.
    #[error("invalid camera: screen plane x={screen_x} must satisfy 0 < screen < eye (eye x={eye_x})")]
    InvalidCamera {
        /// Eye position on the x axis.
        eye_x: f64,
        /// Screen plane position on the x axis.
        screen_x: f64,
    },

    /// A geometric solve failed.
    #[error(transparent)]
    Math(#[from] MathError),

    /// A scene vertex names a point that was never defined.
    #[error("unknown point label: {0}")]
    UnknownPoint(String),

    /// A scene polygon has too few vertices to span a plane.
    #[error("polygon {index} has {vertices} vertices, need at least 3")]
    DegeneratePolygon {
        /// Position of the polygon in the scene.
        index: usize,
        /// Number of vertices it was given.
        vertices: usize,
    },
}

/// Result type for hidden-line operations.
pub type Result<T> = std::result::Result<T, HlrError>;
