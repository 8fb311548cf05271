//! Error types for geometric solves.

use thiserror::Error;

/// Errors raised by the geometry primitives.
///
/// Only fully degenerate configurations are errors; near-degenerate cases
/// (parallel planes, singular 2D line systems) are reported through return
/// values instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// The three planes of a Cramer's-rule solve have a zero determinant.
    #[error("three-plane system is singular (determinant is zero)")]
    SingularSystem,
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, MathError>;
