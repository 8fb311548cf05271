#![warn(missing_docs)]

//! Math types for the linework hidden-line renderer.
//!
//! Thin wrappers around nalgebra providing the geometric vocabulary
//! used by the visibility engine: points, vectors, planes, the rigid
//! camera transform, interval sets over the real line, and tolerance
//! constants.

use nalgebra::{Matrix4, Vector2, Vector3, Vector4};
use std::cmp::Ordering;

pub mod error;
pub mod interval;
pub mod planar;
pub mod plane;

pub use error::{MathError, Result};
pub use interval::{Interval, IntervalSet};
pub use plane::Plane;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A point on the projection screen.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// Machine epsilon used throughout the visibility computation.
///
/// Tuned for diagram-scale coordinates (units of roughly 1..100).
pub const EPS: f64 = 1.0e-10;

/// Degrees to radians.
pub const DEG: f64 = std::f64::consts::PI / 180.0;

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        Self { matrix: m }
    }

    /// Compose: `self` then `other` (self * other).
    ///
    /// The resulting transform applies `other` first, then `self`.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Absolute tolerance for scalars (plane evaluations, areas).
    pub linear: f64,
    /// Squared-distance threshold below which two points are the same.
    pub coincident_sq: f64,
}

impl Tolerance {
    /// Default tolerances (`EPS` linear, `10 * EPS` squared distance).
    pub const DEFAULT: Self = Self {
        linear: EPS,
        coincident_sq: EPS * 10.0,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm_squared() < self.coincident_sq
    }

    /// Check if a scalar is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Lexicographic order on 3D points (x, then y, then z).
pub fn cmp_point3(a: &Point3, b: &Point3) -> Ordering {
    a.x.total_cmp(&b.x)
        .then(a.y.total_cmp(&b.y))
        .then(a.z.total_cmp(&b.z))
}

/// Lexicographic order on 2D points (x, then y).
pub fn cmp_point2(a: &Point2, b: &Point2) -> Ordering {
    a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
}

/// Order a 3D endpoint pair canonically so equal segments compare equal.
pub fn canonical_pair3(a: Point3, b: Point3) -> (Point3, Point3) {
    if cmp_point3(&a, &b) == Ordering::Greater {
        (b, a)
    } else {
        (a, b)
    }
}

/// Order a 2D endpoint pair canonically so equal segments compare equal.
pub fn canonical_pair2(a: Point2, b: Point2) -> (Point2, Point2) {
    if cmp_point2(&a, &b) == Ordering::Greater {
        (b, a)
    } else {
        (a, b)
    }
}
