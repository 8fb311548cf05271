//! Perspective projection onto the screen plane `x = screen_x`.
//!
//! A camera-space point `(x, y, z)` lands at `(y, z) * r` with
//! `r = (eye_x - screen_x) / (eye_x - x)`.

use linework_math::{Point2, Point3};

use crate::error::{HlrError, Result};

fn check(eye_x: f64, screen_x: f64) -> Result<()> {
    if screen_x <= 0.0 || eye_x <= screen_x {
        return Err(HlrError::InvalidCamera { eye_x, screen_x });
    }
    Ok(())
}

/// Project one point seen from `(eye_x, 0, 0)`.
pub fn project_point(eye_x: f64, screen_x: f64, p: &Point3) -> Result<Point2> {
    check(eye_x, screen_x)?;
    let r = (eye_x - screen_x) / (eye_x - p.x);
    Ok(Point2::new(p.y * r, p.z * r))
}

/// Project a list of points.
///
/// Fails for any input, including an empty one, unless
/// `0 < screen_x < eye_x`.
pub fn project(eye_x: f64, screen_x: f64, pts: &[Point3]) -> Result<Vec<Point2>> {
    check(eye_x, screen_x)?;
    Ok(pts
        .iter()
        .map(|p| {
            let r = (eye_x - screen_x) / (eye_x - p.x);
            Point2::new(p.y * r, p.z * r)
        })
        .collect())
}
