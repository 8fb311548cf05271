//! Camera placement and the transform pipeline.
//!
//! The eye sits at `(eye_x, 0, 0)` looking at the origin, and the screen is
//! the plane `x = screen_x`. Scene coordinates are first translated by the
//! camera offset, then rotated about z by `-z_angle` and about y by
//! `-x_angle` (host convention; angles in degrees). The order matters.

use linework_math::{Point2, Point3, Transform, DEG};
use serde::{Deserialize, Serialize};

use crate::error::{HlrError, Result};
use crate::projection;

/// Perspective camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Eye position on the x axis.
    pub eye_x: f64,
    /// Screen plane position on the x axis, `0 < screen_x < eye_x`.
    pub screen_x: f64,
    /// Elevation angle in degrees.
    pub x_angle: f64,
    /// Azimuth angle in degrees.
    pub z_angle: f64,
    /// Translation applied before rotating.
    pub offset: [f64; 3],
    /// Pixels per model unit, used by emitters.
    pub scale: f64,
}

impl Camera {
    /// Derive a camera from an interactive view: its pixel width, zoom
    /// (pixels per unit), view angles in degrees, and translation.
    ///
    /// The eye and screen distances are fixed multiples of the visible
    /// x-axis length.
    pub fn from_view(
        width_px: f64,
        scale: f64,
        x_angle: f64,
        z_angle: f64,
        offset: [f64; 3],
    ) -> Self {
        let x_axis_len = width_px * 0.35 / scale;
        Self {
            eye_x: 15.0 * x_axis_len,
            screen_x: 3.0 * x_axis_len,
            x_angle,
            z_angle,
            offset,
            scale,
        }
    }

    /// Check that the screen plane lies strictly between origin and eye.
    pub fn validate(&self) -> Result<()> {
        if self.screen_x <= 0.0 || self.eye_x <= self.screen_x {
            return Err(HlrError::InvalidCamera {
                eye_x: self.eye_x,
                screen_x: self.screen_x,
            });
        }
        Ok(())
    }

    /// The rigid transform taking scene coordinates to camera coordinates.
    pub fn transform(&self) -> Transform {
        let [dx, dy, dz] = self.offset;
        Transform::rotation_y(self.x_angle * DEG)
            .then(&Transform::rotation_z(-self.z_angle * DEG))
            .then(&Transform::translation(dx, dy, dz))
    }

    /// Transform a single scene point.
    pub fn transform_point(&self, p: &Point3) -> Point3 {
        self.transform().apply_point(p)
    }

    /// The eye point in camera coordinates.
    pub fn eye(&self) -> Point3 {
        Point3::new(self.eye_x, 0.0, 0.0)
    }

    /// Project a point already in camera coordinates onto the screen.
    pub fn project(&self, p: &Point3) -> Result<Point2> {
        projection::project_point(self.eye_x, self.screen_x, p)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_view(640.0, 50.0, 20.0, -60.0, [0.0; 3])
    }
}
