//! Planes and 3D line/plane/polygon intersections.
//!
//! A plane `ax + by + cz + d = 0` is stored as its (unnormalized) normal
//! `(a, b, c)` and offset `d`. Evaluating a point gives a signed value whose
//! sign tells which side of the plane the point is on.

use crate::error::{MathError, Result};
use crate::interval::{self, Interval, IntervalSet};
use crate::{canonical_pair3, Point3, Vec3, EPS};

/// A plane `normal · p + d = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Normal `(a, b, c)`; not necessarily unit length.
    pub normal: Vec3,
    /// Constant term.
    pub d: f64,
}

impl Plane {
    /// Create a plane from its coefficients.
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            normal: Vec3::new(a, b, c),
            d,
        }
    }

    /// Plane of a (nearly) planar polygon, using the fan-summed normal.
    pub fn of_polygon(poly: &[Point3]) -> Self {
        let normal = polygon_normal(poly);
        let d = poly.first().map_or(0.0, |p0| -normal.dot(&p0.coords));
        Self { normal, d }
    }

    /// Signed value `a x + b y + c z + d` at `p`.
    pub fn eval(&self, p: &Point3) -> f64 {
        self.normal.dot(&p.coords) + self.d
    }

    /// The same plane with all coefficients negated.
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            d: -self.d,
        }
    }

    /// Orient the plane so that `eye` evaluates non-negative.
    pub fn facing(self, eye: &Point3) -> Self {
        if self.eval(eye) < 0.0 {
            self.flipped()
        } else {
            self
        }
    }
}

/// Determinant of the 3x3 matrix with rows `r0`, `r1`, `r2`.
pub fn det3(r0: &Vec3, r1: &Vec3, r2: &Vec3) -> f64 {
    (r0.x * r1.y * r2.z + r1.x * r2.y * r0.z + r2.x * r0.y * r1.z)
        - (r0.x * r2.y * r1.z + r1.x * r0.y * r2.z + r2.x * r1.y * r0.z)
}

/// Normal of the triangle `p0, p1, p2` (right-hand rule, not normalized).
pub fn triangle_normal(p0: &Point3, p1: &Point3, p2: &Point3) -> Vec3 {
    (p1 - p0).cross(&(p2 - p0))
}

/// Normal of a polygon as the sum of its fan triangles from vertex 0.
///
/// Summing the fan keeps the result stable when the vertices are only
/// approximately coplanar.
pub fn polygon_normal(poly: &[Point3]) -> Vec3 {
    let mut normal = Vec3::zeros();
    for i in 1..poly.len().saturating_sub(1) {
        normal += triangle_normal(&poly[0], &poly[i], &poly[i + 1]);
    }
    normal
}

/// Intersection point of three planes by Cramer's rule.
///
/// Fails only when the determinant is exactly zero.
pub fn solve_three_planes(p1: &Plane, p2: &Plane, p3: &Plane) -> Result<Point3> {
    let det = det3(&p1.normal, &p2.normal, &p3.normal);
    if det == 0.0 {
        return Err(MathError::SingularSystem);
    }

    let rhs = Vec3::new(-p1.d, -p2.d, -p3.d);
    let col = |plane: &Plane, i: usize, r: f64| {
        let mut row = plane.normal;
        row[i] = r;
        row
    };
    let det_axis = |i: usize| det3(&col(p1, i, rhs.x), &col(p2, i, rhs.y), &col(p3, i, rhs.z));

    Ok(Point3::new(det_axis(0) / det, det_axis(1) / det, det_axis(2) / det))
}

/// Outcome of intersecting the line through two points with a plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinePlane {
    /// The line meets the plane at `p0 + t (p1 - p0)`.
    At(f64),
    /// The line lies in the plane.
    Contained,
    /// The line is parallel to the plane and off it.
    Parallel,
}

/// Parameter where the line `p0 → p1` meets `plane`.
pub fn line_plane_param(plane: &Plane, p0: &Point3, p1: &Point3) -> LinePlane {
    let denom = plane.normal.dot(&(p1 - p0));
    let numer = -plane.d - plane.normal.dot(&p0.coords);
    if denom.abs() > EPS {
        LinePlane::At(numer / denom)
    } else if numer == 0.0 {
        LinePlane::Contained
    } else {
        LinePlane::Parallel
    }
}

/// Parameter range of the line `p0 → p1` on the front (non-negative) side of
/// `plane`.
pub fn positive_side_param(plane: &Plane, p0: &Point3, p1: &Point3) -> IntervalSet {
    let e0 = plane.eval(p0);
    let e1 = plane.eval(p1);
    match line_plane_param(plane, p0, p1) {
        LinePlane::Contained => vec![Interval::EVERYTHING],
        LinePlane::Parallel if e0 >= 0.0 => vec![Interval::EVERYTHING],
        LinePlane::Parallel => Vec::new(),
        LinePlane::At(_) if e0.abs() <= EPS && e1.abs() <= EPS => vec![Interval::EVERYTHING],
        LinePlane::At(t) if e0 > e1 => vec![Interval::ending_at(t)],
        LinePlane::At(t) => vec![Interval::starting_at(t)],
    }
}

/// Parameter intervals, measured as `point · dir`, where `plane` cuts through
/// the interior of `poly`.
///
/// Each polygon edge that changes side produces a crossing event signed by
/// the side of its first vertex. Events are sorted, the signs normalized so
/// the first event opens an interval, and open/close events paired. A later
/// open replaces a pending one, a close without an open is ignored, and an
/// unterminated trailing open is dropped.
pub fn plane_polygon_param(plane: &Plane, poly: &[Point3], dir: &Vec3) -> IntervalSet {
    let sides: Vec<f64> = poly.iter().map(|p| plane.eval(p)).collect();
    let n = poly.len();

    let mut events: Vec<(f64, f64)> = Vec::new();
    for i in 0..n {
        let j = (i + 1) % n;
        if sides[i] * sides[j] > 0.0 {
            continue;
        }
        let s = match line_plane_param(plane, &poly[i], &poly[j]) {
            LinePlane::At(s) => s,
            LinePlane::Contained => 0.0,
            LinePlane::Parallel => continue,
        };
        if !(-EPS..=1.0 + EPS).contains(&s) || sides[i] == 0.0 {
            continue;
        }
        let crossing = poly[i] + (poly[j] - poly[i]) * s;
        events.push((crossing.coords.dot(dir), sides[i]));
    }

    if events.is_empty() {
        return Vec::new();
    }

    events.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    if events[0].1 < 0.0 {
        for event in &mut events {
            event.1 = -event.1;
        }
    }

    let mut result = Vec::new();
    let mut open: Option<f64> = None;
    for (param, sign) in events {
        if sign > 0.0 {
            open = Some(param);
        } else if sign < 0.0 {
            if let Some(start) = open.take() {
                result.push(Interval::new(start, param));
            }
        }
    }
    result
}

/// Intersection segments of two planar polygons, excluding their edges.
///
/// Near-parallel polygons have no intersection. Each returned segment has its
/// endpoints in canonical (lexicographic) order.
pub fn polygon_polygon_intersection(
    poly1: &[Point3],
    poly2: &[Point3],
) -> Result<Vec<(Point3, Point3)>> {
    let plane1 = Plane::of_polygon(poly1);
    let plane2 = Plane::of_polygon(poly2);

    let dir = plane1.normal.cross(&plane2.normal);
    let len2 = dir.dot(&dir);
    if len2 < EPS {
        return Ok(Vec::new());
    }
    let dir = dir / len2.sqrt();

    let along1 = plane_polygon_param(&plane1, poly2, &dir);
    let along2 = plane_polygon_param(&plane2, poly1, &dir);
    let shared = interval::intersection(&along1, &along2);
    if shared.is_empty() {
        return Ok(Vec::new());
    }

    // Base point of the intersection line: the point of it with `p · dir = 0`.
    let across = Plane {
        normal: dir,
        d: 0.0,
    };
    let base = solve_three_planes(&plane1, &plane2, &across)?;

    Ok(shared
        .iter()
        .map(|ivl| canonical_pair3(base + dir * ivl.lo, base + dir * ivl.hi))
        .collect())
}
