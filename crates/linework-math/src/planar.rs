//! 2D primitives on the projection screen.
//!
//! Polygons handed to [`exterior_of`] must keep their interior on the left
//! while walking the vertices, i.e. have a non-negative [`signed_area2`].
//! Callers reverse the vertex order when the area comes out negative.

use crate::interval::{self, Interval, IntervalSet};
use crate::{Point2, Vec2, EPS};

/// z component of the 2D cross product `a × b`.
pub fn cross2(a: &Vec2, b: &Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Twice the signed area of the triangle `a, b, c`.
pub fn triangle_area2(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    cross2(&(b - a), &(c - a))
}

/// Twice the signed area of a polygon (fan from vertex 0).
///
/// Positive when the vertices run counter-clockwise.
pub fn signed_area2(poly: &[Point2]) -> f64 {
    let mut area = 0.0;
    for i in 1..poly.len().saturating_sub(1) {
        area += triangle_area2(&poly[0], &poly[i], &poly[i + 1]);
    }
    area
}

/// Parameters `(s, t)` with `u0 + s (u1 - u0) = v0 + t (v1 - v0)`.
///
/// Returns `None` when the two lines are parallel (singular system).
pub fn line_line_params(u0: &Point2, u1: &Point2, v0: &Point2, v1: &Point2) -> Option<(f64, f64)> {
    let d = cross2(&(u1 - u0), &(v1 - v0));
    if d == 0.0 {
        return None;
    }
    let s = -triangle_area2(v0, u0, v1) / d;
    let t = -triangle_area2(v0, u0, u1) / d;
    Some((s, t))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Crossing {
    Out,
    In,
}

/// Portion of the line `p0 → p1` outside `poly`, as parameters `t`.
///
/// The polygon must have its interior on the left. Each edge crossing is
/// classified as entering or leaving by the sign of the edge direction
/// against the segment's right-hand perpendicular; runs of equal events are
/// collapsed, the sequence is bracketed by "outside" at `-∞` and "inside" at
/// `+∞`, and the outside stretches are paired up. A segment lying along an
/// edge counts as outside over that edge's extent.
pub fn exterior_of(p0: &Point2, p1: &Point2, poly: &[Point2]) -> IntervalSet {
    let dir = p1 - p0;
    let len2 = dir.dot(&dir);
    if len2 == 0.0 {
        return Vec::new();
    }
    let right = Vec2::new(dir.y, -dir.x);

    let n = poly.len();
    let mut crossings: Vec<(f64, Crossing)> = Vec::new();
    let mut along_edges: IntervalSet = Vec::new();

    for i in 0..n {
        let v0 = &poly[(i + n - 1) % n];
        let v1 = &poly[i];
        let Some((s, t)) = line_line_params(v0, v1, p0, p1) else {
            if triangle_area2(v0, v1, p0).abs() < EPS {
                let t0 = dir.dot(&(v0 - p0)) / len2;
                let t1 = dir.dot(&(v1 - p0)) / len2;
                along_edges.push(Interval::new(t0.min(t1), t0.max(t1)));
            }
            continue;
        };
        if !(-EPS..=1.0 + EPS).contains(&s) {
            continue;
        }
        let state = if right.dot(&(v1 - v0)) > 0.0 {
            Crossing::In
        } else {
            Crossing::Out
        };
        crossings.push((t, state));
    }

    crossings.push((f64::INFINITY, Crossing::In));
    crossings.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut folded: Vec<(f64, Crossing)> = vec![(f64::NEG_INFINITY, Crossing::Out)];
    for event in crossings {
        if folded.last().map(|last| last.1) != Some(event.1) {
            folded.push(event);
        }
    }
    if let Some(last) = folded.last_mut() {
        match last.1 {
            Crossing::Out => folded.push((f64::INFINITY, Crossing::In)),
            Crossing::In => last.0 = f64::INFINITY,
        }
    }

    let outside = folded
        .chunks_exact(2)
        .map(|pair| Interval::new(pair[0].0, pair[1].0));
    interval::union(outside.chain(along_edges))
}
