//! Hidden-line removal for segments against opaque planar polygons.
//!
//! Everything here works in camera coordinates: the eye is at `(eye_x, 0, 0)`
//! and looks toward the origin, so larger `x` means nearer the eye.
//!
//! # Algorithm
//!
//! For each segment, start from the full parameter range `[0, 1]` on its
//! projection. Every polygon that does not contain the segment removes the
//! part that is both behind its plane and inside its silhouette. What is left
//! is visible; the rest is hidden. With a gap width set, each visible range is
//! then notched wherever another segment crosses strictly in front of it.

use std::collections::HashSet;

use linework_math::interval::{self, Interval, IntervalSet};
use linework_math::planar::{exterior_of, line_line_params, signed_area2};
use linework_math::plane::positive_side_param;
use linework_math::{canonical_pair2, Plane, Point2, Point3, Tolerance, EPS};
use log::{debug, trace};

use crate::camera::Camera;
use crate::error::Result;
use crate::projection::project;
use crate::scene::Assembly;
use crate::types::{
    LabelAnchor, Point2D, Polygon3D, ProjectedSegment, RenderResult, Segment3D, Style, Visibility,
};
use crate::RenderOptions;

/// Classify every segment as visible or hidden against `polygons`.
///
/// Polygons and segments must already be in camera coordinates. `gap` is the
/// notch width in 3D units; `None` disables notching. Both outputs hold
/// canonically ordered 2D pieces with exact duplicates removed.
pub fn visible_segments(
    eye_x: f64,
    screen_x: f64,
    polygons: &[Polygon3D],
    segments: &[Segment3D],
    gap: Option<f64>,
) -> Result<Visibility> {
    let eye = Point3::new(eye_x, 0.0, 0.0);
    let tol = Tolerance::DEFAULT;

    let planes: Vec<Plane> = polygons
        .iter()
        .map(|poly| Plane::of_polygon(poly).facing(&eye))
        .collect();

    let polys2d = polygons
        .iter()
        .map(|poly| {
            let mut flat = project(eye_x, screen_x, poly)?;
            if signed_area2(&flat) < 0.0 {
                flat.reverse();
            }
            Ok(flat)
        })
        .collect::<Result<Vec<Vec<Point2>>>>()?;

    let segs2d = segments
        .iter()
        .map(|seg| {
            let q = project(eye_x, screen_x, &[seg.start, seg.end])?;
            Ok((q[0], q[1]))
        })
        .collect::<Result<Vec<(Point2, Point2)>>>()?;

    let mut out = Collector::default();

    for (i, seg) in segments.iter().enumerate() {
        let (p0, p1) = (&seg.start, &seg.end);
        let (q0, q1) = (&segs2d[i].0, &segs2d[i].1);

        let mut visible: IntervalSet = vec![Interval::UNIT];
        for (k, poly) in polygons.iter().enumerate() {
            if seg.on_faces.contains(&k) {
                continue;
            }
            let is_vertex = |p: &Point3| poly.iter().any(|v| tol.points_equal(v, p));
            if is_vertex(p0) && is_vertex(p1) {
                continue;
            }
            let in_front = interval::to_2d(&positive_side_param(&planes[k], p0, p1), p0, p1, eye_x);
            let outside = if q0 == q1 {
                Vec::new()
            } else {
                exterior_of(q0, q1, &polys2d[k])
            };
            let unoccluded = interval::union(in_front.into_iter().chain(outside));
            visible = interval::intersection(&visible, &unoccluded);
        }

        let hidden = interval::subtract(&[Interval::UNIT], &visible);

        if let Some(gap) = gap {
            if !visible.is_empty() {
                let half_width = gap / (seg.length() * 2.0);
                let crossings = crossings_behind(i, segments, &segs2d, eye_x);
                visible = interval::insert_gaps(&visible, &crossings, half_width);
            }
        }

        trace!("segment {i}: visible {:?}, hidden {:?}", visible, hidden);
        out.extend_hidden(&hidden, q0, q1, seg.style);
        out.extend_visible(&visible, q0, q1, seg.style);
    }

    let result = out.finish();
    debug!(
        "visibility: {} segments against {} polygons -> {} visible, {} hidden pieces",
        segments.len(),
        polygons.len(),
        result.visible.len(),
        result.hidden.len()
    );
    Ok(result)
}

/// 2D parameters on segment `i` where another segment passes strictly in
/// front of it.
fn crossings_behind(
    i: usize,
    segments: &[Segment3D],
    segs2d: &[(Point2, Point2)],
    eye_x: f64,
) -> Vec<f64> {
    let (p0, p1) = (&segments[i].start, &segments[i].end);
    let (q0, q1) = (&segs2d[i].0, &segs2d[i].1);
    let unit = 0.0..=1.0;

    let mut ts = Vec::new();
    for (k, other) in segments.iter().enumerate() {
        if k == i {
            continue;
        }
        let (v0, v1) = (&segs2d[k].0, &segs2d[k].1);
        let Some((s, t)) = line_line_params(v0, v1, q0, q1) else {
            continue;
        };
        if !unit.contains(&s) || !unit.contains(&t) {
            continue;
        }
        let (u0, u1) = (&other.start, &other.end);
        let s3d = interval::to_3d_t(s, u0, u1, eye_x);
        let t3d = interval::to_3d_t(t, p0, p1, eye_x);
        let other_x = u0.x + s3d * (u1.x - u0.x);
        let this_x = p0.x + t3d * (p1.x - p0.x);
        if other_x <= this_x + EPS {
            continue;
        }
        ts.push(t);
    }
    ts
}

/// Accumulates 2D pieces, dropping exact duplicates (first one wins).
#[derive(Default)]
struct Collector {
    result: Visibility,
    seen_visible: HashSet<[u64; 4]>,
    seen_hidden: HashSet<[u64; 4]>,
}

impl Collector {
    fn piece(ivl: &Interval, q0: &Point2, q1: &Point2, style: Style) -> ProjectedSegment {
        let a = q0 + (q1 - q0) * ivl.lo;
        let b = q0 + (q1 - q0) * ivl.hi;
        let (start, end) = canonical_pair2(a, b);
        ProjectedSegment {
            start: start.into(),
            end: end.into(),
            style,
        }
    }

    fn extend_visible(&mut self, ivls: &[Interval], q0: &Point2, q1: &Point2, style: Style) {
        for ivl in ivls {
            let piece = Self::piece(ivl, q0, q1, style);
            if self.seen_visible.insert(piece.key()) {
                self.result.visible.push(piece);
            }
        }
    }

    fn extend_hidden(&mut self, ivls: &[Interval], q0: &Point2, q1: &Point2, style: Style) {
        for ivl in ivls {
            let piece = Self::piece(ivl, q0, q1, style);
            if self.seen_hidden.insert(piece.key()) {
                self.result.hidden.push(piece);
            }
        }
    }

    fn finish(self) -> Visibility {
        self.result
    }
}

/// Transform an assembled scene into camera space, remove hidden lines, and
/// place labels.
pub fn render(
    assembly: &Assembly,
    camera: &Camera,
    options: &RenderOptions,
) -> Result<RenderResult> {
    camera.validate()?;
    let transform = camera.transform();

    let polygons: Vec<Polygon3D> = assembly
        .polygons
        .iter()
        .map(|poly| poly.iter().map(|p| transform.apply_point(p)).collect())
        .collect();
    let segments: Vec<Segment3D> = assembly
        .segments
        .iter()
        .map(|seg| Segment3D {
            start: transform.apply_point(&seg.start),
            end: transform.apply_point(&seg.end),
            style: seg.style,
            on_faces: seg.on_faces.clone(),
        })
        .collect();

    let gap = options.gap.filter(|&g| g > 0.0);
    let visibility = visible_segments(camera.eye_x, camera.screen_x, &polygons, &segments, gap)?;

    let labels = assembly
        .labels
        .iter()
        .map(|label| {
            let anchor = camera.project(&transform.apply_point(&label.position))?;
            Ok(LabelAnchor {
                text: label.text.clone(),
                anchor: Point2D::from(anchor),
                offset: Point2D::new(label.offset[0], label.offset[1]),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RenderResult::new(visibility, labels))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EYE: f64 = 50.0;
    const SCREEN: f64 = 30.0;

    fn wall(x: f64) -> Polygon3D {
        vec![
            Point3::new(x, -2.0, -2.0),
            Point3::new(x, 2.0, -2.0),
            Point3::new(x, 2.0, 2.0),
            Point3::new(x, -2.0, 2.0),
        ]
    }

    fn seg(a: [f64; 3], b: [f64; 3]) -> Segment3D {
        Segment3D::new(Point3::from(a), Point3::from(b), Style::default())
    }

    #[test]
    fn test_segment_behind_wall_is_hidden() {
        let segments = vec![seg([-5.0, -1.0, 0.0], [-5.0, 1.0, 0.0])];
        let result = visible_segments(EYE, SCREEN, &[wall(0.0)], &segments, None).unwrap();
        assert!(result.visible.is_empty(), "got {:?}", result.visible);
        assert_eq!(result.hidden.len(), 1);
    }

    #[test]
    fn test_segment_in_front_of_wall_is_visible() {
        let segments = vec![seg([-5.0, -1.0, 0.0], [-5.0, 1.0, 0.0])];
        let result = visible_segments(EYE, SCREEN, &[wall(-10.0)], &segments, None).unwrap();
        assert_eq!(result.visible.len(), 1);
        assert!(result.hidden.is_empty());
        let piece = &result.visible[0];
        let r = (EYE - SCREEN) / (EYE + 5.0);
        assert!((piece.start.x + r).abs() < 1e-12);
        assert!((piece.end.x - r).abs() < 1e-12);
    }

    #[test]
    fn test_segment_partially_covered() {
        // The wall silhouette covers the middle of a long segment behind it.
        let segments = vec![seg([-5.0, -6.0, 0.0], [-5.0, 6.0, 0.0])];
        let result = visible_segments(EYE, SCREEN, &[wall(0.0)], &segments, None).unwrap();
        assert_eq!(result.visible.len(), 2);
        assert_eq!(result.hidden.len(), 1);
        let hidden = &result.hidden[0];
        // Wall edge y = ±2 at x = 0 projects to ±2 * 20/50.
        assert!((hidden.start.x + 0.8).abs() < 1e-9, "{:?}", hidden);
        assert!((hidden.end.x - 0.8).abs() < 1e-9, "{:?}", hidden);
    }

    #[test]
    fn test_contained_segment_not_self_occluded() {
        // A segment on the wall, just behind it numerically, stays visible
        // when the wall is listed as containing it.
        let on_wall = seg([-1e-9, -1.0, 0.0], [-1e-9, 1.0, 0.0]).on_faces([0]);
        let result = visible_segments(EYE, SCREEN, &[wall(0.0)], &[on_wall], None).unwrap();
        assert_eq!(result.visible.len(), 1);
        assert!(result.hidden.is_empty());
    }

    #[test]
    fn test_polygon_edge_skipped_by_vertex_match() {
        let edge = seg([0.0, -2.0, -2.0], [0.0, 2.0, -2.0]);
        let result = visible_segments(EYE, SCREEN, &[wall(0.0)], &[edge], None).unwrap();
        assert_eq!(result.visible.len(), 1);
        assert!(result.hidden.is_empty());
    }

    #[test]
    fn test_gap_cut_only_behind_nearer_segment() {
        // Two crossing segments at different depths, no polygons.
        let far = seg([-5.0, -3.0, 0.0], [-5.0, 3.0, 0.0]);
        let near = seg([5.0, 0.0, -3.0], [5.0, 0.0, 3.0]);
        let result = visible_segments(EYE, SCREEN, &[], &[far, near], Some(0.2)).unwrap();

        // The far segment is split into two pieces, the near one is untouched.
        assert_eq!(result.visible.len(), 3, "{:?}", result.visible);
        let near_pieces: Vec<_> = result
            .visible
            .iter()
            .filter(|p| p.start.x.abs() < 1e-12 && p.end.x.abs() < 1e-12)
            .collect();
        assert_eq!(near_pieces.len(), 1);

        // Notch width on screen: 0.2 at depth x = -5.
        let r = (EYE - SCREEN) / (EYE + 5.0);
        let far_pieces: Vec<_> = result
            .visible
            .iter()
            .filter(|p| p.start.y == 0.0 && p.end.y == 0.0)
            .collect();
        assert_eq!(far_pieces.len(), 2);
        let gap = far_pieces[1].start.x - far_pieces[0].end.x;
        assert!((gap - 0.2 * r).abs() < 1e-9, "gap {gap}");
        assert!(result.hidden.is_empty());
    }

    #[test]
    fn test_gap_disabled_leaves_crossings_whole() {
        let far = seg([-5.0, -3.0, 0.0], [-5.0, 3.0, 0.0]);
        let near = seg([5.0, 0.0, -3.0], [5.0, 0.0, 3.0]);
        let result = visible_segments(EYE, SCREEN, &[], &[far, near], None).unwrap();
        assert_eq!(result.visible.len(), 2);
    }

    #[test]
    fn test_duplicate_segments_collapse() {
        let a = seg([-5.0, -1.0, 0.0], [-5.0, 1.0, 0.0]);
        let result = visible_segments(EYE, SCREEN, &[], &[a.clone(), a], None).unwrap();
        assert_eq!(result.visible.len(), 1);
    }

    #[test]
    fn test_invalid_camera_fails() {
        let segments = vec![seg([0.0, 0.0, 0.0], [0.0, 1.0, 0.0])];
        assert!(visible_segments(30.0, 30.0, &[], &segments, None).is_err());
        assert!(visible_segments(50.0, 0.0, &[], &segments, None).is_err());
    }
}
