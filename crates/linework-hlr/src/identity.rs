//! Near-duplicate segment lookup.
//!
//! Two segments are the same when both canonical endpoint pairs are within
//! the coincidence tolerance. Candidates are bucketed on a grid keyed by the
//! rounded start point, with the cell size equal to the match radius, so a
//! match always lies in the start cell or one of its 26 neighbours.

use std::collections::HashMap;

use linework_math::{Point3, Tolerance};

use crate::types::Segment3D;

type CellKey = (i64, i64, i64);

fn point_key(p: &Point3, cell: f64) -> CellKey {
    let scale = 1.0 / cell;
    (
        (p.x * scale).round() as i64,
        (p.y * scale).round() as i64,
        (p.z * scale).round() as i64,
    )
}

/// Spatial hash over segment start points.
#[derive(Debug, Clone)]
pub struct SegmentIndex {
    tolerance: Tolerance,
    cell: f64,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl SegmentIndex {
    /// Create an empty index.
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            cell: tolerance.coincident_sq.sqrt(),
            cells: HashMap::new(),
        }
    }

    /// Record `segments[index]`.
    pub fn insert(&mut self, index: usize, segment: &Segment3D) {
        self.cells
            .entry(point_key(&segment.start, self.cell))
            .or_default()
            .push(index);
    }

    /// Smallest index of a registered segment matching `start → end`.
    ///
    /// `start` and `end` must already be in canonical order.
    pub fn find(&self, segments: &[Segment3D], start: &Point3, end: &Point3) -> Option<usize> {
        let (kx, ky, kz) = point_key(start, self.cell);
        let mut best: Option<usize> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = self.cells.get(&(kx + dx, ky + dy, kz + dz)) else {
                        continue;
                    };
                    for &i in bucket {
                        let seg = &segments[i];
                        if self.tolerance.points_equal(&seg.start, start)
                            && self.tolerance.points_equal(&seg.end, end)
                        {
                            best = Some(best.map_or(i, |b| b.min(i)));
                        }
                    }
                }
            }
        }
        best
    }
}

impl Default for SegmentIndex {
    fn default() -> Self {
        Self::new(Tolerance::DEFAULT)
    }
}
