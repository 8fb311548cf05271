//! Interval algebra over the real line.
//!
//! An [`IntervalSet`] is a plain list of closed intervals. Sets are not
//! required to be sorted or disjoint unless an operation says otherwise;
//! [`union`] is the normalizing operation and returns a sorted, disjoint,
//! non-touching cover.
//!
//! Endpoints may be `±∞`. Segment parameters live on `[0, 1]`, while the
//! half-lines produced by plane tests extend to infinity.

use std::cmp::Ordering;

use crate::Point3;

/// A closed interval `[lo, hi]` of the real line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Lower endpoint (may be `-∞`).
    pub lo: f64,
    /// Upper endpoint (may be `+∞`).
    pub hi: f64,
}

/// A finite union of closed intervals.
pub type IntervalSet = Vec<Interval>;

impl Interval {
    /// The parameter range of a whole segment, `[0, 1]`.
    pub const UNIT: Self = Self { lo: 0.0, hi: 1.0 };

    /// The entire real line.
    pub const EVERYTHING: Self = Self {
        lo: f64::NEG_INFINITY,
        hi: f64::INFINITY,
    };

    /// Create a new interval.
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Half-line `[-∞, t]`.
    pub const fn ending_at(t: f64) -> Self {
        Self::new(f64::NEG_INFINITY, t)
    }

    /// Half-line `[t, +∞]`.
    pub const fn starting_at(t: f64) -> Self {
        Self::new(t, f64::INFINITY)
    }

    fn cmp_lex(&self, other: &Self) -> Ordering {
        self.lo
            .total_cmp(&other.lo)
            .then(self.hi.total_cmp(&other.hi))
    }
}

/// Union of any number of intervals.
///
/// Intervals are sorted by `(lo, hi)` and merged whenever the next one starts
/// at or before the end of the current one, so touching intervals merge too.
pub fn union<I>(intervals: I) -> IntervalSet
where
    I: IntoIterator<Item = Interval>,
{
    let mut sorted: Vec<Interval> = intervals.into_iter().collect();
    sorted.sort_by(Interval::cmp_lex);

    let mut merged: IntervalSet = Vec::with_capacity(sorted.len());
    for ivl in sorted {
        match merged.last_mut() {
            Some(last) if ivl.lo <= last.hi => {
                last.hi = last.hi.max(ivl.hi);
            }
            _ => merged.push(ivl),
        }
    }
    merged
}

/// Pairwise intersection of two interval sets.
///
/// Overlaps of zero length are dropped.
pub fn intersection(a: &[Interval], b: &[Interval]) -> IntervalSet {
    let mut result = Vec::new();
    for x in a {
        for y in b {
            let lo = x.lo.max(y.lo);
            let hi = x.hi.min(y.hi);
            if lo < hi {
                result.push(Interval::new(lo, hi));
            }
        }
    }
    result
}

/// Complement of an interval set, bracketed by `±∞` sentinels.
///
/// A leading `[-∞, -∞]` or trailing `[+∞, +∞]` piece is left in place; it can
/// never overlap anything with positive length.
pub fn complement(a: &[Interval]) -> IntervalSet {
    let normalized = union(a.iter().copied());
    let mut bounds = Vec::with_capacity(normalized.len() * 2 + 2);
    bounds.push(f64::NEG_INFINITY);
    for ivl in &normalized {
        bounds.push(ivl.lo);
        bounds.push(ivl.hi);
    }
    bounds.push(f64::INFINITY);

    bounds
        .chunks_exact(2)
        .map(|pair| Interval::new(pair[0], pair[1]))
        .collect()
}

/// Set difference `a \ b`.
pub fn subtract(a: &[Interval], b: &[Interval]) -> IntervalSet {
    intersection(a, &complement(b))
}

/// Cut gaps `[t - w, t + w]` into `a` at each of `points`.
///
/// A gap is only cut when it lies entirely inside one interval of `a`. All
/// qualifying gaps are collected against the original `a` and removed in a
/// single subtraction, so one gap never changes whether another qualifies.
pub fn insert_gaps(a: &[Interval], points: &[f64], half_width: f64) -> IntervalSet {
    if points.is_empty() || half_width <= 0.0 {
        return a.to_vec();
    }

    let gaps: IntervalSet = points
        .iter()
        .filter(|&&t| {
            a.iter()
                .any(|ivl| ivl.lo <= t - half_width && t + half_width <= ivl.hi)
        })
        .map(|&t| Interval::new(t - half_width, t + half_width))
        .collect();

    if gaps.is_empty() {
        return a.to_vec();
    }
    subtract(a, &gaps)
}

/// Map a parameter on the 3D segment `p0 → p1` to the parameter of the same
/// point on the segment's perspective projection seen from `(eye_x, 0, 0)`.
///
/// Infinite parameters pass through unchanged.
pub fn to_2d_t(t: f64, p0: &Point3, p1: &Point3, eye_x: f64) -> f64 {
    if t.is_infinite() {
        return t;
    }
    let l0 = eye_x - p0.x;
    let l1 = eye_x - p1.x;
    t * l1 / ((1.0 - t) * l0 + t * l1)
}

/// Inverse of [`to_2d_t`]: map a projected parameter back onto the 3D segment.
pub fn to_3d_t(t: f64, p0: &Point3, p1: &Point3, eye_x: f64) -> f64 {
    if t.is_infinite() {
        return t;
    }
    let l0 = eye_x - p0.x;
    let l1 = eye_x - p1.x;
    t * l0 / (t * l0 + (1.0 - t) * l1)
}

/// Map every endpoint of a 3D parameter interval set with [`to_2d_t`].
pub fn to_2d(a: &[Interval], p0: &Point3, p1: &Point3, eye_x: f64) -> IntervalSet {
    a.iter()
        .map(|ivl| {
            Interval::new(
                to_2d_t(ivl.lo, p0, p1, eye_x),
                to_2d_t(ivl.hi, p0, p1, eye_x),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ivls(pairs: &[(f64, f64)]) -> IntervalSet {
        pairs.iter().map(|&(lo, hi)| Interval::new(lo, hi)).collect()
    }

    #[test]
    fn test_union_merges_overlapping_and_touching() {
        let result = union(ivls(&[(0.5, 0.8), (0.0, 0.2), (0.2, 0.4), (0.7, 1.0)]));
        assert_eq!(result, ivls(&[(0.0, 0.4), (0.5, 1.0)]));
    }

    #[test]
    fn test_union_is_idempotent_and_commutative() {
        let a = ivls(&[(3.0, 4.0), (0.0, 1.0), (0.5, 2.0), (5.0, 5.5)]);
        let once = union(a.clone());
        let twice = union(once.clone());
        assert_eq!(once, twice);

        let mut reversed = a.clone();
        reversed.reverse();
        assert_eq!(union(reversed), once);

        for pair in once.windows(2) {
            assert!(pair[0].hi < pair[1].lo, "union output must not touch");
        }
    }

    #[test]
    fn test_union_with_infinite_endpoints() {
        let result = union(ivls(&[(f64::NEG_INFINITY, 0.3), (0.1, 0.6)]));
        assert_eq!(result, ivls(&[(f64::NEG_INFINITY, 0.6)]));
        assert!(union(Vec::new()).is_empty());
    }

    #[test]
    fn test_intersection_drops_degenerate_overlaps() {
        let a = ivls(&[(0.0, 0.5), (0.7, 1.0)]);
        let b = ivls(&[(0.5, 0.8)]);
        assert_eq!(intersection(&a, &b), ivls(&[(0.7, 0.8)]));
    }

    #[test]
    fn test_intersection_with_own_union() {
        let a = ivls(&[(0.0, 0.3), (0.4, 0.9)]);
        let u = union(a.clone());
        assert_eq!(intersection(&a, &u), u);
    }

    #[test]
    fn test_subtract_self_is_empty() {
        let a = ivls(&[(0.0, 0.3), (0.4, 0.9)]);
        assert!(subtract(&a, &a).is_empty());
    }

    #[test]
    fn test_subtract_interior_and_infinite() {
        let unit = vec![Interval::UNIT];
        let result = subtract(&unit, &ivls(&[(0.2, 0.4), (0.6, 0.7)]));
        assert_eq!(result, ivls(&[(0.0, 0.2), (0.4, 0.6), (0.7, 1.0)]));

        let result = subtract(&unit, &[Interval::ending_at(0.25)]);
        assert_eq!(result, ivls(&[(0.25, 1.0)]));

        assert_eq!(subtract(&unit, &[]), unit);
        assert!(subtract(&unit, &[Interval::EVERYTHING]).is_empty());
    }

    #[test]
    fn test_subtract_unsorted_subtrahend() {
        let unit = vec![Interval::UNIT];
        let result = subtract(&unit, &ivls(&[(0.6, 0.7), (0.2, 0.3)]));
        assert_eq!(result, ivls(&[(0.0, 0.2), (0.3, 0.6), (0.7, 1.0)]));
    }

    #[test]
    fn test_insert_gaps_identity_cases() {
        let a = ivls(&[(0.0, 0.4), (0.6, 1.0)]);
        assert_eq!(insert_gaps(&a, &[], 0.05), a);
        assert_eq!(insert_gaps(&a, &[0.2, 0.8], 0.0), a);
    }

    #[test]
    fn test_insert_gaps_only_inside_single_interval() {
        let a = ivls(&[(0.0, 0.4), (0.6, 1.0)]);
        // 0.38 would straddle the boundary at 0.4, so only 0.2 is cut.
        let result = insert_gaps(&a, &[0.2, 0.38], 0.05);
        assert_eq!(result.len(), 3);
        assert_relative_eq!(result[0].hi, 0.15, epsilon = 1e-12);
        assert_relative_eq!(result[1].lo, 0.25, epsilon = 1e-12);
        assert_eq!(result[1].hi, 0.4);
        assert_eq!(result[2], Interval::new(0.6, 1.0));
    }

    #[test]
    fn test_insert_gaps_is_simultaneous() {
        // Two overlapping gaps both qualify against the original set.
        let a = vec![Interval::UNIT];
        let result = insert_gaps(&a, &[0.5, 0.55], 0.1);
        assert_eq!(result.len(), 2);
        assert_relative_eq!(result[0].hi, 0.4, epsilon = 1e-12);
        assert_relative_eq!(result[1].lo, 0.65, epsilon = 1e-12);
    }

    #[test]
    fn test_insert_gaps_unsorted_points_and_closed_end() {
        // The later crossing comes first, and its gap ends exactly at 1.
        let result = insert_gaps(&[Interval::UNIT], &[0.875, 0.25], 0.125);
        assert_eq!(result, ivls(&[(0.0, 0.125), (0.375, 0.75)]));
    }

    #[test]
    fn test_to_2d_round_trip() {
        let p0 = Point3::new(-3.0, 1.0, 2.0);
        let p1 = Point3::new(4.0, -2.0, 0.5);
        let eye = 50.0;
        for &t in &[-2.0, 0.0, 0.25, 0.5, 0.9, 1.0, 3.5] {
            let u = to_2d_t(t, &p0, &p1, eye);
            assert_relative_eq!(to_3d_t(u, &p0, &p1, eye), t, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_to_2d_keeps_endpoints_and_infinities() {
        let p0 = Point3::new(-3.0, 1.0, 2.0);
        let p1 = Point3::new(4.0, -2.0, 0.5);
        let mapped = to_2d(
            &[Interval::ending_at(0.0), Interval::starting_at(1.0)],
            &p0,
            &p1,
            20.0,
        );
        assert_eq!(mapped[0].lo, f64::NEG_INFINITY);
        assert_relative_eq!(mapped[0].hi, 0.0);
        assert_relative_eq!(mapped[1].lo, 1.0, epsilon = 1e-12);
        assert_eq!(mapped[1].hi, f64::INFINITY);
    }

    #[test]
    fn test_to_2d_matches_projection() {
        // A segment at constant depth projects affinely, so parameters agree.
        let p0 = Point3::new(2.0, 0.0, 0.0);
        let p1 = Point3::new(2.0, 5.0, 1.0);
        assert_relative_eq!(to_2d_t(0.3, &p0, &p1, 10.0), 0.3, epsilon = 1e-12);

        // A receding segment: the 3D midpoint lands past the 2D midpoint.
        let near = Point3::new(5.0, 1.0, 0.0);
        let far = Point3::new(-5.0, 1.0, 0.0);
        assert!(to_2d_t(0.5, &near, &far, 10.0) > 0.5);
    }
}
