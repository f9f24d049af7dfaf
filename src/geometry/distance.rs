//! Minimum distance between two 3D line segments.
//!
//! Each segment is parametrized as `P(s) = p1 + s·d1`, `Q(t) = p2 + t·d2`
//! with `s, t ∈ [0, 1]`. The closest-approach parameters solve the 2×2
//! system
//!
//! ```text
//! [ a  -b ] [ s ]   [ -c ]      a = d1·d1, b = d1·d2, e = d2·d2
//! [ b  -e ] [ t ] = [ -f ]      c = d1·r,  f = d2·r,  r = p1 - p2
//! ```
//!
//! clamped to the unit square, re-solving the other parameter once when one
//! is clamped. The system is singular when either segment has (near) zero
//! length or the two are parallel; those cases fall back to projecting a
//! single endpoint and are reported through [`ClosestApproach`].

use serde::Serialize;

use super::{Point3, DEGENERATE_LENGTH_SQ};

/// Relative `sin²θ` below which two segments are treated as parallel.
const PARALLEL_SIN_SQ: f64 = 1e-12;

/// Which branch of the closest-point procedure produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClosestApproach {
    /// Both segments collapse to points
    BothDegenerate,
    /// The first segment collapses to a point
    FirstDegenerate,
    /// The second segment collapses to a point
    SecondDegenerate,
    /// Parallel (or anti-parallel) segments; the system is singular
    Parallel,
    /// Regular case
    General,
}

impl ClosestApproach {
    /// Whether the result came from a fallback projection.
    pub fn is_degenerate(&self) -> bool {
        !matches!(self, Self::General)
    }
}

/// Result of [`segment_distance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentDistance {
    /// Minimum distance between the segments (m)
    pub distance: f64,
    /// Parameter of the closest point on the first segment
    pub s: f64,
    /// Parameter of the closest point on the second segment
    pub t: f64,
    pub case: ClosestApproach,
}

#[inline]
fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Minimum distance between segments `p1–q1` and `p2–q2`.
pub fn segment_distance(p1: &Point3, q1: &Point3, p2: &Point3, q2: &Point3) -> SegmentDistance {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.dot(&d1);
    let e = d2.dot(&d2);
    let b = d1.dot(&d2);
    let c = d1.dot(&r);
    let f = d2.dot(&r);

    let case = if a <= DEGENERATE_LENGTH_SQ && e <= DEGENERATE_LENGTH_SQ {
        ClosestApproach::BothDegenerate
    } else if a <= DEGENERATE_LENGTH_SQ {
        ClosestApproach::FirstDegenerate
    } else if e <= DEGENERATE_LENGTH_SQ {
        ClosestApproach::SecondDegenerate
    } else if a * e - b * b <= PARALLEL_SIN_SQ * a * e {
        ClosestApproach::Parallel
    } else {
        ClosestApproach::General
    };

    let (s, t) = match case {
        ClosestApproach::BothDegenerate => (0.0, 0.0),
        // Project p1 onto the second segment.
        ClosestApproach::FirstDegenerate => (0.0, clamp01(f / e)),
        // Project p2 onto the first segment.
        ClosestApproach::SecondDegenerate => (clamp01(-c / a), 0.0),
        // Any s is a closest-approach parameter; pin it to the start point.
        ClosestApproach::Parallel => resolve_t(0.0, a, b, c, e, f),
        ClosestApproach::General => {
            let s = clamp01((b * f - c * e) / (a * e - b * b));
            resolve_t(s, a, b, c, e, f)
        }
    };

    let c1 = p1 + d1 * s;
    let c2 = p2 + d2 * t;
    SegmentDistance {
        distance: (c1 - c2).norm(),
        s,
        t,
        case,
    }
}

/// Closest `t` for a given `s`; if `t` leaves [0, 1], clamp it and recompute `s`.
fn resolve_t(s: f64, a: f64, b: f64, c: f64, e: f64, f: f64) -> (f64, f64) {
    let t = (b * s + f) / e;
    if t < 0.0 {
        (clamp01(-c / a), 0.0)
    } else if t > 1.0 {
        (clamp01((b - c) / a), 1.0)
    } else {
        (s, t)
    }
}
