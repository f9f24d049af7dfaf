//! Segment builder.

use super::Point3;
use crate::error::{BfemError, Result};

/// A straight piece of conductor between two consecutive path points.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Start point (m)
    pub a: Point3,
    /// End point (m)
    pub b: Point3,
    /// Midpoint (m)
    pub midpoint: Point3,
    /// Unit direction from `a` to `b`
    pub direction: Point3,
    /// Length (m), always > 0
    pub length: f64,
    /// Normalized arclength position of the midpoint, in [0, 1]
    pub s_mid: f64,
}

impl Segment {
    /// Build a segment from its endpoints and arclength position.
    ///
    /// Returns `None` for a zero-length (or non-finite) segment.
    pub fn from_endpoints(a: Point3, b: Point3, s_mid: f64) -> Option<Self> {
        let d = b - a;
        let length = d.norm();
        if !(length > 0.0) || !length.is_finite() {
            return None;
        }
        Some(Self {
            a,
            b,
            midpoint: a + d * 0.5,
            direction: d / length,
            length,
            s_mid,
        })
    }
}

/// The segments of one path, in path order.
#[derive(Debug, Clone)]
pub struct SegmentChain {
    pub segments: Vec<Segment>,
    /// Sum of all segment lengths (m)
    pub total_length: f64,
}

impl SegmentChain {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Length of the longest segment (m).
    pub fn longest_segment(&self) -> f64 {
        self.segments.iter().map(|s| s.length).fold(0.0, f64::max)
    }
}

/// Convert an ordered point sequence into segments.
///
/// Consecutive duplicate points produce no segment. The arclength position
/// of each segment is measured along the kept segments only, so it always
/// spans [0, 1] over the chain.
pub fn build_segments(points: &[Point3]) -> Result<SegmentChain> {
    if points.len() < 2 {
        return Err(BfemError::data(format!(
            "need at least 2 points to build segments, got {}",
            points.len()
        )));
    }

    let total_length: f64 = points.windows(2).map(|w| (w[1] - w[0]).norm()).sum();
    if !(total_length > 0.0) || !total_length.is_finite() {
        return Err(BfemError::data(format!(
            "total path length must be > 0, got {}",
            total_length
        )));
    }

    let mut segments = Vec::with_capacity(points.len() - 1);
    let mut s_acc = 0.0;
    let mut dropped = 0usize;
    for w in points.windows(2) {
        let length = (w[1] - w[0]).norm();
        let s_mid = (s_acc + 0.5 * length) / total_length;
        match Segment::from_endpoints(w[0], w[1], s_mid) {
            Some(seg) => {
                s_acc += seg.length;
                segments.push(seg);
            }
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, "dropped zero-length segments");
    }

    Ok(SegmentChain {
        segments,
        total_length,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn test_straight_chain() {
        let pts = [p(0.0, 0.0, 0.0), p(0.0, 0.0, 0.01), p(0.0, 0.0, 0.02), p(0.0, 0.0, 0.03)];
        let chain = build_segments(&pts).unwrap();

        assert_eq!(chain.len(), 3);
        assert_relative_eq!(chain.total_length, 0.03, epsilon = 1e-15);
        assert_relative_eq!(chain.segments[0].s_mid, 1.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(chain.segments[1].s_mid, 0.5, epsilon = 1e-12);
        assert_relative_eq!(chain.segments[2].s_mid, 5.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(chain.segments[1].midpoint.z, 0.015, epsilon = 1e-15);
        assert_relative_eq!(chain.segments[2].direction.z, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_duplicate_points_are_dropped() {
        let pts = [p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 2.0, 0.0)];
        let chain = build_segments(&pts).unwrap();

        assert_eq!(chain.len(), 2);
        assert_relative_eq!(chain.total_length, 3.0);
        assert_relative_eq!(chain.segments[0].s_mid, 0.5 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(chain.segments[1].s_mid, 2.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(chain.longest_segment(), 2.0);
    }

    #[test]
    fn test_all_degenerate_fails() {
        let pts = [p(1.0, 1.0, 1.0), p(1.0, 1.0, 1.0), p(1.0, 1.0, 1.0)];
        assert!(build_segments(&pts).unwrap_err().is_data());
    }

    #[test]
    fn test_single_point_fails() {
        assert!(build_segments(&[p(0.0, 0.0, 0.0)]).unwrap_err().is_data());
        assert!(build_segments(&[]).unwrap_err().is_data());
    }

    #[test]
    fn test_zero_length_segment_rejected() {
        assert!(Segment::from_endpoints(p(1.0, 2.0, 3.0), p(1.0, 2.0, 3.0), 0.0).is_none());
    }
}
