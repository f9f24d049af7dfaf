//! 3D geometry of conductor centerlines.
//!
//! - [`segment`] turns an ordered point sequence into [`Segment`]s carrying
//!   length, direction and normalized arclength position.
//! - [`distance`] measures the true minimum distance between two segments.

pub mod distance;
pub mod segment;

pub use distance::{segment_distance, ClosestApproach, SegmentDistance};
pub use segment::{build_segments, Segment, SegmentChain};

/// Point / displacement type, in meters.
pub type Point3 = nalgebra::Vector3<f64>;

/// Squared length below which a segment is treated as a point.
pub const DEGENERATE_LENGTH_SQ: f64 = 1e-18;
