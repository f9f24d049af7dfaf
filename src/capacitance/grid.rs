//! Uniform 3D hash grid over segment midpoints.

use std::collections::HashMap;

use crate::error::{BfemError, Result};
use crate::geometry::{Point3, Segment};

/// Largest cell index magnitude; neighbors one step away must still fit in `i64`.
const MAX_CELL_INDEX: f64 = (1u64 << 62) as f64;

/// Integer grid coordinate, `floor(coord / cell_size)` per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl CellKey {
    /// Cell holding `p`, or `None` when an index falls outside the grid range.
    pub fn of(p: &Point3, cell_size: f64) -> Option<Self> {
        let index = |c: f64| {
            let q = (c / cell_size).floor();
            (q.abs() < MAX_CELL_INDEX).then_some(q as i64)
        };
        Some(Self {
            x: index(p.x)?,
            y: index(p.y)?,
            z: index(p.z)?,
        })
    }

    fn offset(&self, dx: i64, dy: i64, dz: i64) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            z: self.z.saturating_add(dz),
        }
    }
}

/// Bucketed segment indices keyed by the cell holding each midpoint.
///
/// A query returns everything in the 3×3×3 block of cells around a
/// segment's own cell. With the cell size equal to the search radius this
/// is a superset of the segments whose midpoint lies within the radius, so
/// callers still apply an exact distance cull.
///
/// Segments longer than the cell size can approach each other within the
/// radius while their midpoints sit further apart than one cell; such pairs
/// are not returned. [`long_segment_count`](Self::long_segment_count) tells
/// how many segments are exposed to this.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<usize>>,
    segment_cells: Vec<CellKey>,
    long_segments: usize,
}

impl SpatialGrid {
    /// Bucket every segment by its midpoint.
    ///
    /// Fails with a data error when a midpoint lies too far from the origin
    /// to be indexed at this cell size.
    pub fn build(segments: &[Segment], cell_size: f64) -> Result<Self> {
        if !(cell_size > 0.0) || !cell_size.is_finite() {
            return Err(BfemError::invalid_parameter(
                "cell_size",
                format!("must be a positive finite length, got {}", cell_size),
            ));
        }

        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        let mut segment_cells = Vec::with_capacity(segments.len());
        for (i, seg) in segments.iter().enumerate() {
            let key = CellKey::of(&seg.midpoint, cell_size).ok_or_else(|| {
                BfemError::data(format!(
                    "segment {} midpoint ({:e}, {:e}, {:e}) m is out of grid range for cell size {} m",
                    i, seg.midpoint.x, seg.midpoint.y, seg.midpoint.z, cell_size
                ))
            })?;
            cells.entry(key).or_default().push(i);
            segment_cells.push(key);
        }
        let long_segments = segments.iter().filter(|s| s.length > cell_size).count();

        tracing::debug!(
            segments = segments.len(),
            cells = cells.len(),
            cell_size,
            "built spatial grid"
        );
        Ok(Self {
            cell_size,
            cells,
            segment_cells,
            long_segments,
        })
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of indexed segments longer than one cell.
    pub fn long_segment_count(&self) -> usize {
        self.long_segments
    }

    /// Cell holding the midpoint of segment `index`.
    pub fn cell_of(&self, index: usize) -> Option<CellKey> {
        self.segment_cells.get(index).copied()
    }

    /// Candidate neighbors of segment `index` (including itself).
    ///
    /// Every indexed segment appears at most once.
    pub fn candidates(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let center = self.cell_of(index);
        center
            .into_iter()
            .flat_map(|c| {
                (-1..=1).flat_map(move |dx| {
                    (-1..=1).flat_map(move |dy| (-1..=1).map(move |dz| c.offset(dx, dy, dz)))
                })
            })
            .filter_map(move |key| self.cells.get(&key))
            .flat_map(|bucket| bucket.iter().copied())
    }
}
