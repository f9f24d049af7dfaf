//! Air-only effective capacitance estimate.
//!
//! A coarse feasibility ranking tool, not a field solver. The model:
//!
//! - Only pairs of segments that are spatially close, nearly parallel (or
//!   anti-parallel), and far apart along the conductor are considered.
//! - Each pair is a parallel plate of width `w` (the wire width) and length
//!   `min(L_i, L_j)`, separated by `gap = max(d - w, ε)` where `d` is the true
//!   centerline distance:
//!
//!   ```text
//!   c_ij = k · ε₀ · w · min(L_i, L_j) / gap
//!   ```
//!
//!   `k` is an empirical fudge factor for fringing and non-ideal facing
//!   geometry.
//! - The voltage is assumed to vary linearly along the normalized arclength
//!   `s ∈ [0, 1]` from one terminal to the other. Energy equivalence then
//!   gives
//!
//!   ```text
//!   C_eff = Σ c_ij · (s_i - s_j)²
//!   ```
//!
//! All three assumptions bound the accuracy of the result. The sum is
//! accumulated in a fixed scan order; reordering the pairs changes it only
//! within floating-point tolerance.

mod estimator;
mod grid;

pub use estimator::{estimate, estimate_network, pair_capacitance, CapacitanceReport, PairContribution};
pub use grid::{CellKey, SpatialGrid};

use crate::error::{BfemError, Result};
use crate::geometry::Segment;

/// Vacuum permittivity ε₀ in farads per meter (F/m).
pub const VACUUM_PERMITTIVITY: f64 = 8.854_187_812_8e-12;

/// Default neighbor search radius: 3 mm.
pub const DEFAULT_SEARCH_RADIUS_M: f64 = 3.0e-3;

/// Default minimum index separation between paired segments.
pub const DEFAULT_MIN_INDEX_SEP: usize = 50;

/// Default minimum |cos θ| for two segments to count as parallel.
pub const DEFAULT_PARALLEL_COS: f64 = 0.95;

/// Default fudge factor on the parallel-plate proxy.
pub const DEFAULT_K_FACTOR: f64 = 0.35;

/// Default gap floor: 1 µm.
pub const DEFAULT_MIN_GAP_M: f64 = 1.0e-6;

/// Tunables of the capacitance estimate.
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    /// Neighbor search radius (m); also the spatial grid cell size
    pub search_radius: f64,
    /// Pairs with `j - i <= min_index_sep` are the same local stretch of wire
    pub min_index_sep: usize,
    /// Minimum |cos θ| between segment directions
    pub parallel_cos: f64,
    /// Fudge factor `k`
    pub k_factor: f64,
    /// Floor on the plate gap (m)
    pub min_gap: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            search_radius: DEFAULT_SEARCH_RADIUS_M,
            min_index_sep: DEFAULT_MIN_INDEX_SEP,
            parallel_cos: DEFAULT_PARALLEL_COS,
            k_factor: DEFAULT_K_FACTOR,
            min_gap: DEFAULT_MIN_GAP_M,
        }
    }
}

impl EstimatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search radius (in meters).
    pub fn with_search_radius(mut self, search_radius: f64) -> Self {
        self.search_radius = search_radius;
        self
    }

    /// Set the search radius in millimeters.
    pub fn with_search_radius_mm(self, search_mm: f64) -> Self {
        self.with_search_radius(search_mm * 1.0e-3)
    }

    pub fn with_min_index_sep(mut self, min_index_sep: usize) -> Self {
        self.min_index_sep = min_index_sep;
        self
    }

    pub fn with_parallel_cos(mut self, parallel_cos: f64) -> Self {
        self.parallel_cos = parallel_cos;
        self
    }

    pub fn with_k_factor(mut self, k_factor: f64) -> Self {
        self.k_factor = k_factor;
        self
    }

    /// Set the gap floor (in meters).
    pub fn with_min_gap(mut self, min_gap: f64) -> Self {
        self.min_gap = min_gap;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.search_radius > 0.0) || !self.search_radius.is_finite() {
            return Err(BfemError::invalid_parameter(
                "search_radius",
                format!("must be a positive finite length, got {}", self.search_radius),
            ));
        }
        if !(0.0..=1.0).contains(&self.parallel_cos) {
            return Err(BfemError::invalid_parameter(
                "parallel_cos",
                format!("must be within [0, 1], got {}", self.parallel_cos),
            ));
        }
        if !(self.k_factor > 0.0) || !self.k_factor.is_finite() {
            return Err(BfemError::invalid_parameter(
                "k_factor",
                format!("must be positive, got {}", self.k_factor),
            ));
        }
        if !(self.min_gap > 0.0) || !self.min_gap.is_finite() {
            return Err(BfemError::invalid_parameter(
                "min_gap",
                format!("must be a positive finite length, got {}", self.min_gap),
            ));
        }
        Ok(())
    }

    /// Index, distance and orientation filters, in that order.
    ///
    /// Expects `i < j`.
    pub fn accepts(&self, i: usize, j: usize, si: &Segment, sj: &Segment) -> bool {
        if j.abs_diff(i) <= self.min_index_sep {
            return false;
        }
        if (si.midpoint - sj.midpoint).norm() > self.search_radius {
            return false;
        }
        si.direction.dot(&sj.direction).abs() >= self.parallel_cos
    }
}
