//! Pair scan and aggregation.

use std::fmt;

use serde::Serialize;

use super::grid::SpatialGrid;
use super::{EstimatorConfig, VACUUM_PERMITTIVITY};
use crate::error::{BfemError, Result};
use crate::geometry::{build_segments, segment_distance, ClosestApproach, Segment, SegmentChain};
use crate::network::ConductorNetwork;

/// Contribution of one accepted segment pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairContribution {
    /// True centerline distance (m)
    pub distance: f64,
    /// Plate gap after subtracting the wire width and flooring (m)
    pub gap: f64,
    /// Parallel-plate proxy `c_ij` (F)
    pub capacitance: f64,
    /// Energy weight `(s_i - s_j)²`
    pub weight: f64,
    /// Closest-point branch used for `distance`
    pub case: ClosestApproach,
}

impl PairContribution {
    /// Contribution to the effective capacitance (F).
    pub fn effective(&self) -> f64 {
        self.capacitance * self.weight
    }
}

/// Parallel-plate proxy and energy weight for one pair.
///
/// Does not apply the acceptance filters; see [`EstimatorConfig::accepts`].
pub fn pair_capacitance(
    si: &Segment,
    sj: &Segment,
    wire_width: f64,
    config: &EstimatorConfig,
) -> PairContribution {
    let closest = segment_distance(&si.a, &si.b, &sj.a, &sj.b);
    let gap = (closest.distance - wire_width).max(config.min_gap);
    let area = wire_width * si.length.min(sj.length);
    let capacitance = config.k_factor * VACUUM_PERMITTIVITY * area / gap;
    let ds = si.s_mid - sj.s_mid;

    PairContribution {
        distance: closest.distance,
        gap,
        capacitance,
        weight: ds * ds,
        case: closest.case,
    }
}

/// Result of the capacitance estimate.
#[derive(Debug, Clone, Serialize)]
pub struct CapacitanceReport {
    pub segment_count: usize,
    pub total_length_m: f64,
    pub wire_width_m: f64,
    /// Accepted segment pairs
    pub pair_count: usize,
    /// Accepted pairs measured through a fallback projection
    pub degenerate_pairs: usize,
    /// Segments longer than the search radius (possible missed neighbors)
    pub long_segment_count: usize,
    /// Effective capacitance (F)
    pub c_eff_f: f64,
}

impl CapacitanceReport {
    /// Effective capacitance in picofarads.
    pub fn c_eff_pf(&self) -> f64 {
        self.c_eff_f * 1.0e12
    }
}

impl fmt::Display for CapacitanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "segments: {}", self.segment_count)?;
        writeln!(f, "length_total: {:.6} m", self.total_length_m)?;
        writeln!(f, "pairs_used: {}", self.pair_count)?;
        if self.degenerate_pairs > 0 {
            writeln!(f, "degenerate_pairs: {}", self.degenerate_pairs)?;
        }
        if self.long_segment_count > 0 {
            writeln!(
                f,
                "note: {} segment(s) longer than the search radius; some near pairs may be missed",
                self.long_segment_count
            )?;
        }
        writeln!(f, "C_eff_air_est: {:.6e} F", self.c_eff_f)?;
        write!(f, "C_eff_air_est: {:.6} pF", self.c_eff_pf())
    }
}

/// Estimate the effective capacitance of a segment chain.
///
/// Every unordered pair is visited once: each segment only pairs with
/// grid candidates of higher index.
pub fn estimate(chain: &SegmentChain, wire_width: f64, config: &EstimatorConfig) -> Result<CapacitanceReport> {
    config.validate()?;
    if !(wire_width > 0.0) || !wire_width.is_finite() {
        return Err(BfemError::invalid_parameter(
            "wire_width",
            format!("must be a positive finite length, got {}", wire_width),
        ));
    }
    if chain.is_empty() {
        return Err(BfemError::data("segment list is empty"));
    }

    let segs = &chain.segments;
    let grid = SpatialGrid::build(segs, config.search_radius)?;
    if grid.long_segment_count() > 0 {
        tracing::warn!(
            long_segments = grid.long_segment_count(),
            search_radius = config.search_radius,
            "segments longer than the search radius; nearby pairs may be missed"
        );
    }

    let mut c_eff = 0.0;
    let mut pair_count = 0usize;
    let mut degenerate_pairs = 0usize;

    for (i, si) in segs.iter().enumerate() {
        for j in grid.candidates(i) {
            if j <= i {
                continue;
            }
            let sj = &segs[j];
            if !config.accepts(i, j, si, sj) {
                continue;
            }

            let pair = pair_capacitance(si, sj, wire_width, config);
            if pair.case.is_degenerate() {
                tracing::trace!(i, j, case = ?pair.case, "closest point by fallback projection");
                degenerate_pairs += 1;
            }
            c_eff += pair.effective();
            pair_count += 1;
        }
    }

    tracing::debug!(pairs = pair_count, c_eff, "capacitance estimate done");
    Ok(CapacitanceReport {
        segment_count: chain.len(),
        total_length_m: chain.total_length,
        wire_width_m: wire_width,
        pair_count,
        degenerate_pairs,
        long_segment_count: grid.long_segment_count(),
        c_eff_f: c_eff,
    })
}

/// Estimate the effective capacitance of a network's primary path.
pub fn estimate_network(network: &ConductorNetwork, config: &EstimatorConfig) -> Result<CapacitanceReport> {
    let path = network.primary_path()?;
    let wire_width = network.require_wire_width()?;
    let chain = build_segments(&path.points)?;
    tracing::debug!(path = %path.name, segments = chain.len(), "built segments");
    estimate(&chain, wire_width, config)
}
