//! Core types for the endpoint graph.

use std::fmt;

use serde::Serialize;

use crate::error::{BfemError, Result};
use crate::geometry::Point3;

/// Default endpoint match tolerance: 1e-3 mm.
pub const DEFAULT_TOLERANCE_M: f64 = 1.0e-6;

/// A quantized 3D coordinate.
///
/// Two points are the same node iff their keys are equal. Identity is the
/// value itself, so keys can be copied and compared freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeKey {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl NodeKey {
    /// Quantize a point to the grid of spacing `tolerance` (m).
    pub fn quantize(p: &Point3, tolerance: f64) -> Self {
        let q = 1.0 / tolerance;
        Self {
            x: (p.x * q).round() as i64,
            y: (p.y * q).round() as i64,
            z: (p.z * q).round() as i64,
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Index of an edge in the graph's edge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub usize);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// An undirected connection between two nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub a: NodeKey,
    pub b: NodeKey,
    /// Index of the originating path in the network
    pub path: usize,
}

impl Edge {
    /// Node pair in canonical (sorted) order.
    pub fn key(&self) -> (NodeKey, NodeKey) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }
}

/// How paths are turned into graph edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum EdgeMode {
    /// Every consecutive point pair is an edge
    #[default]
    Segments,
    /// Each path is one edge from its first to its last point
    PathEndpoints,
}

impl fmt::Display for EdgeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Segments => write!(f, "segments"),
            Self::PathEndpoints => write!(f, "path-endpoints"),
        }
    }
}

/// Configuration for the topology check.
#[derive(Debug, Clone)]
pub struct TopologyConfig {
    /// Endpoint match tolerance (m).
    ///
    /// Must be finer than real geometric features and coarser than float
    /// noise; it is not tuned automatically.
    pub tolerance: f64,
    /// Edge extraction mode
    pub edge_mode: EdgeMode,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE_M,
            edge_mode: EdgeMode::default(),
        }
    }
}

impl TopologyConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint match tolerance (in meters).
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the endpoint match tolerance in millimeters.
    pub fn with_tolerance_mm(self, tolerance_mm: f64) -> Self {
        self.with_tolerance(tolerance_mm * 1.0e-3)
    }

    pub fn with_edge_mode(mut self, edge_mode: EdgeMode) -> Self {
        self.edge_mode = edge_mode;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance > 0.0) || !self.tolerance.is_finite() {
            return Err(BfemError::invalid_parameter(
                "tolerance",
                format!("must be a positive finite length, got {}", self.tolerance),
            ));
        }
        Ok(())
    }
}
