//! # BFEM Core
//!
//! Connectivity and air-capacitance analysis for exported conductor
//! networks (polyline approximations of wound conductors).
//!
//! This library answers two questions about a network exported by the
//! geometry generator:
//! - Does all conductive geometry form a single uninterrupted series path
//!   between two terminals?
//! - What is its approximate parasitic self-capacitance in air?
//!
//! ## Architecture
//!
//! - [`network`] - Loader for the exported JSON document (schema, units, paths)
//! - [`geometry`] - Segments and segment-to-segment distance
//! - [`topology`] - Quantized endpoint graph and series-path classification
//! - [`capacitance`] - Spatial grid and the parallel-plate energy estimate
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! bfem topology network.json --tol-mm 1e-3
//! bfem capacitance network.json --search-mm 3.0 --min-index-sep 50
//! ```
//!
//! ### Library
//!
//! ```no_run
//! use bfem_core::{capacitance::EstimatorConfig, network, topology::TopologyConfig};
//!
//! let net = network::load_file(std::path::Path::new("network.json"))?;
//! let topo = bfem_core::topology::verify_network(&net, &TopologyConfig::default())?;
//! let cap = bfem_core::capacitance::estimate_network(&net, &EstimatorConfig::default())?;
//! println!("series path: {}, C_eff = {:.3} pF", topo.is_single_series_path(), cap.c_eff_pf());
//! # Ok::<(), bfem_core::BfemError>(())
//! ```
//!
//! ## Capacitance Model
//!
//! The estimate is a quasi-static lumped approximation meant for ranking
//! design variants, not a field solution:
//!
//! 1. Pair nearby, nearly parallel segments that are far apart along the wire
//! 2. Treat each pair as a parallel plate scaled by a fudge factor
//! 3. Weight each pair by the squared difference of its normalized arclength
//!    positions (linear voltage profile between the terminals)

pub mod capacitance;
pub mod error;
pub mod geometry;
pub mod network;
pub mod topology;

// Re-export main types for convenience
pub use capacitance::{CapacitanceReport, EstimatorConfig};
pub use error::{BfemError, Result};
pub use network::ConductorNetwork;
pub use topology::{TopologyConfig, TopologyReport};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::{estimate_capacitance, verify_topology};
