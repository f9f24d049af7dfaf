//! Connectivity check for conductor networks.
//!
//! Path points are quantized to [`NodeKey`]s so endpoints that coincide
//! within the tolerance merge into one node. The resulting undirected
//! multigraph is classified as a single series path (one component, two
//! degree-1 terminals, every other node degree 2) or reported with every
//! condition it violates.

mod graph;
mod types;
mod verify;

pub use graph::EndpointGraph;
pub use types::*;
pub use verify::{classify, verify_network, ParallelEdge, TopologyReport, TopologyViolation};
