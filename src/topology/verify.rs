//! Single-series-path classification.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::graph::EndpointGraph;
use super::types::{EdgeMode, NodeKey, TopologyConfig};
use crate::error::Result;
use crate::network::ConductorNetwork;

/// A condition that keeps the network from being a single series path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TopologyViolation {
    /// Not exactly one connected component
    ComponentCount { found: usize },
    /// Not exactly two degree-1 terminals
    TerminalCount { found: usize },
    /// Nodes whose degree is neither 1 nor 2
    IrregularDegree { nodes: usize, degrees: Vec<usize> },
}

impl fmt::Display for TopologyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ComponentCount { found } => {
                write!(f, "expected 1 connected component, found {}", found)
            }
            Self::TerminalCount { found } => {
                write!(f, "expected 2 degree-1 terminals, found {}", found)
            }
            Self::IrregularDegree { nodes, degrees } => {
                let list: Vec<String> = degrees.iter().map(|d| d.to_string()).collect();
                write!(
                    f,
                    "found {} node(s) with degree not in {{1,2}} (degrees: {})",
                    nodes,
                    list.join(", ")
                )
            }
        }
    }
}

/// Node pair joined by more than one edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParallelEdge {
    pub a: NodeKey,
    pub b: NodeKey,
    pub paths: Vec<String>,
}

/// Result of the topology check.
#[derive(Debug, Clone, Serialize)]
pub struct TopologyReport {
    pub edge_mode: EdgeMode,
    pub tolerance_m: f64,
    pub node_count: usize,
    pub edge_count: usize,
    pub component_count: usize,
    /// Node count of each component, in discovery order
    pub component_sizes: Vec<usize>,
    pub degree_histogram: BTreeMap<usize, usize>,
    /// Degree-1 nodes
    pub terminals: Vec<NodeKey>,
    pub parallel_edges: Vec<ParallelEdge>,
    pub skipped_paths: Vec<String>,
    /// Every violated condition; empty iff the network is a single series path
    pub violations: Vec<TopologyViolation>,
}

impl TopologyReport {
    pub fn is_single_series_path(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn has_violation(&self, pred: impl Fn(&TopologyViolation) -> bool) -> bool {
        self.violations.iter().any(pred)
    }
}

/// Classify an endpoint graph.
///
/// A single series path has exactly one component, exactly two degree-1
/// nodes, and no node of any other degree besides 2. Each condition is
/// checked on its own so simultaneous defects are all reported.
pub fn classify(graph: &EndpointGraph, config: &TopologyConfig) -> TopologyReport {
    let components = graph.components();
    let degree_histogram = graph.degree_histogram();

    let terminals: Vec<NodeKey> = graph.nodes().filter(|n| graph.degree(n) == 1).copied().collect();
    let irregular = graph
        .nodes()
        .filter(|n| !matches!(graph.degree(n), 1 | 2))
        .count();

    let mut violations = Vec::new();
    if components.len() != 1 {
        violations.push(TopologyViolation::ComponentCount {
            found: components.len(),
        });
    }
    if terminals.len() != 2 {
        violations.push(TopologyViolation::TerminalCount {
            found: terminals.len(),
        });
    }
    if irregular > 0 {
        violations.push(TopologyViolation::IrregularDegree {
            nodes: irregular,
            degrees: degree_histogram
                .keys()
                .copied()
                .filter(|d| !matches!(*d, 1 | 2))
                .collect(),
        });
    }

    let parallel_edges = graph
        .edge_labels()
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|((a, b), names)| ParallelEdge {
            a,
            b,
            paths: names.into_iter().map(str::to_string).collect(),
        })
        .collect();

    TopologyReport {
        edge_mode: config.edge_mode,
        tolerance_m: config.tolerance,
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        component_count: components.len(),
        component_sizes: components.iter().map(Vec::len).collect(),
        degree_histogram,
        terminals,
        parallel_edges,
        skipped_paths: graph.skipped_paths().to_vec(),
        violations,
    }
}

/// Build the endpoint graph of a network and classify it.
pub fn verify_network(network: &ConductorNetwork, config: &TopologyConfig) -> Result<TopologyReport> {
    let graph = EndpointGraph::from_paths(&network.paths, config)?;
    let report = classify(&graph, config);
    if report.is_single_series_path() {
        tracing::info!(nodes = report.node_count, "network is a single series path");
    } else {
        tracing::info!(violations = report.violations.len(), "network is not a single series path");
    }
    Ok(report)
}

impl fmt::Display for TopologyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "endpoints: {}", self.node_count)?;
        writeln!(f, "edges ({}): {}", self.edge_mode, self.edge_count)?;
        writeln!(f, "components: {}", self.component_count)?;
        writeln!(f, "degree histogram:")?;
        for (deg, count) in &self.degree_histogram {
            writeln!(f, "  deg {}: {}", deg, count)?;
        }
        for name in &self.skipped_paths {
            writeln!(f, "skipped path with < 2 points: {}", name)?;
        }
        for pe in &self.parallel_edges {
            writeln!(f, "parallel edges {} - {}: {}", pe.a, pe.b, pe.paths.join(", "))?;
        }

        if self.is_single_series_path() {
            write!(f, "OK: graph is a single path (two terminals, all internal nodes degree-2)")
        } else {
            write!(f, "NOT a single series path")?;
            for v in &self.violations {
                write!(f, "\n  - reason: {}", v)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3;
    use crate::network::ConductorPath;

    fn key(x: i64, y: i64) -> NodeKey {
        NodeKey { x, y, z: 0 }
    }

    fn chain(n: i64) -> EndpointGraph {
        let mut g = EndpointGraph::new(vec!["chain".into(), "extra".into()]);
        for i in 0..n - 1 {
            g.add_edge(key(i, 0), key(i + 1, 0), 0);
        }
        g
    }

    #[test]
    fn test_straight_chain_is_series_path() {
        let paths = [ConductorPath {
            name: "line".into(),
            points: (0..6).map(|i| Point3::new(0.0, 0.0, i as f64 * 0.01)).collect(),
        }];
        let graph = EndpointGraph::from_paths(&paths, &TopologyConfig::new()).unwrap();
        let report = classify(&graph, &TopologyConfig::new());

        assert!(report.is_single_series_path());
        assert_eq!(report.component_count, 1);
        assert_eq!(report.terminals.len(), 2);
        assert_eq!(report.degree_histogram.get(&1), Some(&2));
        assert_eq!(report.degree_histogram.get(&2), Some(&4));
        assert_eq!(report.degree_histogram.len(), 2);
    }

    #[test]
    fn test_branch_reports_degree_only() {
        let mut g = chain(5);
        // Chord 1-3 raises two nodes to degree 3; terminals 0 and 4 stay.
        g.add_edge(key(1, 0), key(3, 0), 1);

        let report = classify(&g, &TopologyConfig::new());
        assert!(!report.is_single_series_path());
        assert_eq!(report.violations.len(), 1);
        assert_eq!(
            report.violations[0],
            TopologyViolation::IrregularDegree {
                nodes: 2,
                degrees: vec![3]
            }
        );
        assert!(!report.has_violation(|v| matches!(v, TopologyViolation::TerminalCount { .. })));
    }

    #[test]
    fn test_spur_reports_degree_and_terminals() {
        let mut g = chain(4);
        g.add_edge(key(1, 0), key(1, 1), 1);

        let report = classify(&g, &TopologyConfig::new());
        assert!(report.has_violation(|v| matches!(v, TopologyViolation::IrregularDegree { nodes: 1, .. })));
        assert!(report.has_violation(|v| *v == TopologyViolation::TerminalCount { found: 3 }));
        assert!(!report.has_violation(|v| matches!(v, TopologyViolation::ComponentCount { .. })));
    }

    #[test]
    fn test_disconnected_chains() {
        let mut g = chain(3);
        g.add_edge(key(10, 0), key(11, 0), 1);
        g.add_edge(key(11, 0), key(12, 0), 1);

        let report = classify(&g, &TopologyConfig::new());
        assert_eq!(report.component_count, 2);
        assert_eq!(report.component_sizes, vec![3, 3]);
        assert!(report.has_violation(|v| *v == TopologyViolation::ComponentCount { found: 2 }));
        assert!(report.has_violation(|v| *v == TopologyViolation::TerminalCount { found: 4 }));
        assert!(!report.has_violation(|v| matches!(v, TopologyViolation::IrregularDegree { .. })));
    }

    #[test]
    fn test_closed_loop_has_no_terminals() {
        let mut g = chain(4);
        g.add_edge(key(3, 0), key(0, 0), 0);

        let report = classify(&g, &TopologyConfig::new());
        assert_eq!(report.violations, vec![TopologyViolation::TerminalCount { found: 0 }]);
    }

    #[test]
    fn test_empty_graph() {
        let g = EndpointGraph::new(Vec::new());
        let report = classify(&g, &TopologyConfig::new());
        assert_eq!(
            report.violations,
            vec![
                TopologyViolation::ComponentCount { found: 0 },
                TopologyViolation::TerminalCount { found: 0 },
            ]
        );
    }

    #[test]
    fn test_parallel_edges_are_listed() {
        let mut g = chain(3);
        g.add_edge(key(0, 0), key(1, 0), 1);

        let report = classify(&g, &TopologyConfig::new());
        assert_eq!(report.parallel_edges.len(), 1);
        assert_eq!(report.parallel_edges[0].paths, vec!["chain", "extra"]);
    }

    #[test]
    fn test_display_lists_every_reason() {
        let mut g = chain(3);
        g.add_edge(key(10, 0), key(11, 0), 1);
        g.add_edge(key(10, 0), key(12, 0), 1);
        g.add_edge(key(10, 0), key(13, 0), 1);

        let text = classify(&g, &TopologyConfig::new()).to_string();
        assert!(text.contains("NOT a single series path"));
        assert!(text.contains("expected 1 connected component, found 2"));
        assert!(text.contains("expected 2 degree-1 terminals, found 5"));
        assert!(text.contains("degree not in {1,2}"));
    }
}
