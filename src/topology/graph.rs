//! Undirected endpoint multigraph.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::types::{Edge, EdgeId, EdgeMode, NodeKey, TopologyConfig};
use crate::error::Result;
use crate::network::ConductorPath;

/// Endpoint graph built from quantized path points.
///
/// Nodes are keyed by value; each node maps to its `(neighbor, edge)`
/// entries, one per incident edge end. Parallel edges and self-loops are
/// kept, so a node's degree is simply the length of its entry list.
#[derive(Debug, Clone, Default)]
pub struct EndpointGraph {
    adjacency: BTreeMap<NodeKey, Vec<(NodeKey, EdgeId)>>,
    edges: Vec<Edge>,
    path_names: Vec<String>,
    skipped_paths: Vec<String>,
}

impl EndpointGraph {
    /// Create an empty graph over the given path names.
    pub fn new(path_names: Vec<String>) -> Self {
        Self {
            path_names,
            ..Self::default()
        }
    }

    /// Build the graph from every path, quantizing points at the configured tolerance.
    ///
    /// Paths with fewer than two points are skipped and listed in
    /// [`skipped_paths`](Self::skipped_paths).
    pub fn from_paths(paths: &[ConductorPath], config: &TopologyConfig) -> Result<Self> {
        config.validate()?;

        let mut graph = Self::new(paths.iter().map(|p| p.name.clone()).collect());
        let tol = config.tolerance;

        for (idx, path) in paths.iter().enumerate() {
            if path.points.len() < 2 {
                tracing::warn!(path = %path.name, points = path.points.len(), "skipping trivial path");
                graph.skipped_paths.push(path.name.clone());
                continue;
            }

            match config.edge_mode {
                EdgeMode::Segments => {
                    for w in path.points.windows(2) {
                        let a = NodeKey::quantize(&w[0], tol);
                        let b = NodeKey::quantize(&w[1], tol);
                        // Duplicate points collapse onto one node.
                        if a != b {
                            graph.add_edge(a, b, idx);
                        }
                    }
                }
                EdgeMode::PathEndpoints => {
                    let first = &path.points[0];
                    let last = &path.points[path.points.len() - 1];
                    graph.add_edge(NodeKey::quantize(first, tol), NodeKey::quantize(last, tol), idx);
                }
            }
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            mode = %config.edge_mode,
            "built endpoint graph"
        );
        Ok(graph)
    }

    /// Add an undirected edge originating from path index `path`.
    pub fn add_edge(&mut self, a: NodeKey, b: NodeKey, path: usize) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.adjacency.entry(a).or_default().push((b, id));
        self.adjacency.entry(b).or_default().push((a, id));
        self.edges.push(Edge { a, b, path });
        id
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// All nodes in ascending key order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeKey> {
        self.adjacency.keys()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Names of paths left out of the graph.
    pub fn skipped_paths(&self) -> &[String] {
        &self.skipped_paths
    }

    /// Name of the path an edge came from.
    pub fn path_name(&self, edge: EdgeId) -> &str {
        self.edges
            .get(edge.0)
            .and_then(|e| self.path_names.get(e.path))
            .map(String::as_str)
            .unwrap_or("?")
    }

    /// Number of incident edge ends (parallel edges counted individually).
    pub fn degree(&self, node: &NodeKey) -> usize {
        self.adjacency.get(node).map_or(0, Vec::len)
    }

    pub fn neighbors(&self, node: &NodeKey) -> impl Iterator<Item = &NodeKey> {
        self.adjacency
            .get(node)
            .into_iter()
            .flat_map(|adj| adj.iter().map(|(n, _)| n))
    }

    /// Partition the nodes into connected components (breadth-first).
    ///
    /// Components are discovered starting from the lowest unvisited key, so
    /// the result is deterministic.
    pub fn components(&self) -> Vec<Vec<NodeKey>> {
        let mut seen = BTreeSet::new();
        let mut components = Vec::new();

        for &start in self.adjacency.keys() {
            if !seen.insert(start) {
                continue;
            }
            let mut queue = VecDeque::from([start]);
            let mut component = Vec::new();
            while let Some(cur) = queue.pop_front() {
                component.push(cur);
                for &next in self.neighbors(&cur) {
                    if seen.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
            components.push(component);
        }

        components
    }

    /// Number of nodes per degree value.
    pub fn degree_histogram(&self) -> BTreeMap<usize, usize> {
        let mut hist = BTreeMap::new();
        for adj in self.adjacency.values() {
            *hist.entry(adj.len()).or_insert(0) += 1;
        }
        hist
    }

    /// Path names of every edge, grouped by undirected node pair.
    pub fn edge_labels(&self) -> BTreeMap<(NodeKey, NodeKey), Vec<&str>> {
        let mut labels: BTreeMap<(NodeKey, NodeKey), Vec<&str>> = BTreeMap::new();
        for (idx, edge) in self.edges.iter().enumerate() {
            labels
                .entry(edge.key())
                .or_default()
                .push(self.path_name(EdgeId(idx)));
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3;

    fn key(x: i64) -> NodeKey {
        NodeKey { x, y: 0, z: 0 }
    }

    fn path(name: &str, pts: &[(f64, f64, f64)]) -> ConductorPath {
        ConductorPath {
            name: name.to_string(),
            points: pts.iter().map(|&(x, y, z)| Point3::new(x, y, z)).collect(),
        }
    }

    #[test]
    fn test_chain_degrees() {
        let mut g = EndpointGraph::new(vec!["p".into()]);
        g.add_edge(key(0), key(1), 0);
        g.add_edge(key(1), key(2), 0);

        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.degree(&key(0)), 1);
        assert_eq!(g.degree(&key(1)), 2);
        assert_eq!(g.degree(&key(9)), 0);
        assert_eq!(g.components().len(), 1);
    }

    #[test]
    fn test_parallel_edges_count_twice() {
        let mut g = EndpointGraph::new(vec!["a".into(), "b".into()]);
        g.add_edge(key(0), key(1), 0);
        g.add_edge(key(1), key(0), 1);

        assert_eq!(g.degree(&key(0)), 2);
        let labels = g.edge_labels();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[&(key(0), key(1))], vec!["a", "b"]);
    }

    #[test]
    fn test_self_loop_counts_twice() {
        let mut g = EndpointGraph::new(vec!["ring".into()]);
        g.add_edge(key(5), key(5), 0);
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.degree(&key(5)), 2);
    }

    #[test]
    fn test_components_of_disjoint_chains() {
        let mut g = EndpointGraph::new(vec!["p".into(), "q".into()]);
        g.add_edge(key(0), key(1), 0);
        g.add_edge(key(1), key(2), 0);
        g.add_edge(key(10), key(11), 1);

        let comps = g.components();
        assert_eq!(comps.len(), 2);
        assert_eq!(comps[0], vec![key(0), key(1), key(2)]);
        assert_eq!(comps[1], vec![key(10), key(11)]);
    }

    #[test]
    fn test_histogram() {
        let mut g = EndpointGraph::new(vec!["p".into()]);
        g.add_edge(key(0), key(1), 0);
        g.add_edge(key(1), key(2), 0);
        g.add_edge(key(1), key(3), 0);

        let hist = g.degree_histogram();
        assert_eq!(hist.get(&1), Some(&3));
        assert_eq!(hist.get(&3), Some(&1));
        assert_eq!(hist.get(&2), None);
    }

    #[test]
    fn test_from_paths_segments_mode() {
        let paths = [path(
            "coil",
            &[(0.0, 0.0, 0.0), (0.001, 0.0, 0.0), (0.001, 0.0, 0.0), (0.002, 0.0, 0.0)],
        )];
        let g = EndpointGraph::from_paths(&paths, &TopologyConfig::new()).unwrap();
        // The duplicate point does not create a self-loop.
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_from_paths_endpoint_mode_merges_within_tolerance() {
        let paths = [
            path("a", &[(0.0, 0.0, 0.0), (0.005, 0.002, 0.0), (0.01, 0.0, 0.0)]),
            path("b", &[(0.01 + 2.0e-7, 0.0, 0.0), (0.02, 0.0, 0.0)]),
            path("stub", &[(1.0, 1.0, 1.0)]),
        ];
        let cfg = TopologyConfig::new().with_edge_mode(EdgeMode::PathEndpoints);
        let g = EndpointGraph::from_paths(&paths, &cfg).unwrap();

        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.skipped_paths(), ["stub".to_string()]);
        assert_eq!(g.path_name(EdgeId(1)), "b");
    }

    #[test]
    fn test_from_paths_endpoint_mode_closed_path_is_loop() {
        let paths = [path(
            "ring",
            &[(0.0, 0.0, 0.0), (0.01, 0.0, 0.0), (0.01, 0.01, 0.0), (0.0, 0.0, 0.0)],
        )];
        let cfg = TopologyConfig::new().with_edge_mode(EdgeMode::PathEndpoints);
        let g = EndpointGraph::from_paths(&paths, &cfg).unwrap();

        let origin = NodeKey::quantize(&Point3::zeros(), cfg.tolerance);
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.degree(&origin), 2);
        assert_eq!(g.degree_histogram().get(&2), Some(&1));
        assert_eq!(g.components().len(), 1);
    }

    #[test]
    fn test_from_paths_rejects_bad_tolerance() {
        let paths = [path("a", &[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)])];
        let cfg = TopologyConfig::new().with_tolerance(-1.0);
        assert!(EndpointGraph::from_paths(&paths, &cfg).is_err());
    }
}
