//! Graph assembly and simplification.
//!
//! The projected edge list is a multigraph: two nodes sharing `k` bridging ids
//! are joined by `k` parallel edges. [`CoGraph::assemble`] collapses those
//! into one edge per unordered pair, optionally keeping the multiplicity as
//! the edge weight, and strips self-loops.
//!
//! Nodes are inserted in sorted id order, so node indices (and everything
//! derived from them) are deterministic for a given input.

use crate::projection::ProjectedEdge;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Raw multigraph over the projected edges, one edge per projected pair.
pub fn multigraph(edges: &[ProjectedEdge]) -> UnGraph<String, u32> {
    let mut graph = UnGraph::<String, u32>::with_capacity(0, edges.len());
    let mut index: HashMap<&str, NodeIndex> = HashMap::new();
    for e in edges {
        let a = *index
            .entry(e.node_a.as_str())
            .or_insert_with(|| graph.add_node(e.node_a.clone()));
        let b = *index
            .entry(e.node_b.as_str())
            .or_insert_with(|| graph.add_node(e.node_b.clone()));
        graph.add_edge(a, b, 1);
    }
    graph
}

/// A simple undirected graph keyed by entity id.
#[derive(Debug, Clone)]
pub struct CoGraph {
    graph: UnGraph<String, u32>,
    index: HashMap<String, NodeIndex>,
    weighted: bool,
}

impl CoGraph {
    /// Build the simplified graph from a projected edge list.
    pub fn assemble(edges: &[ProjectedEdge], weighted: bool) -> Self {
        simplify(&multigraph(edges), weighted)
    }

    /// Re-simplify. A simplified graph comes back unchanged.
    pub fn simplify(&self) -> Self {
        simplify(&self.graph, self.weighted)
    }

    /// Underlying petgraph graph (node weight = id, edge weight = multiplicity or 1).
    pub fn graph(&self) -> &UnGraph<String, u32> {
        &self.graph
    }

    /// Whether edge weights carry multiplicity.
    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node ids in index order (sorted).
    pub fn node_ids(&self) -> Vec<&str> {
        self.graph.node_weights().map(String::as_str).collect()
    }

    /// Index of a node id.
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Degree of a node id.
    pub fn degree(&self, id: &str) -> Option<usize> {
        self.node_index(id).map(|n| self.graph.edges(n).count())
    }

    /// Degrees in node index order.
    pub fn degrees(&self) -> Vec<usize> {
        self.graph
            .node_indices()
            .map(|n| self.graph.edges(n).count())
            .collect()
    }

    /// Edges as `(a, b, weight)` with `a < b`, sorted.
    pub fn edges(&self) -> Vec<(&str, &str, u32)> {
        let mut out: Vec<(&str, &str, u32)> = self
            .graph
            .edge_references()
            .map(|e| {
                let a = self.graph[e.source()].as_str();
                let b = self.graph[e.target()].as_str();
                let (a, b) = if a <= b { (a, b) } else { (b, a) };
                (a, b, *e.weight())
            })
            .collect();
        out.sort_unstable();
        out
    }

    /// Serializable form.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            weighted: self.weighted,
            nodes: self.node_ids().into_iter().map(str::to_string).collect(),
            edges: self
                .edges()
                .into_iter()
                .map(|(a, b, weight)| SnapshotEdge {
                    source: a.to_string(),
                    target: b.to_string(),
                    weight,
                })
                .collect(),
        }
    }
}

/// Neighbor lists by node index, parallel edges collapsed, self-loops dropped.
pub fn neighbor_lists<N, E>(graph: &UnGraph<N, E>) -> Vec<Vec<usize>> {
    let mut adj = vec![Vec::new(); graph.node_count()];
    for e in graph.edge_references() {
        let (a, b) = (e.source().index(), e.target().index());
        if a != b {
            adj[a].push(b);
            adj[b].push(a);
        }
    }
    for list in &mut adj {
        list.sort_unstable();
        list.dedup();
    }
    adj
}

/// Collapse parallel edges and drop self-loops.
///
/// Nodes that only touched self-loops disappear: the node set is exactly the
/// endpoints of surviving edges.
pub fn simplify(graph: &UnGraph<String, u32>, weighted: bool) -> CoGraph {
    let mut collapsed: BTreeMap<(&str, &str), u32> = BTreeMap::new();
    let mut self_loops = 0usize;
    for e in graph.edge_references() {
        let a = graph[e.source()].as_str();
        let b = graph[e.target()].as_str();
        if a == b {
            self_loops += 1;
            continue;
        }
        let key = if a < b { (a, b) } else { (b, a) };
        let w = collapsed.entry(key).or_insert(0);
        *w = w.saturating_add(*e.weight());
    }
    if self_loops > 0 {
        debug!(self_loops, "stripped self-loops");
    }

    let ids: BTreeSet<&str> = collapsed.keys().flat_map(|&(a, b)| [a, b]).collect();
    let mut out = UnGraph::<String, u32>::with_capacity(ids.len(), collapsed.len());
    let mut index = HashMap::with_capacity(ids.len());
    for id in ids {
        let n = out.add_node(id.to_string());
        index.insert(id.to_string(), n);
    }
    for ((a, b), w) in collapsed {
        out.add_edge(index[a], index[b], if weighted { w } else { 1 });
    }
    debug!(
        before = graph.edge_count(),
        after = out.edge_count(),
        nodes = out.node_count(),
        "simplified graph"
    );

    CoGraph {
        graph: out,
        index,
        weighted,
    }
}

/// Persisted form of a [`CoGraph`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Whether weights carry multiplicity.
    pub weighted: bool,
    /// Node ids, sorted.
    pub nodes: Vec<String>,
    /// Edges, sorted.
    pub edges: Vec<SnapshotEdge>,
}

/// One edge of a [`GraphSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEdge {
    /// Smaller endpoint id.
    pub source: String,
    /// Larger endpoint id.
    pub target: String,
    /// Multiplicity (1 when unweighted).
    pub weight: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(list: &[(&str, &str, &str)]) -> Vec<ProjectedEdge> {
        list.iter()
            .map(|&(k, a, b)| ProjectedEdge::new(k, a, b))
            .collect()
    }

    #[test]
    fn test_collapses_parallel_edges() {
        let e = edges(&[("u1", "a", "b"), ("u2", "b", "a"), ("u3", "b", "c")]);
        let g = CoGraph::assemble(&e, false);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.edges(), vec![("a", "b", 1), ("b", "c", 1)]);
        assert_eq!(g.degree("b"), Some(2));
    }

    #[test]
    fn test_weighted_keeps_multiplicity() {
        let e = edges(&[("u1", "a", "b"), ("u2", "b", "a"), ("u3", "b", "c")]);
        let g = CoGraph::assemble(&e, true);
        assert_eq!(g.edges(), vec![("a", "b", 2), ("b", "c", 1)]);
    }

    #[test]
    fn test_strips_self_loops() {
        let e = edges(&[("u1", "a", "a"), ("u2", "a", "b"), ("u3", "z", "z")]);
        let g = CoGraph::assemble(&e, false);
        assert_eq!(g.node_ids(), vec!["a", "b"]);
        assert_eq!(g.edge_count(), 1);
        assert!(g.node_index("z").is_none());
    }

    #[test]
    fn test_simplify_is_idempotent() {
        let e = edges(&[
            ("u1", "c", "a"),
            ("u1", "a", "b"),
            ("u2", "a", "b"),
            ("u2", "b", "b"),
            ("u3", "d", "c"),
        ]);
        for weighted in [false, true] {
            let once = CoGraph::assemble(&e, weighted);
            let twice = once.simplify();
            assert_eq!(once.snapshot(), twice.snapshot());
        }
    }

    #[test]
    fn test_neighbor_lists() {
        let g = UnGraph::<(), ()>::from_edges([(0, 1), (1, 0), (1, 1), (1, 2)]);
        assert_eq!(neighbor_lists(&g), vec![vec![1], vec![0, 2], vec![1]]);
    }

    #[test]
    fn test_empty() {
        let g = CoGraph::assemble(&[], false);
        assert_eq!(g.node_count(), 0);
        assert!(g.degrees().is_empty());
    }
}
