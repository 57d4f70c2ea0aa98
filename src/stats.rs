//! Whole-graph statistics.
//!
//! | Statistic | Definition |
//! |-----------|------------|
//! | density | `m / (n(n-1)/2)` |
//! | average path length | mean BFS distance over reachable pairs only |
//! | diameter | longest finite shortest path |
//! | components | connected components, isolated nodes included |
//!
//! Disconnected graphs are fine: unreachable pairs are simply skipped, the
//! same convention as the usual "mean distance" of a disconnected graph.
//!
//! Values are kept at full precision in [`GraphStats`]; rounding only
//! happens when they are written into a [`StatsTable`].
//!
//! ```rust
//! use cograph::stats::GraphStats;
//! use petgraph::graph::UnGraph;
//!
//! // Path a - b - c
//! let g = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2)]);
//! let s = GraphStats::compute(&g).unwrap();
//! assert_eq!(s.diameter, 2);
//! assert!((s.density - 2.0 / 3.0).abs() < 1e-12);
//! ```

use crate::error::{Error, Result};
use crate::graph::neighbor_lists;
use petgraph::algo::connected_components;
use petgraph::graph::UnGraph;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Round to `places` decimals.
pub fn round_to(x: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (x * scale).round() / scale
}

/// Statistics of a simple undirected graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of edges.
    pub edge_count: usize,
    /// Median degree.
    pub degree_median: f64,
    /// Mean degree.
    pub degree_mean: f64,
    /// Largest degree.
    pub degree_max: usize,
    /// Smallest degree.
    pub degree_min: usize,
    /// Nodes with degree exactly 1.
    pub degree_one_count: usize,
    /// Edge density.
    pub density: f64,
    /// Mean shortest-path length over reachable pairs.
    pub average_path_length: f64,
    /// Longest finite shortest path.
    pub diameter: usize,
    /// Number of connected components.
    pub component_count: usize,
}

impl GraphStats {
    /// Compute all statistics. Edge weights are ignored.
    pub fn compute<N, E>(graph: &UnGraph<N, E>) -> Result<Self> {
        let n = graph.node_count();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        let m = graph.edge_count();

        let adj = neighbor_lists(graph);
        let mut degrees: Vec<usize> = adj.iter().map(Vec::len).collect();
        degrees.sort_unstable();

        let degree_median = if n % 2 == 1 {
            degrees[n / 2] as f64
        } else {
            (degrees[n / 2 - 1] + degrees[n / 2]) as f64 / 2.0
        };
        let degree_mean = degrees.iter().sum::<usize>() as f64 / n as f64;

        let density = if n < 2 {
            0.0
        } else {
            m as f64 / (n as f64 * (n as f64 - 1.0) / 2.0)
        };

        let paths = path_summary(&adj);
        let average_path_length = if paths.pairs == 0 {
            0.0
        } else {
            paths.total as f64 / paths.pairs as f64
        };

        Ok(Self {
            node_count: n,
            edge_count: m,
            degree_median,
            degree_mean,
            degree_max: degrees[n - 1],
            degree_min: degrees[0],
            degree_one_count: degrees.iter().filter(|&&d| d == 1).count(),
            density,
            average_path_length,
            diameter: paths.longest,
            component_count: connected_components(graph),
        })
    }

    /// Write the graph-level entries into `table`, rounded for storage.
    pub fn write_into(&self, table: &mut StatsTable) {
        table.insert("node_count", self.node_count as f64);
        table.insert("edge_count", self.edge_count as f64);
        table.insert("degree_median", self.degree_median);
        table.insert("degree_mean", round_to(self.degree_mean, 2));
        table.insert("degree_max", self.degree_max as f64);
        table.insert("degree_one_count", self.degree_one_count as f64);
        table.insert("density", round_to(self.density, 4));
        table.insert("average_path_length", round_to(self.average_path_length, 2));
        table.insert("diameter", self.diameter as f64);
        table.insert("component_count", self.component_count as f64);
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct PathSummary {
    total: u64,
    pairs: u64,
    longest: usize,
}

/// BFS from every node. Sources run in parallel; the integer reduction makes
/// the result independent of scheduling.
fn path_summary(adj: &[Vec<usize>]) -> PathSummary {
    (0..adj.len())
        .into_par_iter()
        .map(|source| bfs_from(adj, source))
        .reduce(PathSummary::default, |a, b| PathSummary {
            total: a.total + b.total,
            pairs: a.pairs + b.pairs,
            longest: a.longest.max(b.longest),
        })
}

fn bfs_from(adj: &[Vec<usize>], source: usize) -> PathSummary {
    let mut dist = vec![usize::MAX; adj.len()];
    let mut queue = VecDeque::new();
    let mut out = PathSummary::default();
    dist[source] = 0;
    queue.push_back(source);
    while let Some(u) = queue.pop_front() {
        for &v in &adj[u] {
            if dist[v] == usize::MAX {
                dist[v] = dist[u] + 1;
                out.total += dist[v] as u64;
                out.pairs += 1;
                out.longest = out.longest.max(dist[v]);
                queue.push_back(v);
            }
        }
    }
    out
}

/// Ordered `name -> value` table.
///
/// Insertion order is preserved; inserting an existing name overwrites its
/// value in place, so stages can fill in their own entries independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsTable {
    rows: Vec<(String, f64)>,
}

impl StatsTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`.
    pub fn insert(&mut self, name: &str, value: f64) {
        match self.rows.iter_mut().find(|(k, _)| k == name) {
            Some(row) => row.1 = value,
            None => self.rows.push((name.to_string(), value)),
        }
    }

    /// Value of `name`.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.rows.iter().find(|(k, _)| k == name).map(|&(_, v)| v)
    }

    /// Entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rows.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Statistic names in order.
    pub fn names(&self) -> Vec<&str> {
        self.rows.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(n: u32) -> UnGraph<(), ()> {
        let mut edges = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                edges.push((i, j));
            }
        }
        UnGraph::from_edges(edges)
    }

    #[test]
    fn test_complete_graph_density() {
        let s = GraphStats::compute(&complete(4)).unwrap();
        assert_eq!(s.node_count, 4);
        assert_eq!(s.edge_count, 6);
        assert!((s.density - 1.0).abs() < 1e-12);
        assert_eq!(s.diameter, 1);
        assert_eq!(s.component_count, 1);
        assert_eq!(s.degree_one_count, 0);
    }

    #[test]
    fn test_two_triangles() {
        let g = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)]);
        let s = GraphStats::compute(&g).unwrap();
        assert_eq!(s.node_count, 6);
        assert_eq!(s.edge_count, 6);
        assert_eq!(s.component_count, 2);
        assert_eq!(s.diameter, 1);
        assert!((s.density - 0.4).abs() < 1e-12);
        assert!((s.average_path_length - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_path_and_star() {
        // Star centred on 0 with leaves 1..=4, plus a tail 4 - 5.
        let g = UnGraph::<(), ()>::from_edges([(0, 1), (0, 2), (0, 3), (0, 4), (4, 5)]);
        let s = GraphStats::compute(&g).unwrap();
        assert_eq!(s.degree_max, 4);
        assert_eq!(s.degree_min, 1);
        assert_eq!(s.degree_one_count, 4);
        // Degrees sorted: 1 1 1 1 2 4
        assert!((s.degree_median - 1.0).abs() < 1e-12);
        assert!((s.degree_mean - 10.0 / 6.0).abs() < 1e-12);
        assert_eq!(s.diameter, 3);
    }

    #[test]
    fn test_no_edges() {
        let mut g = UnGraph::<(), ()>::new_undirected();
        g.add_node(());
        g.add_node(());
        g.add_node(());
        let s = GraphStats::compute(&g).unwrap();
        assert_eq!(s.density, 0.0);
        assert_eq!(s.component_count, 3);
        assert_eq!(s.diameter, 0);
        assert_eq!(s.average_path_length, 0.0);
    }

    #[test]
    fn test_single_node() {
        let mut g = UnGraph::<(), ()>::new_undirected();
        g.add_node(());
        let s = GraphStats::compute(&g).unwrap();
        assert_eq!(s.density, 0.0);
        assert_eq!(s.component_count, 1);
    }

    #[test]
    fn test_empty_graph_is_error() {
        let g = UnGraph::<(), ()>::new_undirected();
        assert!(matches!(GraphStats::compute(&g), Err(Error::EmptyInput)));
    }

    #[test]
    fn test_table_rounding_and_order() {
        let g = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2)]);
        let s = GraphStats::compute(&g).unwrap();
        let mut t = StatsTable::new();
        t.insert("relation_rows", 5.0);
        s.write_into(&mut t);
        assert_eq!(t.names()[0], "relation_rows");
        assert_eq!(t.get("density"), Some(0.6667));
        assert_eq!(t.get("degree_mean"), Some(1.33));
        assert_eq!(t.get("average_path_length"), Some(1.33));

        t.insert("relation_rows", 6.0);
        assert_eq!(t.names()[0], "relation_rows");
        assert_eq!(t.get("relation_rows"), Some(6.0));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.0 / 3.0, 4), 0.6667);
        assert_eq!(round_to(1.005, 0), 1.0);
    }
}
