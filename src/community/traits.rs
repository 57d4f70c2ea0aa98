//! Community detection traits.

use crate::error::Result;
use petgraph::graph::UnGraph;

/// Trait for community detection algorithms.
pub trait CommunityDetection {
    /// Detect communities in a graph.
    ///
    /// Returns a mapping from node index to community ID. IDs are consecutive
    /// from 0 in order of first appearance; only the partition they induce is
    /// meaningful.
    fn detect<N, E>(&self, graph: &UnGraph<N, E>) -> Result<Vec<usize>>;

    /// Short name used in logs and output headers.
    fn name(&self) -> &'static str;
}
