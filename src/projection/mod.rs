//! Projection of retained groups onto pairwise edges.
//!
//! Every group of `f` members sharing a bridging id yields all C(f, 2)
//! unordered member pairs. The total is computed analytically first
//! ([`CardinalityGuard`]); generation only starts if that total is under the
//! ceiling, and must reproduce it exactly.
//!
//! ```rust
//! use cograph::projection::project;
//! use cograph::relation::{group_by_right, Relation};
//!
//! let rel = Relation::from_pairs([("d1", "u1"), ("d2", "u1"), ("d3", "u1")]);
//! let groups = group_by_right(&rel, None);
//! let edges = project(&groups.groups, 1_000).unwrap();
//! assert_eq!(edges.len(), 3);
//! ```

mod guard;
mod pairs;

pub use guard::{pair_count, total_edges, CardinalityGuard};
pub use pairs::{combinations, generate_checked, generate_edges, Combinations};

use crate::error::Result;
use crate::relation::{FrequencyEntry, RetainedGroup};
use serde::{Deserialize, Serialize};

/// One projected link, tagged with the bridging id that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectedEdge {
    /// Bridging id.
    pub group_key: String,
    /// First endpoint.
    pub node_a: String,
    /// Second endpoint.
    pub node_b: String,
}

impl ProjectedEdge {
    /// Create an edge.
    pub fn new(group_key: &str, node_a: &str, node_b: &str) -> Self {
        Self {
            group_key: group_key.to_string(),
            node_a: node_a.to_string(),
            node_b: node_b.to_string(),
        }
    }
}

/// Guard, generate and cross-check in one call.
pub fn project(groups: &[RetainedGroup], ceiling: u64) -> Result<Vec<ProjectedEdge>> {
    let freq: Vec<_> = groups
        .iter()
        .map(|g| FrequencyEntry {
            key: g.key.clone(),
            count: g.count(),
        })
        .collect();
    let expected = CardinalityGuard::new(ceiling).admit(&freq)?;
    generate_checked(groups, expected)
}
