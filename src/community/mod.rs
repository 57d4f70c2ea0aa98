//! Community detection on the projected graph.
//!
//! Two independent partitioners run on the same simplified graph:
//!
//! | Algorithm | Objective | Deterministic | Typical output |
//! |-----------|-----------|---------------|----------------|
//! | [`LeadingEigenvector`] | modularity, by spectral bisection | yes (seeded) | few, larger communities |
//! | [`Walktrap`] | random-walk distance, cut at max modularity | yes | more, smaller communities |
//!
//! ## The Modularity Objective
//!
//! ```text
//! Q = (1/2m) × Σ[A_ij - (k_i × k_j)/(2m)] × δ(c_i, c_j)
//! ```
//!
//! A good partition has Q > 0: more internal edges than a random graph with
//! the same degree sequence would have. The leading-eigenvector modularity is
//! the one reported as the graph's overall modularity.
//!
//! ## Labels
//!
//! Labels are consecutive from 0 in order of first appearance over node
//! index. They are opaque: compare partitions with [`same_partition`] or
//! [`nmi`], never label magnitudes across algorithms or runs.
//!
//! ## Usage
//!
//! ```rust
//! use petgraph::graph::UnGraph;
//! use cograph::community::{CommunityDetection, LeadingEigenvector, Walktrap};
//!
//! let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)]);
//!
//! let (eigen, q) = LeadingEigenvector::new().detect_with_modularity(&graph).unwrap();
//! let walk = Walktrap::new().detect(&graph).unwrap();
//! assert!(q > 0.3);
//! assert_eq!(eigen[0], eigen[1]);
//! assert_eq!(walk.len(), 6);
//! ```
//!
//! ## References
//!
//! - Newman (2006). "Finding community structure in networks using the
//!   eigenvectors of matrices."
//! - Pons & Latapy (2005). "Computing communities in large networks using
//!   random walks."
//! - Newman & Girvan (2004). "Finding and evaluating community structure in networks."

mod compare;
mod eigen;
mod modularity;
mod traits;
mod walktrap;

pub use compare::{ari, nmi, same_partition};
pub use eigen::LeadingEigenvector;
pub use modularity::modularity;
pub use traits::CommunityDetection;
pub use walktrap::Walktrap;

use std::collections::HashMap;

/// Renumber labels to 0.. in order of first appearance.
pub(crate) fn renumber(labels: &[usize]) -> Vec<usize> {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    labels
        .iter()
        .map(|&l| {
            let next = mapping.len();
            *mapping.entry(l).or_insert(next)
        })
        .collect()
}

/// Number of distinct labels.
pub fn community_count(labels: &[usize]) -> usize {
    let mut unique = labels.to_vec();
    unique.sort_unstable();
    unique.dedup();
    unique.len()
}
