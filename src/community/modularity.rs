//! Newman-Girvan modularity of a partition.

use crate::error::{Error, Result};
use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Modularity of `labels` on an unweighted graph.
///
/// ```text
/// Q = Σ_c [ L_c / m - (D_c / 2m)² ]
/// ```
///
/// with `L_c` the edges inside community `c` and `D_c` its total degree.
/// A graph without edges has modularity 0.
pub fn modularity<N, E>(graph: &UnGraph<N, E>, labels: &[usize]) -> Result<f64> {
    let n = graph.node_count();
    if labels.len() != n {
        return Err(Error::DimensionMismatch {
            expected: n,
            found: labels.len(),
        });
    }
    let m = graph.edge_count() as f64;
    if m == 0.0 {
        return Ok(0.0);
    }

    // community -> (internal edges, degree sum)
    let mut per_comm: HashMap<usize, (f64, f64)> = HashMap::new();
    for e in graph.edge_references() {
        let ci = labels[e.source().index()];
        let cj = labels[e.target().index()];
        per_comm.entry(ci).or_default().1 += 1.0;
        per_comm.entry(cj).or_default().1 += 1.0;
        if ci == cj {
            per_comm.entry(ci).or_default().0 += 1.0;
        }
    }

    let two_m = 2.0 * m;
    Ok(per_comm
        .values()
        .map(|&(internal, degree)| internal / m - (degree / two_m).powi(2))
        .sum())
}
