//! Walktrap community detection.
//!
//! ## The Algorithm (Pons & Latapy 2005)
//!
//! Short random walks tend to stay inside dense regions. Each community `C`
//! is described by the distribution `Pᵗ_C.` of a `t`-step walk started from a
//! uniformly random node of `C`, and two communities are close when these
//! distributions agree:
//!
//! ```text
//! r²(C₁, C₂) = Σ_k (Pᵗ_C₁k - Pᵗ_C₂k)² / d(k)
//! Δσ(C₁, C₂) = (1/n) · |C₁||C₂| / (|C₁| + |C₂|) · r²(C₁, C₂)
//! ```
//!
//! Starting from singletons, the adjacent pair with the smallest `Δσ` is
//! merged until no adjacent pairs remain. The resulting dendrogram is cut
//! at the step of maximum modularity.
//!
//! Every node gets a self-loop for the walk, as in the reference
//! implementation, so that walks on bipartite-like structure still mix.
//!
//! ## Complexity
//!
//! - Walk vectors are sparse; their support is the `t`-hop neighborhood.
//! - Candidate pairs sit in a binary heap; stale entries (pairs touching an
//!   already merged community) are skipped on pop.
//!
//! Compared with leading-eigenvector bisection, walktrap usually returns more
//! and smaller communities.
//!
//! ## References
//!
//! Pons & Latapy (2005). "Computing communities in large networks using
//! random walks." ISCIS 2005, LNCS 3733.

use super::renumber;
use super::traits::CommunityDetection;
use crate::config::WalktrapConfig;
use crate::error::{Error, Result};
use crate::graph::neighbor_lists;
use petgraph::graph::UnGraph;
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};
use tracing::debug;

/// Walktrap community detection.
#[derive(Debug, Clone)]
pub struct Walktrap {
    /// Random-walk length.
    steps: usize,
}

impl Walktrap {
    /// Create a detector with walk length 4.
    pub fn new() -> Self {
        Self::from_config(&WalktrapConfig::default())
    }

    /// Create a detector from configuration.
    pub fn from_config(cfg: &WalktrapConfig) -> Self {
        Self { steps: cfg.steps }
    }

    /// Set random-walk length.
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }
}

impl Default for Walktrap {
    fn default() -> Self {
        Self::new()
    }
}

/// Sparse probability vector, sorted by node.
type Dist = Vec<(usize, f64)>;

struct Community {
    size: usize,
    walk: Dist,
    /// Adjacent community -> number of edges between them.
    neighbors: BTreeMap<usize, usize>,
    internal_edges: usize,
    degree: usize,
    alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    delta: f64,
    a: usize,
    b: usize,
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.delta
            .total_cmp(&other.delta)
            .then(self.a.cmp(&other.a))
            .then(self.b.cmp(&other.b))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl CommunityDetection for Walktrap {
    fn detect<N, E>(&self, graph: &UnGraph<N, E>) -> Result<Vec<usize>> {
        let n = graph.node_count();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.steps == 0 {
            return Err(Error::InvalidParameter {
                name: "steps",
                message: "random walks need at least one step".into(),
            });
        }

        let adj = neighbor_lists(graph);
        let m: usize = adj.iter().map(Vec::len).sum::<usize>() / 2;
        if m == 0 {
            return Ok((0..n).collect());
        }
        // Walk degree includes the added self-loop.
        let walk_degree: Vec<f64> = adj.iter().map(|a| a.len() as f64 + 1.0).collect();

        let mut comms: Vec<Community> = (0..n)
            .map(|i| Community {
                size: 1,
                walk: self.walk_from(&adj, &walk_degree, i),
                neighbors: adj[i].iter().map(|&j| (j, 1)).collect(),
                internal_edges: 0,
                degree: adj[i].len(),
                alive: true,
            })
            .collect();

        let mut heap = BinaryHeap::new();
        for (i, list) in adj.iter().enumerate() {
            for &j in list.iter().filter(|&&j| j > i) {
                let delta = delta_sigma(&comms[i], &comms[j], &walk_degree, n);
                heap.push(Reverse(Candidate { delta, a: i, b: j }));
            }
        }

        let two_m = 2.0 * m as f64;
        let mut q: f64 = comms
            .iter()
            .map(|c| -(c.degree as f64 / two_m).powi(2))
            .sum();
        let mut best_q = q;
        let mut best_step = 0;
        let mut merges: Vec<(usize, usize)> = Vec::new();

        while let Some(Reverse(Candidate { a, b, .. })) = heap.pop() {
            if !comms[a].alive || !comms[b].alive {
                continue;
            }
            let id = comms.len();
            let merged = merge(&comms, a, b);

            let between = merged.internal_edges - comms[a].internal_edges - comms[b].internal_edges;
            q += between as f64 / m as f64
                - 2.0 * (comms[a].degree as f64 / two_m) * (comms[b].degree as f64 / two_m);

            for (&nb, &count) in &merged.neighbors {
                let entry = &mut comms[nb].neighbors;
                entry.remove(&a);
                entry.remove(&b);
                entry.insert(id, count);
            }
            comms[a].alive = false;
            comms[b].alive = false;
            comms[a].walk = Dist::new();
            comms[b].walk = Dist::new();
            comms.push(merged);

            let neighbors: Vec<usize> = comms[id].neighbors.keys().copied().collect();
            for nb in neighbors {
                let delta = delta_sigma(&comms[id], &comms[nb], &walk_degree, n);
                heap.push(Reverse(Candidate {
                    delta,
                    a: nb.min(id),
                    b: nb.max(id),
                }));
            }

            merges.push((a, b));
            if q > best_q + 1e-12 {
                best_q = q;
                best_step = merges.len();
            }
        }
        debug!(
            merges = merges.len(),
            best_step,
            modularity = best_q,
            "walktrap dendrogram cut"
        );

        // Replay the first `best_step` merges.
        let mut parent: Vec<usize> = (0..n + best_step).collect();
        for (s, &(a, b)) in merges.iter().take(best_step).enumerate() {
            parent[a] = n + s;
            parent[b] = n + s;
        }
        let labels: Vec<usize> = (0..n)
            .map(|mut c| {
                while parent[c] != c {
                    c = parent[c];
                }
                c
            })
            .collect();
        Ok(renumber(&labels))
    }

    fn name(&self) -> &'static str {
        "walktrap"
    }
}

impl Walktrap {
    /// `t`-step walk distribution from `start`.
    fn walk_from(&self, adj: &[Vec<usize>], walk_degree: &[f64], start: usize) -> Dist {
        let mut current: Dist = vec![(start, 1.0)];
        for _ in 0..self.steps {
            let mut next: BTreeMap<usize, f64> = BTreeMap::new();
            for &(u, p) in &current {
                let share = p / walk_degree[u];
                *next.entry(u).or_insert(0.0) += share;
                for &v in &adj[u] {
                    *next.entry(v).or_insert(0.0) += share;
                }
            }
            current = next.into_iter().collect();
        }
        current
    }
}

/// Union of communities `a` and `b`.
fn merge(comms: &[Community], a: usize, b: usize) -> Community {
    let (ca, cb) = (&comms[a], &comms[b]);
    let size = ca.size + cb.size;
    let wa = ca.size as f64 / size as f64;
    let wb = cb.size as f64 / size as f64;
    let walk = combine(&ca.walk, wa, &cb.walk, wb);

    let between = ca.neighbors.get(&b).copied().unwrap_or(0);
    let mut neighbors = ca.neighbors.clone();
    for (&nb, &count) in &cb.neighbors {
        *neighbors.entry(nb).or_insert(0) += count;
    }
    neighbors.remove(&a);
    neighbors.remove(&b);

    Community {
        size,
        walk,
        neighbors,
        internal_edges: ca.internal_edges + cb.internal_edges + between,
        degree: ca.degree + cb.degree,
        alive: true,
    }
}

/// `wa·x + wb·y` over sorted sparse vectors.
fn combine(x: &Dist, wa: f64, y: &Dist, wb: f64) -> Dist {
    let mut out = Vec::with_capacity(x.len().max(y.len()));
    let (mut i, mut j) = (0, 0);
    while i < x.len() || j < y.len() {
        match (x.get(i), y.get(j)) {
            (Some(&(ki, vi)), Some(&(kj, vj))) if ki == kj => {
                out.push((ki, wa * vi + wb * vj));
                i += 1;
                j += 1;
            }
            (Some(&(ki, vi)), Some(&(kj, _))) if ki < kj => {
                out.push((ki, wa * vi));
                i += 1;
            }
            (Some(&(ki, vi)), None) => {
                out.push((ki, wa * vi));
                i += 1;
            }
            (_, Some(&(kj, vj))) => {
                out.push((kj, wb * vj));
                j += 1;
            }
            (None, None) => break,
        }
    }
    out
}

/// `Σ_k (x_k - y_k)² / d(k)` over sorted sparse vectors.
fn walk_distance(x: &Dist, y: &Dist, walk_degree: &[f64]) -> f64 {
    let diff = combine(x, 1.0, y, -1.0);
    diff.iter().map(|&(k, v)| v * v / walk_degree[k]).sum()
}

fn delta_sigma(c1: &Community, c2: &Community, walk_degree: &[f64], n: usize) -> f64 {
    let (s1, s2) = (c1.size as f64, c2.size as f64);
    s1 * s2 / (s1 + s2) * walk_distance(&c1.walk, &c2.walk, walk_degree) / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::community::{modularity, same_partition};

    #[test]
    fn test_walktrap_two_cliques() {
        let g = UnGraph::<(), ()>::from_edges([
            (0, 1),
            (1, 2),
            (0, 2),
            (3, 4),
            (4, 5),
            (3, 5),
            (2, 3),
        ]);
        let labels = Walktrap::new().detect(&g).unwrap();
        assert!(same_partition(&labels, &[0, 0, 0, 1, 1, 1]));
    }

    #[test]
    fn test_walktrap_disconnected_cliques() {
        let g = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)]);
        let labels = Walktrap::new().detect(&g).unwrap();
        assert!(same_partition(&labels, &[0, 0, 0, 1, 1, 1]));
    }

    #[test]
    fn test_walktrap_cut_is_modularity_maximal() {
        let g = UnGraph::<(), ()>::from_edges([
            (0, 1),
            (1, 2),
            (0, 2),
            (3, 4),
            (4, 5),
            (3, 5),
            (2, 3),
        ]);
        let labels = Walktrap::new().detect(&g).unwrap();
        let q = modularity(&g, &labels).unwrap();
        assert!(q >= modularity(&g, &[0; 6]).unwrap());
        assert!(q >= modularity(&g, &[0, 1, 2, 3, 4, 5]).unwrap());
    }

    #[test]
    fn test_walktrap_isolated_nodes() {
        let mut g = UnGraph::<(), ()>::from_edges([(0, 1)]);
        g.add_node(());
        let labels = Walktrap::new().detect(&g).unwrap();
        assert_eq!(labels.len(), 3);
        assert_eq!(labels[0], labels[1]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn test_walktrap_single_node() {
        let mut g = UnGraph::<(), ()>::new_undirected();
        g.add_node(());
        assert_eq!(Walktrap::new().detect(&g).unwrap(), vec![0]);
    }

    #[test]
    fn test_walktrap_empty_graph() {
        let g = UnGraph::<(), ()>::new_undirected();
        assert!(Walktrap::new().detect(&g).is_err());
    }

    #[test]
    fn test_walk_is_a_distribution() {
        let adj = vec![vec![1, 2], vec![0], vec![0]];
        let wd: Vec<f64> = adj.iter().map(|a| a.len() as f64 + 1.0).collect();
        for steps in 1..5 {
            let walk = Walktrap::new().with_steps(steps).walk_from(&adj, &wd, 1);
            let total: f64 = walk.iter().map(|&(_, p)| p).sum();
            assert!((total - 1.0).abs() < 1e-12);
            assert!(walk.windows(2).all(|w| w[0].0 < w[1].0));
        }
    }

    #[test]
    fn test_combine_merges_supports() {
        let x = vec![(0, 0.5), (2, 0.5)];
        let y = vec![(1, 1.0), (2, 1.0)];
        let z = combine(&x, 1.0, &y, -1.0);
        assert_eq!(z, vec![(0, 0.5), (1, -1.0), (2, -0.5)]);
    }
}
