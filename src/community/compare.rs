//! Partition comparison.
//!
//! Community labels are arbitrary identifiers: two runs (or two algorithms)
//! may number the same grouping differently. Everything here compares the
//! partitions the labels induce, never the label values themselves.
//!
//! | Function | Range | Meaning |
//! |----------|-------|---------|
//! | [`same_partition`] | bool | identical groupings up to relabeling |
//! | [`nmi`] | [0, 1] | normalized mutual information |
//! | [`ari`] | [-1, 1] | adjusted Rand index |
//!
//! # References
//!
//! - Hubert & Arabie (1985). "Comparing partitions" (ARI)
//! - Strehl & Ghosh (2002). "Cluster ensembles" (NMI)

use std::collections::HashMap;

/// True when `a` and `b` group the same items together.
///
/// ```rust
/// use cograph::community::same_partition;
///
/// assert!(same_partition(&[0, 0, 1], &[5, 5, 2]));
/// assert!(!same_partition(&[0, 0, 1], &[0, 1, 1]));
/// ```
pub fn same_partition(a: &[usize], b: &[usize]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut forward: HashMap<usize, usize> = HashMap::new();
    let mut backward: HashMap<usize, usize> = HashMap::new();
    for (&x, &y) in a.iter().zip(b) {
        if *forward.entry(x).or_insert(y) != y || *backward.entry(y).or_insert(x) != x {
            return false;
        }
    }
    true
}

/// Normalized Mutual Information between two partitions.
///
/// ```text
/// NMI(U, V) = 2 * I(U; V) / (H(U) + H(V))
/// ```
///
/// Returns 1 when both partitions are a single group, 0 on length mismatch.
pub fn nmi(a: &[usize], b: &[usize]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let n = a.len() as f64;
    let joint = contingency(a, b);
    let pa = counts(a);
    let pb = counts(b);

    let h_a = entropy(pa.values().copied(), n);
    let h_b = entropy(pb.values().copied(), n);

    let mut mi = 0.0;
    for (&(x, y), &count) in &joint {
        let p_joint = count as f64 / n;
        let p_x = pa[&x] as f64 / n;
        let p_y = pb[&y] as f64 / n;
        mi += p_joint * (p_joint / (p_x * p_y)).ln();
    }

    let denom = h_a + h_b;
    if denom > 0.0 {
        2.0 * mi / denom
    } else {
        1.0
    }
}

/// Adjusted Rand Index between two partitions.
pub fn ari(a: &[usize], b: &[usize]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let joint = contingency(a, b);
    let sum_ij: f64 = joint.values().map(|&c| comb2(c)).sum();
    let sum_a: f64 = counts(a).values().map(|&c| comb2(c)).sum();
    let sum_b: f64 = counts(b).values().map(|&c| comb2(c)).sum();
    let total = comb2(a.len());
    if total == 0.0 {
        return 1.0;
    }

    let expected = sum_a * sum_b / total;
    let max_index = (sum_a + sum_b) / 2.0;
    let denom = max_index - expected;
    if denom.abs() < 1e-10 {
        return 1.0;
    }
    (sum_ij - expected) / denom
}

fn contingency(a: &[usize], b: &[usize]) -> HashMap<(usize, usize), usize> {
    let mut table = HashMap::new();
    for (&x, &y) in a.iter().zip(b) {
        *table.entry((x, y)).or_insert(0) += 1;
    }
    table
}

fn counts(labels: &[usize]) -> HashMap<usize, usize> {
    let mut out = HashMap::new();
    for &l in labels {
        *out.entry(l).or_insert(0) += 1;
    }
    out
}

fn entropy(counts: impl Iterator<Item = usize>, n: f64) -> f64 {
    counts
        .map(|c| {
            let p = c as f64 / n;
            if p > 0.0 {
                -p * p.ln()
            } else {
                0.0
            }
        })
        .sum()
}

fn comb2(n: usize) -> f64 {
    if n < 2 {
        0.0
    } else {
        (n * (n - 1) / 2) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nmi_permuted() {
        let a = [0, 0, 1, 1, 2, 2];
        let b = [2, 2, 0, 0, 1, 1];
        assert!((nmi(&a, &b) - 1.0).abs() < 1e-10);
        assert!(same_partition(&a, &b));
    }

    #[test]
    fn test_nmi_independent() {
        let a = [0, 1, 0, 1];
        let b = [0, 0, 1, 1];
        assert!(nmi(&a, &b) < 1e-10);
    }

    #[test]
    fn test_ari() {
        assert!((ari(&[0, 0, 1, 1], &[1, 1, 0, 0]) - 1.0).abs() < 1e-10);
        assert!(ari(&[0, 0, 1, 1], &[0, 1, 0, 1]) < 0.0);
    }

    #[test]
    fn test_same_partition_rejects_merge_and_split() {
        assert!(!same_partition(&[0, 1, 2], &[0, 0, 1]));
        assert!(!same_partition(&[0, 0, 1], &[0, 1, 2]));
        assert!(!same_partition(&[0], &[0, 0]));
    }
}
