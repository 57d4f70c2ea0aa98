//! Exhaustive pair generation.

use super::ProjectedEdge;
use crate::error::{Error, Result};
use crate::relation::RetainedGroup;
use std::iter::FusedIterator;

/// Lazy iterator over all 2-combinations `(items[j], items[k])`, `j < k`.
///
/// Yields exactly C(n, 2) pairs and allocates nothing.
#[derive(Debug, Clone)]
pub struct Combinations<'a, T> {
    items: &'a [T],
    j: usize,
    k: usize,
}

/// All unordered pairs of `items`.
pub fn combinations<T>(items: &[T]) -> Combinations<'_, T> {
    Combinations { items, j: 0, k: 1 }
}

impl<'a, T> Iterator for Combinations<'a, T> {
    type Item = (&'a T, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.items.len();
        if self.k >= n {
            self.j += 1;
            self.k = self.j + 1;
            if self.k >= n {
                return None;
            }
        }
        let pair = (&self.items[self.j], &self.items[self.k]);
        self.k += 1;
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.items.len();
        if self.j + 1 >= n {
            return (0, Some(0));
        }
        // Remaining in the current row, plus every full row after it.
        let current = n.saturating_sub(self.k);
        let after = n - self.j - 1;
        let rest = after * after.saturating_sub(1) / 2;
        let remaining = current + rest;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Combinations<'_, T> {}
impl<T> FusedIterator for Combinations<'_, T> {}

/// Emit every pair of members for every group, tagged with the group key.
pub fn generate_edges(groups: &[RetainedGroup]) -> Vec<ProjectedEdge> {
    let capacity: usize = groups.iter().map(|g| combinations(&g.members).len()).sum();
    let mut edges = Vec::with_capacity(capacity);
    for group in groups {
        edges.extend(
            combinations(&group.members).map(|(a, b)| ProjectedEdge::new(&group.key, a, b)),
        );
    }
    edges
}

/// [`generate_edges`], then check the output against the guard's total.
pub fn generate_checked(groups: &[RetainedGroup], expected: u64) -> Result<Vec<ProjectedEdge>> {
    let edges = generate_edges(groups);
    let generated = edges.len() as u64;
    if generated != expected {
        return Err(Error::EdgeCountMismatch {
            expected,
            generated,
        });
    }
    Ok(edges)
}
