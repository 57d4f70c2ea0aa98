//! Pre-flight cost estimate for the projection.

use crate::error::{Error, Result};
use crate::relation::FrequencyEntry;
use tracing::info;

/// Number of unordered pairs in a group of `f` members: C(f, 2).
///
/// Groups of size 0 or 1 contribute nothing.
pub fn pair_count(f: usize) -> u64 {
    if f < 2 {
        return 0;
    }
    let f = f as u128;
    let pairs = f * (f - 1) / 2;
    u64::try_from(pairs).unwrap_or(u64::MAX)
}

/// Exact number of projected edges, `Σ C(count_i, 2)`.
pub fn total_edges(frequencies: &[FrequencyEntry]) -> u64 {
    frequencies
        .iter()
        .fold(0u64, |acc, e| acc.saturating_add(pair_count(e.count)))
}

/// Admission control for the pairwise generator.
#[derive(Debug, Clone, Copy)]
pub struct CardinalityGuard {
    ceiling: u64,
}

impl CardinalityGuard {
    /// Guard with the given edge ceiling.
    pub fn new(ceiling: u64) -> Self {
        Self { ceiling }
    }

    /// Configured ceiling.
    pub fn ceiling(&self) -> u64 {
        self.ceiling
    }

    /// Compute the exact edge total and refuse it if above the ceiling.
    ///
    /// Returns the total, which the generator must later reproduce exactly.
    pub fn admit(&self, frequencies: &[FrequencyEntry]) -> Result<u64> {
        let total = total_edges(frequencies);
        if total > self.ceiling {
            return Err(Error::CapacityExceeded {
                total,
                ceiling: self.ceiling,
            });
        }
        info!(total, ceiling = self.ceiling, "projection admitted");
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freq(counts: &[usize]) -> Vec<FrequencyEntry> {
        counts
            .iter()
            .enumerate()
            .map(|(i, &count)| FrequencyEntry {
                key: format!("g{i}"),
                count,
            })
            .collect()
    }

    #[test]
    fn test_pair_count() {
        assert_eq!(pair_count(0), 0);
        assert_eq!(pair_count(1), 0);
        assert_eq!(pair_count(2), 1);
        assert_eq!(pair_count(3), 3);
        assert_eq!(pair_count(10), 45);
        assert_eq!(pair_count(100_000), 4_999_950_000);
    }

    #[test]
    fn test_total() {
        assert_eq!(total_edges(&freq(&[2, 3, 10, 1, 0])), 1 + 3 + 45);
        assert_eq!(total_edges(&[]), 0);
    }

    #[test]
    fn test_ceiling_is_inclusive() {
        let guard = CardinalityGuard::new(4);
        assert_eq!(guard.admit(&freq(&[2, 3])).unwrap(), 4);
    }

    #[test]
    fn test_capacity_exceeded_reports_total() {
        let guard = CardinalityGuard::new(1_000_000);
        // C(1500, 2) = 1_124_250
        let err = guard.admit(&freq(&[1500, 2])).unwrap_err();
        match err {
            Error::CapacityExceeded { total, ceiling } => {
                assert_eq!(total, 1_124_251);
                assert_eq!(ceiling, 1_000_000);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
