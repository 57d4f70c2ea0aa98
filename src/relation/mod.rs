//! The bipartite input relation.
//!
//! A relation is a multiset of `(left, right)` associations, e.g.
//! dataset ↔ contributor. Projection onto the left side links two left ids
//! whenever they share a right id; [`Relation::transpose`] flips the roles.
//!
//! ## Stages
//!
//! 1. **Load**: [`Relation::from_csv_reader`] picks two columns by header name,
//!    and [`validate_row_count`] checks the result against the source's own count.
//! 2. **Deduplicate**: [`deduplicate`] collapses repeated rows, warning with the count.
//! 3. **Group & filter**: [`group_by_right`] keeps only right ids seen in at least
//!    two rows, since a right id with one partner cannot bridge two left ids.

mod filter;
mod load;

pub use filter::{
    deduplicate, frequencies, group_by_right, Dedup, FilteredGroups, FrequencyEntry, RetainedGroup,
};
pub use load::validate_row_count;

use serde::{Deserialize, Serialize};

/// One observed association.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RelationRow {
    /// Identifier on the projected side.
    pub left: String,
    /// Identifier on the bridging side.
    pub right: String,
}

impl RelationRow {
    /// Create a row.
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

/// An in-memory snapshot of the relation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relation {
    rows: Vec<RelationRow>,
}

impl Relation {
    /// Wrap a list of rows.
    pub fn new(rows: Vec<RelationRow>) -> Self {
        Self { rows }
    }

    /// Build from `(left, right)` pairs.
    pub fn from_pairs<L, R>(pairs: impl IntoIterator<Item = (L, R)>) -> Self
    where
        L: Into<String>,
        R: Into<String>,
    {
        Self {
            rows: pairs
                .into_iter()
                .map(|(l, r)| RelationRow::new(l, r))
                .collect(),
        }
    }

    /// Number of rows (duplicates included).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in storage order.
    pub fn rows(&self) -> &[RelationRow] {
        &self.rows
    }

    /// Keep only rows the predicate accepts.
    ///
    /// This is the hook for caller-side eligibility rules (e.g. restricting
    /// to a subset of source archives).
    pub fn retain<F>(mut self, mut keep: F) -> Self
    where
        F: FnMut(&RelationRow) -> bool,
    {
        self.rows.retain(|row| keep(row));
        self
    }

    /// Swap the columns, so projection runs onto the right side instead.
    pub fn transpose(&self) -> Self {
        Self {
            rows: self
                .rows
                .iter()
                .map(|r| RelationRow::new(r.right.clone(), r.left.clone()))
                .collect(),
        }
    }
}

impl FromIterator<RelationRow> for Relation {
    fn from_iter<I: IntoIterator<Item = RelationRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
