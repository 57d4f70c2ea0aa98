//! Deduplication, frequency counting and group filtering.

use super::{Relation, RelationRow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Result of [`Relation::dedup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dedup {
    /// Distinct rows, sorted.
    pub relation: Relation,
    /// How many rows were dropped.
    pub duplicates: usize,
}

impl Relation {
    /// Collapse repeated rows into one.
    ///
    /// Output rows are sorted, so deduplicating twice yields the same relation.
    pub fn dedup(&self) -> Dedup {
        let mut rows: Vec<RelationRow> = self.rows.clone();
        rows.sort_unstable();
        rows.dedup();
        let duplicates = self.rows.len() - rows.len();
        Dedup {
            relation: Relation::new(rows),
            duplicates,
        }
    }
}

/// Apply the duplicate policy, warning when duplicates are present.
///
/// With `keep_duplicates` the relation is returned as is (its repeated rows
/// later become parallel edges), but the count is still reported.
pub fn deduplicate(relation: &Relation, keep_duplicates: bool) -> Dedup {
    let dedup = relation.dedup();
    if dedup.duplicates == 0 {
        return dedup;
    }
    if keep_duplicates {
        warn!(duplicates = dedup.duplicates, "keeping duplicate relation rows");
        Dedup {
            relation: relation.clone(),
            duplicates: dedup.duplicates,
        }
    } else {
        warn!(duplicates = dedup.duplicates, "dropping duplicate relation rows");
        dedup
    }
}

/// Row count of one bridging id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    /// Bridging id.
    pub key: String,
    /// Number of rows it appears in.
    pub count: usize,
}

/// Count rows per right id, sorted by key.
pub fn frequencies(relation: &Relation) -> Vec<FrequencyEntry> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in relation.rows() {
        *counts.entry(row.right.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(key, count)| FrequencyEntry {
            key: key.to_string(),
            count,
        })
        .collect()
}

/// A bridging id shared by at least two rows, with the left ids it links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetainedGroup {
    /// Bridging id.
    pub key: String,
    /// Left ids, in relation order.
    pub members: Vec<String>,
}

impl RetainedGroup {
    /// Group frequency.
    pub fn count(&self) -> usize {
        self.members.len()
    }
}

/// Output of [`group_by_right`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredGroups {
    /// Groups with at least two members, sorted by key.
    pub groups: Vec<RetainedGroup>,
    /// Right ids dropped for appearing only once.
    pub singletons: usize,
    /// Right ids dropped by the size filter.
    pub oversized: usize,
}

impl FilteredGroups {
    /// Frequency mapping of the retained groups.
    pub fn frequencies(&self) -> Vec<FrequencyEntry> {
        self.groups
            .iter()
            .map(|g| FrequencyEntry {
                key: g.key.clone(),
                count: g.count(),
            })
            .collect()
    }

    /// Rows that survived filtering.
    pub fn retained_rows(&self) -> usize {
        self.groups.iter().map(RetainedGroup::count).sum()
    }
}

/// Group rows by right id and keep groups of frequency two or more.
///
/// Groups above `max_group_size` are dropped too, with a warning.
pub fn group_by_right(relation: &Relation, max_group_size: Option<usize>) -> FilteredGroups {
    let mut by_key: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for row in relation.rows() {
        by_key
            .entry(row.right.as_str())
            .or_default()
            .push(row.left.clone());
    }

    let mut out = FilteredGroups::default();
    for (key, members) in by_key {
        if members.len() < 2 {
            out.singletons += 1;
            continue;
        }
        if let Some(max) = max_group_size {
            if members.len() > max {
                warn!(key, size = members.len(), max, "dropping oversized group");
                out.oversized += 1;
                continue;
            }
        }
        out.groups.push(RetainedGroup {
            key: key.to_string(),
            members,
        });
    }
    debug!(
        retained = out.groups.len(),
        singletons = out.singletons,
        oversized = out.oversized,
        "filtered groups"
    );
    out
}
