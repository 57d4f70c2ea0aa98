//! Per-node attribute records.
//!
//! Degree and the two community labels are computed independently, each
//! keyed by node id. They are merged with a strict inner join: every
//! fragment must cover exactly the graph's node set, otherwise some stage
//! upstream lost or invented a node and the join fails instead of silently
//! dropping rows.

use crate::error::{Error, Result};
use crate::graph::CoGraph;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Merged attributes of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Entity id.
    pub id: String,
    /// Degree in the simplified graph.
    pub degree: usize,
    /// Leading-eigenvector community.
    pub community_eigen: usize,
    /// Walktrap community.
    pub community_walktrap: usize,
    /// External reference fields (name, identifiers, ...), possibly empty.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// Key a per-node-index vector by node id.
pub fn keyed<T: Copy>(graph: &CoGraph, values: &[T]) -> Result<HashMap<String, T>> {
    if values.len() != graph.node_count() {
        return Err(Error::DimensionMismatch {
            expected: graph.node_count(),
            found: values.len(),
        });
    }
    Ok(graph
        .node_ids()
        .into_iter()
        .zip(values)
        .map(|(id, &v)| (id.to_string(), v))
        .collect())
}

fn check_fragment<T>(
    fragment: &'static str,
    node_ids: &[&str],
    values: &HashMap<String, T>,
) -> Result<()> {
    let matched = node_ids.iter().filter(|id| values.contains_key(**id)).count();
    if matched != node_ids.len() || values.len() != node_ids.len() {
        return Err(Error::JoinMismatch {
            fragment,
            expected: node_ids.len(),
            found: values.len(),
            matched,
        });
    }
    Ok(())
}

/// Inner-join the three fragments on node id, in `node_ids` order.
pub fn join_attributes(
    node_ids: &[&str],
    degrees: &HashMap<String, usize>,
    eigen: &HashMap<String, usize>,
    walktrap: &HashMap<String, usize>,
) -> Result<Vec<NodeRecord>> {
    check_fragment("degree", node_ids, degrees)?;
    check_fragment("community_eigen", node_ids, eigen)?;
    check_fragment("community_walktrap", node_ids, walktrap)?;

    Ok(node_ids
        .iter()
        .map(|&id| NodeRecord {
            id: id.to_string(),
            degree: degrees[id],
            community_eigen: eigen[id],
            community_walktrap: walktrap[id],
            metadata: BTreeMap::new(),
        })
        .collect())
}

/// Left-join external reference metadata. Nodes without an entry keep an
/// empty map.
pub fn attach_metadata(
    records: Vec<NodeRecord>,
    metadata: &HashMap<String, BTreeMap<String, String>>,
) -> Vec<NodeRecord> {
    records
        .into_iter()
        .map(|mut r| {
            if let Some(fields) = metadata.get(&r.id) {
                r.metadata.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
            r
        })
        .collect()
}

/// Load a reference table: one row per entity, `key_col` holds the id and
/// every other column becomes a metadata field.
pub fn read_metadata_csv<R: std::io::Read>(
    reader: R,
    key_col: &str,
) -> Result<HashMap<String, BTreeMap<String, String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let key = headers
        .iter()
        .position(|h| h == key_col)
        .ok_or_else(|| Error::MissingColumn(key_col.to_string()))?;

    let mut out = HashMap::new();
    for record in reader.records() {
        let record = record?;
        let id = record.get(key).unwrap_or_default().to_string();
        let fields = headers
            .iter()
            .zip(record.iter())
            .enumerate()
            .filter(|&(i, _)| i != key)
            .map(|(_, (h, v))| (h.to_string(), v.to_string()))
            .collect();
        out.insert(id, fields);
    }
    Ok(out)
}
