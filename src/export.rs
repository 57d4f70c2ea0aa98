//! Artifact writers.
//!
//! | File | Content |
//! |------|---------|
//! | `edges.csv` | `group_key,node_a,node_b`, before simplification |
//! | `graph.json` | simplified graph (nodes + weighted edges) |
//! | `gephi_edges.csv` | `Source,Target`, for visualization tools |
//! | `stats.csv` | `statistic,value` |
//! | `nodes.csv` | `id,degree,community_eigen,community_walktrap[,metadata...]` |

use crate::attributes::NodeRecord;
use crate::error::Result;
use crate::graph::CoGraph;
use crate::pipeline::PipelineReport;
use crate::projection::ProjectedEdge;
use crate::stats::StatsTable;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Write the raw projected edge list.
pub fn write_edge_list<W: Write>(writer: W, edges: &[ProjectedEdge]) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    for edge in edges {
        w.serialize(edge)?;
    }
    w.flush()?;
    Ok(())
}

/// Write the simplified graph as JSON.
pub fn write_graph_json<W: Write>(writer: W, graph: &CoGraph) -> Result<()> {
    serde_json::to_writer_pretty(writer, &graph.snapshot())?;
    Ok(())
}

/// Write the two-column edge table read by Gephi and similar tools.
pub fn write_visualization_edges<W: Write>(writer: W, graph: &CoGraph) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(["Source", "Target"])?;
    for (a, b, _) in graph.edges() {
        w.write_record([a, b])?;
    }
    w.flush()?;
    Ok(())
}

/// Write the statistics table.
pub fn write_stats<W: Write>(writer: W, table: &StatsTable) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(["statistic", "value"])?;
    for (name, value) in table.iter() {
        let value = value.to_string();
        w.write_record([name, value.as_str()])?;
    }
    w.flush()?;
    Ok(())
}

/// Write node records; metadata fields become extra columns, sorted by name.
pub fn write_nodes<W: Write>(writer: W, records: &[NodeRecord]) -> Result<()> {
    let extra: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.metadata.keys().map(String::as_str))
        .collect();

    let mut w = csv::Writer::from_writer(writer);
    let mut header = vec!["id", "degree", "community_eigen", "community_walktrap"];
    header.extend(extra.iter().copied());
    w.write_record(&header)?;

    for r in records {
        let mut row = vec![
            r.id.clone(),
            r.degree.to_string(),
            r.community_eigen.to_string(),
            r.community_walktrap.to_string(),
        ];
        row.extend(
            extra
                .iter()
                .map(|k| r.metadata.get(*k).cloned().unwrap_or_default()),
        );
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}

/// Write every artifact of a run into `dir`, creating it if needed.
pub fn write_all(dir: impl AsRef<Path>, report: &PipelineReport) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    write_edge_list(File::create(dir.join("edges.csv"))?, &report.edges)?;
    write_graph_json(File::create(dir.join("graph.json"))?, &report.graph)?;
    write_visualization_edges(File::create(dir.join("gephi_edges.csv"))?, &report.graph)?;
    write_stats(File::create(dir.join("stats.csv"))?, &report.table)?;
    write_nodes(File::create(dir.join("nodes.csv"))?, &report.nodes)?;
    info!(dir = %dir.display(), "wrote artifacts");
    Ok(())
}
