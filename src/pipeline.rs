//! End-to-end run: relation in, analytics artifact out.
//!
//! ```text
//! Relation ─► deduplicate ─► group & filter ─► cardinality guard
//!          ─► pairwise edges ─► simplified graph ─┬─► statistics
//!                                                 └─► communities (eigen, walktrap)
//!          ─► attribute join ─► PipelineReport
//! ```
//!
//! Each stage consumes its predecessor's output and returns a new value;
//! nothing is mutated across stages. The run either completes or stops at
//! the first error. The cardinality guard runs before any edge is generated.
//!
//! ```rust
//! use cograph::{Pipeline, PipelineConfig, Relation};
//!
//! let rel = Relation::from_pairs([
//!     ("d1", "u1"), ("d1", "u2"), ("d2", "u2"), ("d2", "u3"), ("d3", "u3"),
//! ]);
//! let report = Pipeline::new(PipelineConfig::default()).unwrap().run(&rel).unwrap();
//! assert_eq!(report.stats.node_count, 3);
//! assert_eq!(report.stats.diameter, 2);
//! assert_eq!(report.table.get("density"), Some(0.6667));
//! ```

use crate::attributes::{attach_metadata, join_attributes, keyed, NodeRecord};
use crate::community::{community_count, nmi, CommunityDetection, LeadingEigenvector, Walktrap};
use crate::config::{PipelineConfig, ProjectionSide};
use crate::error::{Error, Result};
use crate::graph::CoGraph;
use crate::projection::{generate_checked, CardinalityGuard, ProjectedEdge};
use crate::relation::{deduplicate, group_by_right, FrequencyEntry, Relation};
use crate::stats::{round_to, GraphStats, StatsTable};
use std::collections::{BTreeMap, HashMap};
use tracing::info;

/// Names of the whole-graph statistics, in table order.
pub const STATISTICS: [&str; 16] = [
    "relation_rows",
    "retained_groups",
    "projected_edges",
    "node_count",
    "edge_count",
    "degree_median",
    "degree_mean",
    "degree_max",
    "degree_one_count",
    "density",
    "average_path_length",
    "diameter",
    "component_count",
    "modularity",
    "eigen_communities",
    "walktrap_communities",
];

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Rows received.
    pub input_rows: usize,
    /// Duplicate rows found (dropped unless keep-duplicates mode).
    pub duplicates: usize,
    /// Rows after the duplicate policy.
    pub relation_rows: usize,
    /// Bridging ids that survived filtering, with their frequency.
    pub frequencies: Vec<FrequencyEntry>,
    /// Projected edges before simplification.
    pub edges: Vec<ProjectedEdge>,
    /// Simplified graph.
    pub graph: CoGraph,
    /// Full-precision statistics.
    pub stats: GraphStats,
    /// Modularity of the leading-eigenvector partition, full precision.
    pub modularity: f64,
    /// Leading-eigenvector labels by node index.
    pub eigen: Vec<usize>,
    /// Walktrap labels by node index.
    pub walktrap: Vec<usize>,
    /// Agreement between the two partitions.
    pub partition_nmi: f64,
    /// The statistics table, rounded for storage.
    pub table: StatsTable,
    /// One record per graph node.
    pub nodes: Vec<NodeRecord>,
}

impl PipelineReport {
    /// Left-join external reference metadata onto the node records.
    pub fn with_metadata(mut self, metadata: &HashMap<String, BTreeMap<String, String>>) -> Self {
        self.nodes = attach_metadata(self.nodes, metadata);
        self
    }
}

/// Configured pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Validate the configuration and build a pipeline.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage on `relation`.
    pub fn run(&self, relation: &Relation) -> Result<PipelineReport> {
        let cfg = &self.config;
        let input_rows = relation.len();
        info!(rows = input_rows, side = ?cfg.side, "starting projection");

        let oriented = match cfg.side {
            ProjectionSide::Left => relation.clone(),
            ProjectionSide::Right => relation.transpose(),
        };
        let dedup = deduplicate(&oriented, cfg.keep_duplicates);
        let relation_rows = dedup.relation.len();

        let filtered = group_by_right(&dedup.relation, cfg.max_group_size);
        let frequencies = filtered.frequencies();
        info!(
            retained = filtered.groups.len(),
            singletons = filtered.singletons,
            oversized = filtered.oversized,
            "filtered bridging ids"
        );

        let expected = CardinalityGuard::new(cfg.edge_ceiling).admit(&frequencies)?;
        let edges = generate_checked(&filtered.groups, expected)?;

        let graph = CoGraph::assemble(&edges, cfg.weighted);
        let stats = GraphStats::compute(graph.graph())?;
        info!(
            nodes = stats.node_count,
            edges = stats.edge_count,
            components = stats.component_count,
            "assembled graph"
        );
        self.check_min_degree(&stats)?;

        let (eigen, modularity) =
            LeadingEigenvector::from_config(&cfg.eigen).detect_with_modularity(graph.graph())?;
        let walktrap = Walktrap::from_config(&cfg.walktrap).detect(graph.graph())?;
        let partition_nmi = nmi(&eigen, &walktrap);
        info!(
            eigen = community_count(&eigen),
            walktrap = community_count(&walktrap),
            modularity,
            partition_nmi,
            "detected communities"
        );

        let node_ids = graph.node_ids();
        let nodes = join_attributes(
            &node_ids,
            &keyed(&graph, &graph.degrees())?,
            &keyed(&graph, &eigen)?,
            &keyed(&graph, &walktrap)?,
        )?;

        let mut table = StatsTable::new();
        table.insert("relation_rows", relation_rows as f64);
        table.insert("retained_groups", frequencies.len() as f64);
        table.insert("projected_edges", edges.len() as f64);
        stats.write_into(&mut table);
        table.insert("modularity", round_to(modularity, 4));
        table.insert("eigen_communities", community_count(&eigen) as f64);
        table.insert("walktrap_communities", community_count(&walktrap) as f64);

        Ok(PipelineReport {
            input_rows,
            duplicates: dedup.duplicates,
            relation_rows,
            frequencies,
            edges,
            graph,
            stats,
            modularity,
            eigen,
            walktrap,
            partition_nmi,
            table,
            nodes,
        })
    }

    /// Projection never creates isolated nodes; strict mode also requires a
    /// degree-one node.
    fn check_min_degree(&self, stats: &GraphStats) -> Result<()> {
        let found = stats.degree_min;
        if found == 0 || (self.config.strict_min_degree && found != 1) {
            return Err(Error::MinDegreeViolation { found });
        }
        Ok(())
    }
}
