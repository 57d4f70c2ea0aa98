//! # cograph
//!
//! Co-occurrence graphs from bipartite relations: project "A associates with B"
//! records onto one side, then describe the resulting graph with whole-graph
//! statistics and two independent community partitions.
//!
//! The pipeline is a single batch pass over an in-memory snapshot. Its one
//! quadratic step (pair generation) is admitted only after an exact pre-flight
//! count, so oversized projections are refused up front.
//!
//! See [`pipeline`] for the stage-by-stage flow.

pub mod attributes;
pub mod community;
pub mod config;
/// Error types used across `cograph`.
pub mod error;
pub mod export;
pub mod graph;
pub mod pipeline;
pub mod projection;
pub mod relation;
pub mod stats;

#[cfg(test)]
mod pipeline_tests;

pub use attributes::NodeRecord;
pub use community::{CommunityDetection, LeadingEigenvector, Walktrap};
pub use config::{PipelineConfig, ProjectionSide};
pub use error::{Error, Result};
pub use graph::CoGraph;
pub use pipeline::{Pipeline, PipelineReport, STATISTICS};
pub use projection::{CardinalityGuard, ProjectedEdge};
pub use relation::{Relation, RelationRow};
pub use stats::{GraphStats, StatsTable};
