//! Pipeline configuration.
//!
//! Every dataset-scale constant (edge ceiling, group size filter) lives here
//! with a default, so nothing in the algorithms is tied to one deployment.
//!
//! ```rust
//! use cograph::config::{PipelineConfig, ProjectionSide};
//!
//! let cfg = PipelineConfig::from_toml_str(
//!     r#"
//!     side = "right"
//!     edge_ceiling = 5000
//!
//!     [walktrap]
//!     steps = 3
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(cfg.side, ProjectionSide::Right);
//! assert_eq!(cfg.edge_ceiling, 5000);
//! assert_eq!(cfg.walktrap.steps, 3);
//! assert!(!cfg.weighted);
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default ceiling on projected edges.
pub const DEFAULT_EDGE_CEILING: u64 = 1_000_000;

/// Which relation column becomes the node set of the projected graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionSide {
    /// Nodes are left ids, linked through shared right ids.
    #[default]
    Left,
    /// Nodes are right ids, linked through shared left ids.
    Right,
}

/// Settings for the leading-eigenvector detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EigenConfig {
    /// Power iterations per split.
    pub max_iter: usize,
    /// Convergence and positivity tolerance.
    pub tolerance: f64,
    /// Stop splitting once this many communities exist.
    pub max_communities: Option<usize>,
    /// Seed for the power-iteration start vector.
    pub seed: u64,
}

impl Default for EigenConfig {
    fn default() -> Self {
        Self {
            max_iter: 10_000,
            tolerance: 1e-10,
            max_communities: None,
            seed: 42,
        }
    }
}

/// Settings for the walktrap detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalktrapConfig {
    /// Random-walk length.
    pub steps: usize,
}

impl Default for WalktrapConfig {
    fn default() -> Self {
        Self { steps: 4 }
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Projection direction.
    pub side: ProjectionSide,
    /// Keep duplicate relation rows instead of dropping them.
    pub keep_duplicates: bool,
    /// Collapse parallel edges into an integer weight.
    pub weighted: bool,
    /// Maximum number of projected edges before the run is refused.
    pub edge_ceiling: u64,
    /// Drop groups with more members than this.
    pub max_group_size: Option<usize>,
    /// Require the simplified graph's minimum degree to be exactly 1.
    pub strict_min_degree: bool,
    /// Leading-eigenvector settings.
    pub eigen: EigenConfig,
    /// Walktrap settings.
    pub walktrap: WalktrapConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            side: ProjectionSide::Left,
            keep_duplicates: false,
            weighted: false,
            edge_ceiling: DEFAULT_EDGE_CEILING,
            max_group_size: None,
            strict_min_degree: true,
            eigen: EigenConfig::default(),
            walktrap: WalktrapConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Set the projection direction.
    pub fn with_side(mut self, side: ProjectionSide) -> Self {
        self.side = side;
        self
    }

    /// Keep duplicate rows (parallel edges then carry multiplicity).
    pub fn with_keep_duplicates(mut self, keep: bool) -> Self {
        self.keep_duplicates = keep;
        self
    }

    /// Record parallel-edge multiplicity as edge weight.
    pub fn with_weighted(mut self, weighted: bool) -> Self {
        self.weighted = weighted;
        self
    }

    /// Set the projected edge ceiling.
    pub fn with_edge_ceiling(mut self, ceiling: u64) -> Self {
        self.edge_ceiling = ceiling;
        self
    }

    /// Set the group size filter.
    pub fn with_max_group_size(mut self, max: Option<usize>) -> Self {
        self.max_group_size = max;
        self
    }

    /// Toggle the min-degree-is-one assertion.
    pub fn with_strict_min_degree(mut self, strict: bool) -> Self {
        self.strict_min_degree = strict;
        self
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.edge_ceiling == 0 {
            return Err(Error::InvalidParameter {
                name: "edge_ceiling",
                message: "must be positive".into(),
            });
        }
        if matches!(self.max_group_size, Some(n) if n < 2) {
            return Err(Error::InvalidParameter {
                name: "max_group_size",
                message: "groups smaller than 2 cannot produce edges".into(),
            });
        }
        if self.walktrap.steps == 0 {
            return Err(Error::InvalidParameter {
                name: "walktrap.steps",
                message: "random walks need at least one step".into(),
            });
        }
        if self.eigen.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "eigen.max_iter",
                message: "must be positive".into(),
            });
        }
        if self.eigen.tolerance.is_nan() || self.eigen.tolerance <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "eigen.tolerance",
                message: "must be a positive number".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.edge_ceiling, 1_000_000);
        assert_eq!(cfg.side, ProjectionSide::Left);
        assert!(!cfg.keep_duplicates);
        assert!(cfg.strict_min_degree);
        assert_eq!(cfg.walktrap.steps, 4);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let cfg = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, PipelineConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(PipelineConfig::from_toml_str("edge_ceiling = 0").is_err());
        assert!(PipelineConfig::from_toml_str("max_group_size = 1").is_err());
        assert!(PipelineConfig::from_toml_str("[walktrap]\nsteps = 0").is_err());
        assert!(matches!(
            PipelineConfig::from_toml_str("side = \"up\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_builder() {
        let cfg = PipelineConfig::new()
            .with_weighted(true)
            .with_edge_ceiling(10)
            .with_max_group_size(Some(20_000));
        assert!(cfg.weighted);
        assert_eq!(cfg.edge_ceiling, 10);
        assert_eq!(cfg.max_group_size, Some(20_000));
    }
}
