use thiserror::Error;

/// Result alias for `cograph`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the projection pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Declared and materialized input row counts differ.
    #[error("row count mismatch: source declared {declared} rows, loaded {actual}")]
    RowCountMismatch {
        /// Row count the source claims to hold.
        declared: usize,
        /// Rows actually read.
        actual: usize,
    },

    /// Projected edge count is above the configured ceiling.
    #[error("projection would generate {total} edges, above the ceiling of {ceiling}")]
    CapacityExceeded {
        /// Exact number of edges the projection would produce.
        total: u64,
        /// Configured ceiling.
        ceiling: u64,
    },

    /// Generated edge count disagrees with the pre-flight total.
    #[error("internal error: expected {expected} projected edges, generated {generated}")]
    EdgeCountMismatch {
        /// Total computed by the cardinality guard.
        expected: u64,
        /// Edges actually generated.
        generated: u64,
    },

    /// Minimum degree of the simplified graph is not 1.
    #[error("internal error: minimum node degree is {found}, expected 1")]
    MinDegreeViolation {
        /// Minimum degree observed.
        found: usize,
    },

    /// Attribute fragments do not share the canonical node set.
    #[error("internal error: `{fragment}` has {found} keys, {matched} of {expected} nodes matched")]
    JoinMismatch {
        /// Name of the offending fragment.
        fragment: &'static str,
        /// Number of canonical nodes.
        expected: usize,
        /// Number of keys in the fragment.
        found: usize,
        /// Canonical nodes present in the fragment.
        matched: usize,
    },

    /// Input was empty.
    #[error("empty input provided")]
    EmptyInput,

    /// Length mismatch between a per-node vector and the graph.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Found length.
        found: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: String,
    },

    /// Missing column in a tabular source.
    #[error("column '{0}' not found in input header")]
    MissingColumn(String),

    /// Filesystem failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// CSV read/write failure.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// JSON serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Malformed configuration file.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    /// True for "must never happen" consistency failures, as opposed to
    /// bad input or bad configuration.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Error::EdgeCountMismatch { .. }
                | Error::MinDegreeViolation { .. }
                | Error::JoinMismatch { .. }
        )
    }
}
