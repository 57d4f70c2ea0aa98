//! Tabular input.

use super::{Relation, RelationRow};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

impl Relation {
    /// Read a headed CSV, taking the two id columns by name.
    ///
    /// Extra columns are ignored. Fields are trimmed.
    pub fn from_csv_reader<R: Read>(reader: R, left_col: &str, right_col: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };
        let li = position(left_col)?;
        let ri = position(right_col)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let left = record.get(li).unwrap_or_default();
            let right = record.get(ri).unwrap_or_default();
            rows.push(RelationRow::new(left, right));
        }
        Ok(Relation::new(rows))
    }

    /// Load a relation from a CSV file.
    pub fn load_csv(path: impl AsRef<Path>, left_col: &str, right_col: &str) -> Result<Self> {
        let path = path.as_ref();
        let relation = Self::from_csv_reader(File::open(path)?, left_col, right_col)?;
        info!(path = %path.display(), rows = relation.len(), "loaded relation");
        Ok(relation)
    }
}

/// Check a materialized relation against the row count its source declared.
pub fn validate_row_count(declared: usize, relation: &Relation) -> Result<()> {
    if declared != relation.len() {
        return Err(Error::RowCountMismatch {
            declared,
            actual: relation.len(),
        });
    }
    Ok(())
}
