//! CSV reader.

use sheetsage_core::error::{Result, SageError};
use sheetsage_core::types::{Relation, Value};
use std::path::Path;

use crate::headers::normalize_headers;

/// Read a CSV file with a header row. Cell types are inferred per cell;
/// rows shorter than the header are padded with nulls.
pub fn read_csv(path: &Path) -> Result<Relation> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| SageError::Ingest(format!("Failed to open {}: {e}", path.display())))?;

    let headers = reader
        .headers()
        .map_err(|e| SageError::Ingest(format!("Failed to read CSV header: {e}")))?
        .clone();
    let headers = normalize_headers(headers.iter());
    let width = headers.len();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| SageError::Ingest(format!("CSV record {}: {e}", idx + 1)))?;
        if record.len() > width {
            return Err(SageError::Ingest(format!(
                "CSV record {} has {} fields, header has {}",
                idx + 1,
                record.len(),
                width
            )));
        }
        let mut row: Vec<Value> = record.iter().map(Value::infer).collect();
        row.resize(width, Value::Null);
        rows.push(row);
    }

    Relation::from_rows(headers, rows)
}
