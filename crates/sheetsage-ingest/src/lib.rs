//! # SheetSage Ingest
//!
//! Turns a file on disk into a [`Relation`]:
//! - **Spreadsheets** (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) via calamine
//! - **CSV** via the `csv` crate
//!
//! The first row is always the header. Header cleanup (blank and duplicate
//! names) is shared by both readers so a dataset gets the same column names
//! regardless of its source format.

pub mod delimited;
pub mod headers;
pub mod spreadsheet;

use sheetsage_core::error::{Result, SageError};
use sheetsage_core::types::Relation;
use std::path::Path;

/// Source formats understood by [`load_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Spreadsheet,
    Csv,
}

impl TableFormat {
    /// Detect the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Spreadsheet),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Ingestion options.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Worksheet to read; the first sheet when unset. Ignored for CSV.
    pub sheet: Option<String>,
}

/// Parse a tabular file into a relation.
pub fn load_table(path: &Path, options: &IngestOptions) -> Result<Relation> {
    let format = TableFormat::from_path(path).ok_or_else(|| {
        SageError::Ingest(format!(
            "unsupported file type: {} (expected .xlsx, .xls, .ods or .csv)",
            path.display()
        ))
    })?;

    let relation = match format {
        TableFormat::Spreadsheet => spreadsheet::read_sheet(path, options.sheet.as_deref())?,
        TableFormat::Csv => delimited::read_csv(path)?,
    };

    tracing::info!(
        "📥 Ingested {} ({} rows × {} columns)",
        path.display(),
        relation.row_count(),
        relation.column_count()
    );
    Ok(relation)
}
