//! Spreadsheet reader (xlsx / xls / ods) backed by calamine.

use calamine::{Data, DataType, Reader, open_workbook_auto};
use sheetsage_core::error::{Result, SageError};
use sheetsage_core::types::{Relation, Value};
use std::path::Path;

use crate::headers::normalize_headers;

/// Read one worksheet (the first when `sheet` is `None`) into a relation.
pub fn read_sheet(path: &Path, sheet: Option<&str>) -> Result<Relation> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| SageError::Ingest(format!("Failed to open spreadsheet: {e}")))?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(SageError::Ingest(format!(
                    "sheet '{name}' not found (available: {})",
                    sheet_names.join(", ")
                )));
            }
            name.to_string()
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| SageError::Ingest("workbook has no sheets".into()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| SageError::Ingest(format!("Failed to read sheet '{sheet_name}': {e}")))?;

    tracing::debug!("Reading sheet '{}' from {}", sheet_name, path.display());

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Relation::default());
    };
    let headers = normalize_headers(header_row.iter().map(header_text));
    let width = headers.len();

    let body: Vec<Vec<Value>> = rows
        .map(|row| {
            let mut values: Vec<Value> = row.iter().take(width).map(cell_value).collect();
            values.resize(width, Value::Null);
            values
        })
        .collect();

    Relation::from_rows(headers, body)
}

/// Header cells are names; whole numbers drop their trailing `.0`.
fn header_text(cell: &Data) -> String {
    match cell {
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            format!("{}", *f as i64)
        }
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Convert a calamine cell into a relation value.
///
/// Spreadsheets store every number as a float, so whole floats are narrowed
/// to integers. Booleans become 1/0, matching how the store persists them.
/// Date-formatted cells become ISO 8601 text instead of their serial number.
pub(crate) fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::Int(i) => Value::Integer(*i),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                Value::Integer(*f as i64)
            } else {
                Value::Real(*f)
            }
        }
        Data::Bool(b) => Value::Integer(i64::from(*b)),
        Data::String(s) => {
            if s.is_empty() {
                Value::Null
            } else {
                Value::Text(s.clone())
            }
        }
        Data::DateTime(_) => match cell.as_datetime() {
            Some(ts) => Value::Text(ts.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => Value::Text(cell.to_string()),
        },
        Data::Error(e) => {
            tracing::debug!("Spreadsheet cell error {e:?} read as null");
            Value::Null
        }
        other => Value::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_conversion() {
        assert_eq!(cell_value(&Data::Empty), Value::Null);
        assert_eq!(cell_value(&Data::Int(7)), Value::Integer(7));
        assert_eq!(cell_value(&Data::Float(30.0)), Value::Integer(30));
        assert_eq!(cell_value(&Data::Float(2.5)), Value::Real(2.5));
        assert_eq!(cell_value(&Data::Bool(true)), Value::Integer(1));
        assert_eq!(cell_value(&Data::Bool(false)), Value::Integer(0));
        assert_eq!(cell_value(&Data::String("Ana".into())), Value::from("Ana"));
        assert_eq!(cell_value(&Data::String(String::new())), Value::Null);
        assert_eq!(
            cell_value(&Data::DateTimeIso("2024-03-01T10:00:00".into())),
            Value::from("2024-03-01T10:00:00")
        );
    }

    #[test]
    fn test_header_text() {
        assert_eq!(header_text(&Data::String("Name".into())), "Name");
        assert_eq!(header_text(&Data::Float(2024.0)), "2024");
        assert_eq!(header_text(&Data::Empty), "");
    }

    fn fixture() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/people.xlsx")
    }

    #[test]
    fn test_first_sheet_by_default() {
        let rel = read_sheet(&fixture(), None).unwrap();
        assert_eq!(rel.column_names().collect::<Vec<_>>(), vec!["Name", "Age", "Joined"]);
        assert_eq!(rel.row_count(), 2);
        assert_eq!(
            rel.row(0).unwrap(),
            vec![&Value::from("Ana"), &Value::Integer(30), &Value::from("2024-03-01T12:00:00")]
        );
        // Leo has no Joined cell
        assert_eq!(
            rel.row(1).unwrap(),
            vec![&Value::from("Leo"), &Value::Integer(25), &Value::Null]
        );
    }

    #[test]
    fn test_named_sheet() {
        let rel = read_sheet(&fixture(), Some("Scores")).unwrap();
        assert_eq!(rel.column_names().collect::<Vec<_>>(), vec!["Team", "Score"]);
        assert_eq!(rel.row(0).unwrap(), vec![&Value::from("Red"), &Value::Real(2.5)]);
    }

    #[test]
    fn test_unknown_sheet() {
        let err = read_sheet(&fixture(), Some("Budget")).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, SageError::Ingest(_)));
        assert!(msg.contains("Budget"));
        assert!(msg.contains("People, Scores"));
    }

    #[test]
    fn test_not_a_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"definitely not a zip archive").unwrap();
        let err = read_sheet(&path, None).unwrap_err();
        assert!(matches!(err, SageError::Ingest(_)));
    }
}
