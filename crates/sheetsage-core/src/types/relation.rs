//! Tabular relations: ordered named columns of equal length.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::value::Value;
use crate::error::{Result, SageError};

/// One named column of cell values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// An ordered sequence of uniquely named, equal-length columns.
///
/// Invariants are checked at construction, so every `Relation` in hand has a
/// constant row count across columns and no two column names equal ignoring
/// ASCII case.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Relation {
    columns: Vec<Column>,
}

impl Relation {
    /// Build a relation from columns, validating the invariants.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::new();
        for col in &columns {
            // SQLite column names are case-insensitive for ASCII letters.
            if !seen.insert(col.name.to_ascii_lowercase()) {
                return Err(SageError::Ingest(format!(
                    "duplicate column name '{}' (names must differ ignoring case)",
                    col.name
                )));
            }
        }
        if let Some(first) = columns.first() {
            let expected = first.values.len();
            if let Some(bad) = columns.iter().find(|c| c.values.len() != expected) {
                return Err(SageError::Ingest(format!(
                    "column '{}' has {} rows, expected {}",
                    bad.name,
                    bad.values.len(),
                    expected
                )));
            }
        }
        Ok(Self { columns })
    }

    /// Build a relation from a header and row-major data.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|h| Column::new(h, Vec::with_capacity(rows.len())))
            .collect();

        for (idx, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(SageError::Ingest(format!(
                    "row {} has {} cells, expected {}",
                    idx,
                    row.len(),
                    columns.len()
                )));
            }
            for (col, value) in columns.iter_mut().zip(row) {
                col.values.push(value);
            }
        }
        Self::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn row(&self, idx: usize) -> Option<Vec<&Value>> {
        if idx >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[idx]).collect())
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.row_count()).map(move |i| self.columns.iter().map(|c| &c.values[i]).collect())
    }

    /// Every cell, row by row, left to right.
    pub fn cells_row_major(&self) -> impl Iterator<Item = &Value> + '_ {
        (0..self.row_count())
            .flat_map(move |i| self.columns.iter().map(move |c| &c.values[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Relation {
        Relation::from_rows(
            vec!["Name".into(), "Age".into()],
            vec![
                vec!["Ana".into(), 30i64.into()],
                vec!["Leo".into(), 25i64.into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_from_rows_shape() {
        let rel = people();
        assert_eq!(rel.column_count(), 2);
        assert_eq!(rel.row_count(), 2);
        assert_eq!(rel.column_names().collect::<Vec<_>>(), vec!["Name", "Age"]);
        assert_eq!(rel.row(1).unwrap(), vec![&Value::from("Leo"), &Value::Integer(25)]);
        assert!(rel.row(2).is_none());
    }

    #[test]
    fn test_row_major_cells() {
        let cells: Vec<_> = people().cells_row_major().cloned().collect();
        assert_eq!(
            cells,
            vec![
                Value::from("Ana"),
                Value::Integer(30),
                Value::from("Leo"),
                Value::Integer(25)
            ]
        );
    }

    #[test]
    fn test_rejects_duplicate_columns() {
        let err = Relation::new(vec![
            Column::new("a", vec![]),
            Column::new("a", vec![]),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate column"));
    }

    #[test]
    fn test_rejects_columns_differing_only_in_case() {
        let err = Relation::from_rows(vec!["Name".into(), "name".into()], vec![]).unwrap_err();
        assert!(matches!(err, SageError::Ingest(_)));
        assert!(err.to_string().contains("'name'"));

        assert!(Relation::from_rows(vec!["Name".into(), "name.1".into()], vec![]).is_ok());
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let err = Relation::new(vec![
            Column::new("a", vec![Value::Null]),
            Column::new("b", vec![]),
        ])
        .unwrap_err();
        assert!(matches!(err, SageError::Ingest(_)));

        let err = Relation::from_rows(vec!["a".into()], vec![vec![Value::Null, Value::Null]])
            .unwrap_err();
        assert!(err.to_string().contains("row 0"));
    }

    #[test]
    fn test_empty_relation() {
        let rel = Relation::from_rows(vec!["only".into()], vec![]).unwrap();
        assert!(rel.is_empty());
        assert_eq!(rel.cells_row_major().count(), 0);
        assert_eq!(Relation::default().row_count(), 0);
    }
}
