//! Dataset catalog: SQLite registry of ingested datasets.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use sheetsage_core::error::{Result, SageError};
use std::path::Path;

/// Catalog row for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetInfo {
    pub name: String,
    pub table_name: String,
    pub row_count: u64,
    pub column_count: u64,
    pub created_at: String,
    pub updated_at: String,
}

pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    /// Open or create the catalog database.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .map_err(|e| SageError::StoreUnavailable(format!("catalog open: {e}")))?;
        let catalog = Self { conn };
        catalog.migrate()?;
        Ok(catalog)
    }

    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS datasets (
                    name TEXT PRIMARY KEY,
                    table_name TEXT NOT NULL,
                    row_count INTEGER NOT NULL DEFAULT 0,
                    column_count INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );",
            )
            .map_err(|e| SageError::StoreUnavailable(format!("catalog migration: {e}")))
    }

    /// Record (or refresh) a dataset after a successful save.
    pub fn record(&self, name: &str, table_name: &str, rows: usize, columns: usize) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO datasets (name, table_name, row_count, column_count, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                 ON CONFLICT(name) DO UPDATE SET
                    table_name = excluded.table_name,
                    row_count = excluded.row_count,
                    column_count = excluded.column_count,
                    updated_at = excluded.updated_at",
                rusqlite::params![name, table_name, rows as i64, columns as i64, now],
            )
            .map_err(|e| SageError::Persistence(format!("catalog record '{name}': {e}")))?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Option<DatasetInfo>> {
        self.conn
            .query_row(
                "SELECT name, table_name, row_count, column_count, created_at, updated_at
                 FROM datasets WHERE name = ?1",
                rusqlite::params![name],
                row_to_info,
            )
            .optional()
            .map_err(|e| SageError::Persistence(format!("catalog lookup '{name}': {e}")))
    }

    pub fn list(&self) -> Result<Vec<DatasetInfo>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT name, table_name, row_count, column_count, created_at, updated_at
                 FROM datasets ORDER BY name",
            )
            .map_err(|e| SageError::Persistence(format!("catalog list: {e}")))?;
        let rows = stmt
            .query_map([], row_to_info)
            .map_err(|e| SageError::Persistence(format!("catalog list: {e}")))?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| SageError::Persistence(format!("catalog list: {e}")))
    }
}

fn row_to_info(row: &rusqlite::Row<'_>) -> rusqlite::Result<DatasetInfo> {
    Ok(DatasetInfo {
        name: row.get(0)?,
        table_name: row.get(1)?,
        row_count: row.get::<_, i64>(2)? as u64,
        column_count: row.get::<_, i64>(3)? as u64,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::open(&dir.path().join("catalog.db")).unwrap();
        assert!(catalog.list().unwrap().is_empty());

        catalog.record("people", "people", 2, 2).unwrap();
        let info = catalog.get("people").unwrap().unwrap();
        assert_eq!(info.row_count, 2);
        assert_eq!(info.column_count, 2);
        assert_eq!(info.created_at, info.updated_at);
        assert!(catalog.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_record_refreshes_counts() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::open(&dir.path().join("catalog.db")).unwrap();
        catalog.record("sales", "sales", 10, 3).unwrap();
        let first = catalog.get("sales").unwrap().unwrap();

        catalog.record("sales", "sales", 4, 5).unwrap();
        let second = catalog.get("sales").unwrap().unwrap();
        assert_eq!(second.row_count, 4);
        assert_eq!(second.column_count, 5);
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(catalog.list().unwrap().len(), 1);
    }
}
