//! Relation store: one SQLite file per dataset, replace-on-save semantics.

use rusqlite::Connection;
use sheetsage_core::config::StoreConfig;
use sheetsage_core::error::{Result, SageError};
use sheetsage_core::traits::DatasetCatalog;
use sheetsage_core::types::{Column, Relation};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::catalog::{Catalog, DatasetInfo};
use crate::sql::{column_affinity, from_sql, quote_ident, to_sql};

const CATALOG_FILE: &str = ".catalog.db";
const MAX_IDENTIFIER_LEN: usize = 128;

/// Check that a dataset or table name is safe to use as a file name and a
/// table name.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(SageError::InvalidInput("dataset name is empty".into()));
    }
    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(SageError::InvalidInput(format!(
            "dataset name longer than {MAX_IDENTIFIER_LEN} bytes"
        )));
    }
    if name.starts_with('.') || name.contains(['/', '\\', '\0']) {
        return Err(SageError::InvalidInput(format!(
            "dataset name '{name}' may not start with '.' or contain path separators"
        )));
    }
    if name.to_ascii_lowercase().starts_with("sqlite_") {
        return Err(SageError::InvalidInput(format!(
            "dataset name '{name}' uses the reserved 'sqlite_' prefix"
        )));
    }
    Ok(())
}

/// A name for the implicit rowid that no user column shadows.
fn rowid_alias(columns: &[String]) -> Option<&'static str> {
    ["rowid", "_rowid_", "oid"]
        .into_iter()
        .find(|alias| !columns.iter().any(|c| c.eq_ignore_ascii_case(alias)))
}

/// An open connection to one dataset's store file.
pub struct StoreConnection {
    identifier: String,
    path: PathBuf,
    conn: Connection,
}

impl StoreConnection {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn table_exists(&self, name: &str) -> Result<bool> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                rusqlite::params![name],
                |r| r.get::<_, i64>(0),
            )
            .map(|n| n > 0)
            .map_err(|e| SageError::Persistence(format!("{}: {e}", self.identifier)))
    }
}

/// Durable, named store for tabular relations plus the dataset catalog.
pub struct RelationStore {
    data_dir: PathBuf,
    catalog: Mutex<Catalog>,
}

impl RelationStore {
    /// Open the store rooted at the configured data directory, creating it if needed.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        Self::open_at(&config.resolved_data_dir())
    }

    pub fn open_at(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir).map_err(|e| {
            SageError::StoreUnavailable(format!("create {}: {e}", data_dir.display()))
        })?;
        let catalog = Catalog::open(&data_dir.join(CATALOG_FILE))?;
        tracing::debug!("Relation store opened at {}", data_dir.display());
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            catalog: Mutex::new(catalog),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn store_path(&self, identifier: &str) -> PathBuf {
        self.data_dir.join(format!("{identifier}.db"))
    }

    fn catalog(&self) -> Result<std::sync::MutexGuard<'_, Catalog>> {
        self.catalog
            .lock()
            .map_err(|e| SageError::Persistence(format!("catalog lock poisoned: {e}")))
    }

    /// Open or create the durable store named `identifier`.
    pub fn connect(&self, identifier: &str) -> Result<StoreConnection> {
        validate_identifier(identifier)?;
        let path = self.store_path(identifier);
        let conn = Connection::open(&path).map_err(|e| {
            SageError::StoreUnavailable(format!("open {}: {e}", path.display()))
        })?;
        // Opening is lazy in SQLite; touch the header so a corrupt file fails here.
        conn.query_row("PRAGMA schema_version", [], |r| r.get::<_, i64>(0))
            .map_err(|e| SageError::StoreUnavailable(format!("{}: {e}", path.display())))?;

        Ok(StoreConnection {
            identifier: identifier.to_string(),
            path,
            conn,
        })
    }

    /// Persist `relation` as table `name`, replacing any previous table of
    /// that name. Column order and values are preserved exactly.
    pub fn save(&self, conn: &StoreConnection, relation: &Relation, name: &str) -> Result<()> {
        validate_identifier(name)?;
        if relation.column_count() == 0 {
            return Err(SageError::Persistence(format!(
                "cannot save '{name}': relation has no columns"
            )));
        }

        let table = quote_ident(name);
        let column_defs: Vec<String> = relation
            .columns()
            .iter()
            .map(|c| {
                let affinity = column_affinity(&c.values);
                if affinity.is_empty() {
                    quote_ident(&c.name)
                } else {
                    format!("{} {affinity}", quote_ident(&c.name))
                }
            })
            .collect();
        let column_list: Vec<String> =
            relation.column_names().map(quote_ident).collect();
        let placeholders: Vec<String> =
            (1..=relation.column_count()).map(|i| format!("?{i}")).collect();

        let persist = |e: rusqlite::Error| SageError::Persistence(format!("save '{name}': {e}"));

        let tx = conn.conn.unchecked_transaction().map_err(persist)?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table}; CREATE TABLE {table} ({});",
            column_defs.join(", ")
        ))
        .map_err(persist)?;
        {
            let mut stmt = tx
                .prepare(&format!(
                    "INSERT INTO {table} ({}) VALUES ({})",
                    column_list.join(", "),
                    placeholders.join(", ")
                ))
                .map_err(persist)?;
            for row in relation.rows() {
                let params: Vec<_> = row.into_iter().map(to_sql).collect();
                stmt.execute(rusqlite::params_from_iter(params.iter()))
                    .map_err(persist)?;
            }
        }
        tx.commit().map_err(persist)?;

        self.catalog()?.record(
            conn.identifier(),
            name,
            relation.row_count(),
            relation.column_count(),
        )?;

        tracing::info!(
            "💾 Saved '{}' to {} ({} rows × {} columns)",
            name,
            conn.path().display(),
            relation.row_count(),
            relation.column_count()
        );
        Ok(())
    }

    /// Read back the full relation stored as table `name`, in insertion order.
    pub fn load(&self, conn: &StoreConnection, name: &str) -> Result<Relation> {
        validate_identifier(name)?;
        if !conn.table_exists(name)? {
            return Err(SageError::NotFound(format!(
                "no relation '{name}' in store '{}'",
                conn.identifier()
            )));
        }

        let read = |e: rusqlite::Error| SageError::Persistence(format!("load '{name}': {e}"));

        let table = quote_ident(name);
        let column_names: Vec<String> = conn
            .conn
            .prepare(&format!("SELECT * FROM {table} LIMIT 0"))
            .map_err(read)?
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let query = match rowid_alias(&column_names) {
            Some(rowid) => format!("SELECT * FROM {table} ORDER BY {rowid}"),
            // A full scan of a rowid table already yields rowid order.
            None => format!("SELECT * FROM {table}"),
        };

        let mut stmt = conn.conn.prepare(&query).map_err(read)?;
        let mut columns: Vec<Column> = stmt
            .column_names()
            .into_iter()
            .map(|n| Column::new(n, Vec::new()))
            .collect();

        let mut rows = stmt.query([]).map_err(read)?;
        while let Some(row) = rows.next().map_err(read)? {
            for (idx, col) in columns.iter_mut().enumerate() {
                col.values.push(from_sql(row.get_ref(idx).map_err(read)?));
            }
        }

        let relation = Relation::new(columns)
            .map_err(|e| SageError::Persistence(format!("load '{name}': {e}")))?;
        tracing::debug!(
            "Loaded '{}' ({} rows × {} columns)",
            name,
            relation.row_count(),
            relation.column_count()
        );
        Ok(relation)
    }

    /// Connect to the dataset `name` and save `relation` as its table.
    pub fn ingest(&self, name: &str, relation: &Relation) -> Result<()> {
        let conn = self.connect(name)?;
        self.save(&conn, relation, name)
    }

    /// Load a dataset by name. The table name comes from the catalog, falling
    /// back to the dataset name.
    pub fn load_dataset(&self, name: &str) -> Result<Relation> {
        validate_identifier(name)?;
        if !self.store_path(name).exists() {
            return Err(SageError::NotFound(format!("dataset '{name}' does not exist")));
        }
        let table = self
            .catalog()?
            .get(name)?
            .map(|info| info.table_name)
            .unwrap_or_else(|| name.to_string());
        let conn = self.connect(name)?;
        self.load(&conn, &table)
    }

    /// Catalog details for every dataset whose store file is still on disk.
    pub fn describe_datasets(&self) -> Result<Vec<DatasetInfo>> {
        let entries = self.catalog()?.list()?;
        Ok(entries
            .into_iter()
            .filter(|info| self.store_path(&info.name).exists())
            .collect())
    }

    pub fn describe_dataset(&self, name: &str) -> Result<Option<DatasetInfo>> {
        validate_identifier(name)?;
        if !self.store_path(name).exists() {
            return Ok(None);
        }
        self.catalog()?.get(name)
    }
}

impl DatasetCatalog for RelationStore {
    fn list_datasets(&self) -> Result<BTreeSet<String>> {
        Ok(self
            .describe_datasets()?
            .into_iter()
            .map(|info| info.name)
            .collect())
    }
}
