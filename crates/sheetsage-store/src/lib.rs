//! # SheetSage Store
//!
//! Durable storage for tabular relations.
//!
//! ## Layout
//! ```text
//! <data_dir>/
//!   ├── .catalog.db      datasets(name, table_name, row_count, column_count, ...)
//!   ├── sales.db         table "sales"
//!   └── people.db        table "people"
//! ```
//! Each dataset lives in its own SQLite file. Saving replaces the table
//! wholesale inside one transaction; the catalog answers "which datasets
//! exist" without scanning the directory.

pub mod catalog;
pub mod relation_store;
pub mod sql;

pub use catalog::{Catalog, DatasetInfo};
pub use relation_store::{RelationStore, StoreConnection, validate_identifier};
