//! # SheetSage Core
//!
//! Shared building blocks for the SheetSage workspace:
//! - **types**: tabular relations, cell values, completion messages
//! - **error**: the `SageError` taxonomy used by every crate
//! - **config**: TOML configuration, passed explicitly to constructors
//! - **traits**: seams for the completion provider and the dataset catalog

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::SageConfig;
pub use error::{Result, SageError};
pub use types::{Column, Relation, Value};
