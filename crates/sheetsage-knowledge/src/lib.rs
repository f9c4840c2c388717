//! # SheetSage Knowledge
//!
//! Everything derived from a stored relation before a question is asked.
//!
//! ## How it works
//! ```text
//! Relation ["Name", "Age"] / [["Ana", 30], ["Leo", 25]]
//!   ├── schema::extract_schema     → {has_name, has_age}   (datatype properties of Table)
//!   │     └── dictionary::build    → {"name": [], "age": []}
//!   └── chunker::chunk_relation    → ["Ana", 30, "Leo", 25] (row-major, whole table)
//! ```
//! There is no retrieval ranking: the chunk sequence always covers every cell,
//! so prompt size grows linearly with the dataset.

pub mod chunker;
pub mod dictionary;
pub mod schema;

pub use chunker::{ContextChunks, chunk_relation};
pub use dictionary::{KnowledgeDictionary, build_dictionary};
pub use schema::{SemanticProperty, SemanticSchema, extract_schema, normalize_column_name};
