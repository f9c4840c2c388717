//! Trait seams between components.

pub mod catalog;
pub mod provider;

pub use catalog::DatasetCatalog;
pub use provider::CompletionProvider;
