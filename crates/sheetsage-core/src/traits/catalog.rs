//! Dataset catalog: which named relations are available.

use std::collections::BTreeSet;

use crate::error::Result;

pub trait DatasetCatalog {
    /// Names of every dataset currently available for loading.
    fn list_datasets(&self) -> Result<BTreeSet<String>>;
}
