//! Knowledge dictionary: bare property names mapped to (empty) value lists.
//!
//! The lists are reserved for values associated with each property; nothing
//! in the pipeline fills them yet, and the answer prompt does not read them.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::schema::{PROPERTY_PREFIX, SemanticSchema};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KnowledgeDictionary {
    entries: BTreeMap<String, Vec<String>>,
}

impl KnowledgeDictionary {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Strip the generated `has_` prefix (once, only at the start) from a
/// property id. A column that itself contains `has_` keeps it.
pub fn bare_name(property_id: &str) -> &str {
    property_id.strip_prefix(PROPERTY_PREFIX).unwrap_or(property_id)
}

/// Build the dictionary from a schema. Duplicate bare names keep the last entry.
pub fn build_dictionary(schema: &SemanticSchema) -> KnowledgeDictionary {
    let mut entries = BTreeMap::new();
    for id in schema.ids() {
        entries.insert(bare_name(id).to_string(), Vec::new());
    }
    KnowledgeDictionary { entries }
}
