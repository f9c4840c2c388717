//! Context chunking: flatten a whole relation into grounding values.

use serde::Serialize;
use sheetsage_core::types::{Relation, Value};

/// Row-major sequence of every cell in a relation, nulls as the text `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ContextChunks(Vec<Value>);

impl ContextChunks {
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The context representation placed in the prompt: a JSON array,
    /// e.g. `["Ana",30,"Leo",25]`.
    pub fn render(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }
}

impl From<Vec<Value>> for ContextChunks {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

/// Flatten every cell of `relation`, row by row. No filtering, sampling or
/// truncation: the output always has `rows × columns` entries.
pub fn chunk_relation(relation: &Relation) -> ContextChunks {
    let chunks: Vec<Value> = relation
        .cells_row_major()
        .map(|v| match v {
            Value::Null => Value::Text("null".to_string()),
            other => other.clone(),
        })
        .collect();
    tracing::debug!("Chunked relation into {} context values", chunks.len());
    ContextChunks(chunks)
}
