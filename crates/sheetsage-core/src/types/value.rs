//! Scalar cell values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single cell of a tabular relation.
///
/// Serializes untagged, so a row-major sequence of values renders as a plain
/// JSON array: `["Ana", 30, null, 2.5]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Infer a typed value from raw text: empty → null, then integer, then
    /// finite real, otherwise text.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Integer(i);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Value::Real(f),
            _ => Value::Text(raw.to_string()),
        }
    }

    /// Short type label, shown under each column by `sheetsage show`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Real(f)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer() {
        assert_eq!(Value::infer(""), Value::Null);
        assert_eq!(Value::infer("   "), Value::Null);
        assert_eq!(Value::infer("30"), Value::Integer(30));
        assert_eq!(Value::infer("-7"), Value::Integer(-7));
        assert_eq!(Value::infer("2.5"), Value::Real(2.5));
        assert_eq!(Value::infer("Ana"), Value::Text("Ana".into()));
        // Non-finite floats stay textual
        assert_eq!(Value::infer("inf"), Value::Text("inf".into()));
        assert_eq!(Value::infer("NaN"), Value::Text("NaN".into()));
    }

    #[test]
    fn test_untagged_json() {
        let row = vec![
            Value::from("Ana"),
            Value::from(30i64),
            Value::Null,
            Value::from(2.5),
        ];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"["Ana",30,null,2.5]"#);

        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn test_type_name() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Integer(1).type_name(), "integer");
        assert_eq!(Value::Real(0.5).type_name(), "real");
        assert_eq!(Value::from("x").type_name(), "text");
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Integer(25).to_string(), "25");
        assert_eq!(Value::Text("Leo".into()).to_string(), "Leo");
    }
}
