//! SQL helpers: identifier quoting, column typing, value conversion.

use rusqlite::types::{Value as SqlValue, ValueRef};
use sheetsage_core::types::Value;

/// Quote an identifier for SQLite (`"` doubled inside).
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Declared type for a column, inferred from its values.
///
/// Homogeneous columns get `INTEGER`, `REAL` or `TEXT`. Mixed or all-null
/// columns get no declared type, so SQLite stores each value exactly as
/// given instead of coercing it to the column affinity.
pub fn column_affinity(values: &[Value]) -> &'static str {
    let mut kind: Option<&'static str> = None;
    for value in values {
        let this = match value {
            Value::Null => continue,
            Value::Integer(_) => "INTEGER",
            Value::Real(_) => "REAL",
            Value::Text(_) => "TEXT",
        };
        match kind {
            None => kind = Some(this),
            Some(k) if k == this => {}
            Some(_) => return "",
        }
    }
    kind.unwrap_or("")
}

pub fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Real(r) => SqlValue::Real(*r),
        Value::Text(s) => SqlValue::Text(s.clone()),
    }
}

pub fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(t) | ValueRef::Blob(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("sales"), "\"sales\"");
        assert_eq!(quote_ident("my \"table\""), "\"my \"\"table\"\"\"");
        assert_eq!(quote_ident("x; DROP TABLE y"), "\"x; DROP TABLE y\"");
    }

    #[test]
    fn test_column_affinity() {
        assert_eq!(column_affinity(&[Value::Integer(1), Value::Null]), "INTEGER");
        assert_eq!(column_affinity(&[Value::Real(1.5)]), "REAL");
        assert_eq!(column_affinity(&["a".into(), "b".into()]), "TEXT");
        assert_eq!(column_affinity(&[Value::Integer(1), Value::Real(1.5)]), "");
        assert_eq!(column_affinity(&[Value::Integer(1), "1".into()]), "");
        assert_eq!(column_affinity(&[Value::Null, Value::Null]), "");
        assert_eq!(column_affinity(&[]), "");
    }

    #[test]
    fn test_value_conversion() {
        assert_eq!(from_sql(ValueRef::Integer(30)), Value::Integer(30));
        assert_eq!(from_sql(ValueRef::Text(b"Ana")), Value::from("Ana"));
        assert_eq!(from_sql(ValueRef::Null), Value::Null);
        assert_eq!(to_sql(&Value::Real(2.5)), SqlValue::Real(2.5));
    }
}
