//! Schema extraction: one string-typed datatype property per column.
//!
//! Each column `Foo Bar` becomes the property `has_foo_bar`, declared as an
//! `owl:DatatypeProperty` with domain `Table` and range `xsd:string`. No
//! cross-column relationships are derived and nothing is inferred.

use regex::Regex;
use serde::Serialize;
use sheetsage_core::types::Relation;
use std::fmt::Write as _;
use std::sync::OnceLock;

/// Prefix put in front of every generated property identifier.
pub const PROPERTY_PREFIX: &str = "has_";

/// The single conceptual entity every property is scoped to.
pub const TABLE_CLASS: &str = "Table";

const OWL_NS: &str = "http://www.w3.org/2002/07/owl#";
const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

static NON_WORD: OnceLock<Regex> = OnceLock::new();

fn non_word() -> &'static Regex {
    NON_WORD.get_or_init(|| Regex::new(r"\W+").expect("static regex"))
}

/// Lower-case a column name and collapse each run of non-word characters to `_`.
pub fn normalize_column_name(name: &str) -> String {
    non_word().replace_all(&name.to_lowercase(), "_").into_owned()
}

/// A per-column descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemanticProperty {
    /// Local identifier, e.g. `has_name`.
    pub id: String,
    /// Full identifier under the schema namespace.
    pub iri: String,
    /// Column the property was derived from.
    pub column: String,
    /// IRI of the owning entity (`<namespace>Table`).
    pub domain: String,
    /// Always `xsd:string`.
    pub range: String,
}

/// Ordered set of semantic properties, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemanticSchema {
    namespace: String,
    properties: Vec<SemanticProperty>,
}

impl SemanticSchema {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn properties(&self) -> &[SemanticProperty] {
        &self.properties
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.id.as_str())
    }

    pub fn get(&self, id: &str) -> Option<&SemanticProperty> {
        self.properties.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Declare a property. A later declaration with the same id replaces the
    /// earlier one in place.
    fn declare(&mut self, column: &str) {
        let id = format!("{PROPERTY_PREFIX}{}", normalize_column_name(column));
        let property = SemanticProperty {
            iri: format!("{}{}", self.namespace, id),
            domain: format!("{}{}", self.namespace, TABLE_CLASS),
            range: format!("{XSD_NS}string"),
            column: column.to_string(),
            id,
        };

        match self.properties.iter_mut().find(|p| p.id == property.id) {
            Some(existing) => {
                tracing::debug!(
                    "Column '{}' collides with '{}' as {}; keeping the later column",
                    property.column,
                    existing.column,
                    property.id
                );
                *existing = property;
            }
            None => self.properties.push(property),
        }
    }

    /// Serialize the schema as RDF Turtle.
    pub fn to_turtle(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "@prefix owl: <{OWL_NS}> .");
        let _ = writeln!(out, "@prefix rdfs: <{RDFS_NS}> .");
        let _ = writeln!(out, "@prefix xsd: <{XSD_NS}> .");

        for p in &self.properties {
            out.push('\n');
            let _ = writeln!(out, "<{}> a owl:DatatypeProperty ;", p.iri);
            let _ = writeln!(out, "    rdfs:label \"{}\" ;", escape_literal(&p.column));
            let _ = writeln!(out, "    rdfs:domain <{}> ;", p.domain);
            let _ = writeln!(out, "    rdfs:range xsd:string .");
        }
        out
    }
}

fn escape_literal(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Derive the semantic schema of a relation from its column names.
pub fn extract_schema(relation: &Relation, namespace: &str) -> SemanticSchema {
    extract_schema_from_columns(relation.column_names(), namespace)
}

pub fn extract_schema_from_columns<'a>(
    columns: impl IntoIterator<Item = &'a str>,
    namespace: &str,
) -> SemanticSchema {
    let mut schema = SemanticSchema {
        namespace: namespace.to_string(),
        properties: Vec::new(),
    };
    for column in columns {
        schema.declare(column);
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetsage_core::types::Value;

    const NS: &str = "http://example.org/";

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("Name"), "name");
        assert_eq!(normalize_column_name("Unit Price ($)"), "unit_price_");
        assert_eq!(normalize_column_name("first--last  name"), "first_last_name");
        assert_eq!(normalize_column_name("already_snake"), "already_snake");
        assert_eq!(normalize_column_name("Año"), "año");
        assert_eq!(normalize_column_name(""), "");
    }

    #[test]
    fn test_people_schema() {
        let rel = Relation::from_rows(
            vec!["Name".into(), "Age".into()],
            vec![vec!["Ana".into(), Value::Integer(30)]],
        )
        .unwrap();
        let schema = extract_schema(&rel, NS);

        assert_eq!(schema.ids().collect::<Vec<_>>(), vec!["has_name", "has_age"]);
        let name = schema.get("has_name").unwrap();
        assert_eq!(name.iri, "http://example.org/has_name");
        assert_eq!(name.column, "Name");
        assert_eq!(name.domain, "http://example.org/Table");
        assert_eq!(name.range, "http://www.w3.org/2001/XMLSchema#string");
    }

    #[test]
    fn test_schema_is_deterministic() {
        let cols = ["Order ID", "Ship-Date", "total"];
        let a = extract_schema_from_columns(cols, NS);
        let b = extract_schema_from_columns(cols, NS);
        assert_eq!(a, b);
    }

    #[test]
    fn test_collision_keeps_later_column() {
        let schema = extract_schema_from_columns(["First Name", "first_name", "Age"], NS);
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.ids().collect::<Vec<_>>(), vec!["has_first_name", "has_age"]);
        assert_eq!(schema.get("has_first_name").unwrap().column, "first_name");
    }

    #[test]
    fn test_empty_relation_has_empty_schema() {
        let schema = extract_schema(&Relation::default(), NS);
        assert!(schema.is_empty());
        assert_eq!(schema.namespace(), NS);
    }

    #[test]
    fn test_turtle_export() {
        let schema = extract_schema_from_columns(["Name", "Say \"hi\""], NS);
        let ttl = schema.to_turtle();

        assert!(ttl.starts_with("@prefix owl: <http://www.w3.org/2002/07/owl#> ."));
        assert!(ttl.contains("<http://example.org/has_name> a owl:DatatypeProperty ;"));
        assert!(ttl.contains("rdfs:domain <http://example.org/Table> ;"));
        assert!(ttl.contains("rdfs:label \"Say \\\"hi\\\"\" ;"));
        assert_eq!(ttl.matches("rdfs:range xsd:string .").count(), 2);
    }
}
