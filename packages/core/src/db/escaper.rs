//! Query Escaping
//!
//! MariaDB identifier and literal escaping. Values are escaped by their
//! runtime kind: integers and floats render as bare literals, booleans as
//! `0`/`1`, NULL as the `NULL` marker, strings as quoted literals -- unless
//! the string carries a Well-Known Text prefix, in which case it renders as
//! a geometry literal so the server stores real geometry instead of text.

use crate::models::Value;

/// Well-Known Text type names recognized in values and column types.
pub const WKT_TYPES: [&str; 8] = [
    "POINT",
    "LINESTRING",
    "POLYGON",
    "MULTIPOINT",
    "MULTILINESTRING",
    "MULTIPOLYGON",
    "GEOMETRYCOLLECTION",
    "GEOMETRY",
];

/// Stateless MariaDB escaper for identifiers and literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEscaper;

impl QueryEscaper {
    pub fn new() -> Self {
        Self
    }

    /// Escape a column reference. Qualified names are escaped per segment:
    /// `k.CONSTRAINT_NAME` becomes `` `k`.`CONSTRAINT_NAME` ``.
    pub fn column(&self, name: &str) -> String {
        name.split('.')
            .map(|segment| format!("`{segment}`"))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Escape a result column reference (no qualification).
    pub fn result_column(&self, name: &str) -> String {
        format!("`{name}`")
    }

    /// Escape a table reference, optionally aliased.
    pub fn table(&self, name: &str, alias: Option<&str>) -> String {
        match alias {
            Some(alias) => format!("{} AS `{alias}`", self.column(name)),
            None => self.column(name),
        }
    }

    /// Escape a string into a quoted literal.
    pub fn value(&self, value: &str) -> String {
        format!("'{}'", escape_string(value))
    }

    pub fn int_value(&self, value: i64) -> String {
        value.to_string()
    }

    pub fn float_value(&self, value: f64) -> String {
        value.to_string()
    }

    /// Render a list literal from already-escaped items.
    pub fn list_value<I>(&self, items: I) -> String
    where
        I: IntoIterator<Item = String>,
    {
        format!(
            "({})",
            items.into_iter().collect::<Vec<_>>().join(", ")
        )
    }

    /// Render a geometry literal from Well-Known Text.
    pub fn geo_value(&self, wkt: &str) -> String {
        format!("ST_GeomFromText('{}')", escape_string(wkt))
    }

    /// Escape one value by its runtime kind.
    pub fn escape(&self, value: &Value) -> String {
        match value {
            Value::Integer(i) => self.int_value(*i),
            Value::Float(f) => self.float_value(*f),
            Value::Boolean(b) => self.int_value(i64::from(*b)),
            Value::Null => "NULL".to_string(),
            Value::String(s) if Self::has_wkt_prefix(s) => self.geo_value(s),
            Value::String(s) => self.value(s),
        }
    }

    /// Whether a string starts with a WKT shape name immediately followed
    /// by an opening parenthesis.
    pub fn has_wkt_prefix(value: &str) -> bool {
        WKT_TYPES.iter().any(|&shape| {
            value.len() > shape.len()
                && value.starts_with(shape)
                && value.as_bytes()[shape.len()] == b'('
        })
    }

    /// Whether a declared column type is one of the WKT geometry types.
    pub fn is_wkt_type(column_type: &str) -> bool {
        WKT_TYPES.contains(&column_type.to_uppercase().as_str())
    }
}

fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\0' => escaped.push_str("\\0"),
            '\u{1a}' => escaped.push_str("\\Z"),
            _ => escaped.push(c),
        }
    }
    escaped
}
