//! Loosely-typed documents.
//!
//! Documents are schemaless: a field may hold any JSON scalar, and form
//! submissions store every value as a string.

use serde_json::{Map, Value};

/// A document: field name to JSON value.
pub type Document = Map<String, Value>;

/// Build a document from submitted form fields, keeping every value a string.
#[must_use]
pub fn document_from_fields<I>(fields: I) -> Document
where
    I: IntoIterator<Item = (String, String)>,
{
    fields
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect()
}

/// Render a field value for display in a table cell or form input.
///
/// Strings are shown without quotes and `null` as an empty string; anything
/// else is shown as compact JSON.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Display value of a named field, empty when the field is absent.
#[must_use]
pub fn field_display(document: &Document, field: &str) -> String {
    document.get(field).map(display_value).unwrap_or_default()
}
