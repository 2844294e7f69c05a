//! Data models for BuscaFarm API responses.
//!
//! The backend defines these records. Only `id` is required and typed;
//! every other field stays in the record's attribute map exactly as the API
//! sent it, nulls included, so stored copies match what the API returned.

pub mod employee;
pub mod pharmacy;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use employee::Employee;
pub use pharmacy::Pharmacy;

/// Primary key of a backend record. The API has used both numeric ids and
/// UUID strings, so accept either.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Number(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Text(id.to_string())
    }
}

/// Render an untyped attribute for display.
pub(crate) fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A string attribute, `None` when absent, null or not a string.
pub(crate) fn str_attribute<'a>(
    attributes: &'a serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Option<&'a str> {
    attributes.get(key).and_then(|v| v.as_str())
}

/// Field/value pairs in display order: `id`, then the `leading` keys that
/// are present, then everything else sorted by key.
pub(crate) fn ordered_fields(
    id: &RecordId,
    attributes: &serde_json::Map<String, serde_json::Value>,
    leading: &[&str],
) -> Vec<(String, String)> {
    let mut fields = vec![("id".to_string(), id.to_string())];
    for key in leading {
        if let Some(value) = attributes.get(*key) {
            fields.push((key.to_string(), display_value(value)));
        }
    }
    let mut rest: Vec<_> = attributes
        .iter()
        .filter(|(k, _)| !leading.contains(&k.as_str()))
        .collect();
    rest.sort_by(|a, b| a.0.cmp(b.0));
    fields.extend(rest.into_iter().map(|(k, v)| (k.clone(), display_value(v))));
    fields
}
