//! Parsed row type shared by every unit parser

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Field name -> value for one record, kept in schema order.
///
/// Missing values are empty strings, never absent keys, so every row of a
/// unit carries the same field set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedRow(IndexMap<String, String>);

impl ParsedRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row with every field present and empty
    pub fn with_fields<S: AsRef<str>>(fields: &[S]) -> Self {
        Self(
            fields
                .iter()
                .map(|f| (f.as_ref().to_string(), String::new()))
                .collect(),
        )
    }

    /// Set a field. An existing field keeps its position.
    pub fn insert(&mut self, field: &str, value: impl Into<String>) {
        self.0.insert(field.to_string(), value.into());
    }

    /// Value of a field, empty when the field is unknown
    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map(String::as_str).unwrap_or("")
    }

    /// True if at least one field holds a non-blank value
    pub fn has_values(&self) -> bool {
        self.0.values().any(|v| !v.trim().is_empty())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParsedRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
