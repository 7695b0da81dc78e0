//! String-keyed records returned by the info handlers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ProjectError;

/// A single backing-store record: field name to string value.
///
/// Missing fields read as the empty string, which matches how the
/// info handlers leave optional attributes unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, String>);

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, returning the record for chaining.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Sets a field in place.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    /// Returns the value of `field`, or `""` when absent.
    #[must_use]
    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map_or("", String::as_str)
    }

    /// Returns an owned copy of `field`, or the given default when absent.
    #[must_use]
    pub fn get_or(&self, field: &str, default: &str) -> String {
        self.0
            .get(field)
            .map_or_else(|| default.to_string(), Clone::clone)
    }

    /// Returns the value of a field that must be present.
    pub fn require(&self, kind: &str, field: &str) -> Result<&str, ProjectError> {
        self.0
            .get(field)
            .map(String::as_str)
            .ok_or_else(|| ProjectError::MissingRecordField {
                kind: kind.to_string(),
                field: field.to_string(),
            })
    }

    /// Whether `field` is present, even if empty.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over `(field, value)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
