//! Active table filters.
//!
//! Filters are opaque to the selection engine: they are compared to decide
//! whether a selection is still valid and copied verbatim into select-all
//! requests so the server can re-resolve the matching rows.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Search text and facet filters in effect for a table.
///
/// Values are kept exactly as given and sent to the server unchanged. Blank
/// strings and nulls carry no filtering meaning, so they are ignored when
/// two filter sets are compared: `{"q": ""}` and `{}` describe the same
/// scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveFilters {
    fields: BTreeMap<String, Value>,
}

impl ActiveFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object. Non-object values yield no filters.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            _ => Self::default(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    /// Builder-style [`ActiveFilters::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value.into());
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// True when no field actually narrows the result set.
    pub fn is_empty(&self) -> bool {
        self.scope().next().is_none()
    }

    /// Every field, blanks included, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Fields that narrow the result set.
    fn scope(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter().filter(|(_, v)| !is_blank(v))
    }
}

impl PartialEq for ActiveFilters {
    fn eq(&self, other: &Self) -> bool {
        self.scope().eq(other.scope())
    }
}

impl FromIterator<(String, Value)> for ActiveFilters {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
