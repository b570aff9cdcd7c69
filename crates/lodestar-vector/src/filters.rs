use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Scalar value an exact-match filter compares against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    String(String),
    Int(i64),
    Float(f64),
}

impl FilterValue {
    /// Whether a metadata value equals this filter value.
    ///
    /// Numbers compare by numeric value, so `Int(3)` matches JSON `3.0`.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::String(expected), Value::String(actual)) => expected == actual,
            (Self::Int(expected), Value::Number(actual)) => match actual.as_i64() {
                Some(i) => i == *expected,
                None => actual.as_f64() == Some(*expected as f64),
            },
            (Self::Float(expected), Value::Number(actual)) => actual.as_f64() == Some(*expected),
            _ => false,
        }
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Requires `metadata[key] == value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactMatchFilter {
    pub key: String,
    pub value: FilterValue,
}

impl ExactMatchFilter {
    pub fn new(key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A missing key never matches.
    pub fn matches(&self, metadata: &HashMap<String, Value>) -> bool {
        metadata
            .get(&self.key)
            .is_some_and(|value| self.value.matches(value))
    }
}

/// Metadata filters for vector stores, combined with logical AND.
///
/// Only exact-match filters are supported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataFilters {
    #[serde(default)]
    pub filters: Vec<ExactMatchFilter>,
}

impl MetadataFilters {
    pub fn new(filters: Vec<ExactMatchFilter>) -> Self {
        Self { filters }
    }

    pub fn with_exact_match(
        mut self,
        key: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Self {
        self.add(ExactMatchFilter::new(key, value));
        self
    }

    pub fn add(&mut self, filter: ExactMatchFilter) {
        self.filters.push(filter);
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// An empty filter set accepts every record.
    pub fn matches(&self, metadata: &HashMap<String, Value>) -> bool {
        self.filters.iter().all(|f| f.matches(metadata))
    }
}
