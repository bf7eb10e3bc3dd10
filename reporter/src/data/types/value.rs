//! Raw metric values as delivered by the cluster
//!
//! A data point's value is recursively typed: a number, a keyed group of
//! values, or an ordered buffer of samples. Everything else is carried along
//! as an explicit variant so the flattener can skip it visibly.

use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Closed set of value shapes a data point can hold
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "JsonValue")]
pub enum RawValue {
    Number(f64),
    /// Keyed group, iteration order is insertion order
    Mapping(Vec<(String, RawValue)>),
    /// Time-windowed sample buffer, most recent sample first
    Sequence(Vec<RawValue>),
    Text(String),
    Bool(bool),
    #[default]
    Null,
}

impl RawValue {
    /// Build a mapping from `(key, value)` pairs, keeping their order
    pub fn mapping<K, V, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RawValue>,
    {
        RawValue::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a sequence of samples
    pub fn sequence<V, I>(samples: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RawValue>,
    {
        RawValue::Sequence(samples.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Mapping(_) => "mapping",
            Self::Sequence(_) => "sequence",
            Self::Text(_) => "text",
            Self::Bool(_) => "bool",
            Self::Null => "null",
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Number(value as f64)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<JsonValue> for RawValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Number(n) => n.as_f64().map_or(RawValue::Null, RawValue::Number),
            JsonValue::Object(map) => {
                RawValue::Mapping(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
            JsonValue::Array(items) => {
                RawValue::Sequence(items.into_iter().map(Into::into).collect())
            }
            JsonValue::String(s) => RawValue::Text(s),
            JsonValue::Bool(b) => RawValue::Bool(b),
            JsonValue::Null => RawValue::Null,
        }
    }
}
