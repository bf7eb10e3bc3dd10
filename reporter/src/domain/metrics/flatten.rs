//! Recursive flattening of nested data point values
//!
//! Walks a [`RawValue`] depth-first and emits one `(name, value)` pair per
//! number reached:
//! - number: the sanitized observation name
//! - mapping: numbers directly under a key are named `name.key`; nested
//!   mappings recurse; any other shape under a key is skipped
//! - sequence: only the first (most recent) sample is reported
//! - text / bool / null: nothing

use crate::data::types::RawValue;

use super::names::{join_fragments, sanitize_fragment};

/// Flatten one observation into `(name suffix, value)` pairs, in traversal order.
pub fn flatten(observation_name: &str, value: &RawValue) -> Vec<(String, f64)> {
    let mut pairs = Vec::new();
    flatten_into(&mut pairs, observation_name, value);
    pairs
}

fn flatten_into(pairs: &mut Vec<(String, f64)>, observation_name: &str, value: &RawValue) {
    match value {
        RawValue::Number(n) => {
            pairs.push((sanitize_fragment(observation_name), *n));
        }
        RawValue::Mapping(entries) => {
            for (key, sub_value) in entries {
                match sub_value {
                    RawValue::Number(n) => {
                        let name = join_fragments([
                            sanitize_fragment(observation_name),
                            sanitize_fragment(key),
                        ]);
                        pairs.push((name, *n));
                    }
                    RawValue::Mapping(_) => {
                        let nested = nested_observation_name(observation_name, key);
                        flatten_into(pairs, &nested, sub_value);
                    }
                    other => {
                        tracing::trace!(
                            observation = observation_name,
                            key = %key,
                            kind = other.kind(),
                            "Skipping non-numeric mapping entry"
                        );
                    }
                }
            }
        }
        RawValue::Sequence(samples) => {
            if let Some(latest) = samples.first() {
                flatten_into(pairs, observation_name, latest);
            }
        }
        RawValue::Text(_) | RawValue::Bool(_) | RawValue::Null => {
            tracing::trace!(
                observation = observation_name,
                kind = value.kind(),
                "Skipping unsupported value"
            );
        }
    }
}

/// Observation name used when recursing into a nested mapping.
///
/// The raw (unsanitized) parent name and key are joined first; sanitization
/// happens exactly once, when the recursion reaches a number. Sanitizing is
/// not idempotent (`"_:"` becomes `"__"`), so the name must stay raw until then.
pub fn nested_observation_name(observation_name: &str, key: &str) -> String {
    join_fragments([observation_name, key])
}
