//! Allow-list of metric names
//!
//! Built from the configured regex patterns. A fully-qualified metric name is
//! allowed when any pattern matches the whole name.

use regex::RegexSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AllowListError {
    #[error("Invalid allow-list pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Predicate deciding which metrics continue to the sink
pub trait MetricFilter: Send + Sync {
    fn is_allowed(&self, name: &str) -> bool;
}

/// Regex allow-list with full-match semantics
#[derive(Debug, Clone)]
pub struct MetricMatcher {
    patterns: RegexSet,
}

impl MetricMatcher {
    /// Compile the allow-list. An empty list allows nothing.
    pub fn new<I, S>(patterns: I) -> Result<Self, AllowListError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut anchored = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let full = format!("^(?:{})$", pattern);
            // Validate individually so the error names the offending pattern
            regex::Regex::new(&full).map_err(|source| AllowListError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            anchored.push(full);
        }

        let patterns = RegexSet::new(&anchored).map_err(|source| AllowListError::InvalidPattern {
            pattern: anchored.join(", "),
            source,
        })?;

        tracing::debug!(patterns = patterns.len(), "Allow-list compiled");
        Ok(Self { patterns })
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl MetricFilter for MetricMatcher {
    fn is_allowed(&self, name: &str) -> bool {
        self.patterns.is_match(name)
    }
}
