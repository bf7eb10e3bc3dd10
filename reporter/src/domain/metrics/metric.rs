//! Flattened metric record

use std::fmt;

use super::error::MetricError;
use super::names::{metric_name, operation_suffix_after};

/// One named numeric data point, ready for filtering and delivery
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    component: String,
    operation: String,
    value: f64,
}

impl Metric {
    /// Create a metric from an already sanitized component and operation.
    ///
    /// Rejects NaN and infinite values.
    pub fn new(
        component: impl Into<String>,
        operation: impl Into<String>,
        value: f64,
    ) -> Result<Self, MetricError> {
        let component = component.into();
        let operation = operation.into();
        if !value.is_finite() {
            return Err(MetricError::NonFiniteValue {
                name: metric_name(&component, &operation),
                value,
            });
        }
        Ok(Self {
            component,
            operation,
            value,
        })
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Fully-qualified dotted name (`component.operation`)
    pub fn metric_name(&self) -> String {
        metric_name(&self.component, &self.operation)
    }

    /// Operation with everything up to and including `marker` (plus one separator) removed
    pub fn operation_after(&self, marker: &str) -> Result<&str, MetricError> {
        operation_suffix_after(&self.operation, marker)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Metric{{component='{}', operation='{}', value={:?}}}",
            self.component, self.operation, self.value
        )
    }
}
