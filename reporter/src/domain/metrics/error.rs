//! Metric construction errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    #[error("Non-finite value for metric {name}: {value}")]
    NonFiniteValue { name: String, value: f64 },

    #[error("Marker '{marker}' ends operation '{operation}' with nothing after it")]
    MarkerAtEndOfString { operation: String, marker: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_display() {
        let err = MetricError::NonFiniteValue {
            name: "spout.emit-count".to_string(),
            value: f64::NAN,
        };
        assert_eq!(
            err.to_string(),
            "Non-finite value for metric spout.emit-count: NaN"
        );
    }

    #[test]
    fn test_marker_at_end_display() {
        let err = MetricError::MarkerAtEndOfString {
            operation: "emit.default".to_string(),
            marker: "default".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Marker 'default' ends operation 'emit.default' with nothing after it"
        );
    }
}
