//! Metric extraction from reporting events
//!
//! Sanitizes the task's component once, flattens every data point, and builds
//! one [`Metric`] per number found. Data points are independent: a bad value
//! only drops its own metric.

use crate::data::types::{DataPoint, ReportingEvent};

use super::error::MetricError;
use super::flatten::flatten;
use super::metric::Metric;
use super::names::sanitize_fragment;

/// Extract and flatten all metrics from a reporting event.
///
/// Output follows data point order, then traversal order within each point.
/// Colliding names are passed through as-is.
pub fn extract_event(event: &ReportingEvent) -> Vec<Metric> {
    let component = sanitize_fragment(&event.task.component_id);

    let mut result = Vec::new();
    for point in &event.data_points {
        extract_into(&mut result, point, &component);
    }
    result
}

/// Extract metrics from a single data point. `component` must already be sanitized.
pub fn extract_metrics(point: &DataPoint, component: &str) -> Vec<Metric> {
    let mut result = Vec::new();
    extract_into(&mut result, point, component);
    result
}

fn extract_into(result: &mut Vec<Metric>, point: &DataPoint, component: &str) {
    for (operation, value) in flatten(&point.name, &point.value) {
        match Metric::new(component, operation, value) {
            Ok(metric) => result.push(metric),
            Err(MetricError::NonFiniteValue { name, value }) => {
                tracing::warn!(
                    metric = %name,
                    value = %value,
                    data_point = %point.name,
                    "Dropping metric with non-finite value"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, data_point = %point.name, "Dropping metric");
            }
        }
    }
}
