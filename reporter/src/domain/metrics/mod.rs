//! Metrics Processing Pipeline
//!
//! Turns reporting events into flat, dot-named metrics: name normalization,
//! recursive flattening, extraction, filtering, and delivery.

mod deliver;
mod error;
mod extract;
mod flatten;
mod metric;
mod names;
mod pipeline;

pub use error::MetricError;
pub use extract::{extract_event, extract_metrics};
pub use flatten::{flatten, nested_observation_name};
pub use metric::Metric;
pub use names::{
    COLON, COLON_REPLACEMENT, INTERNAL_METRIC_MARKER, NAME_SEPARATOR, PATH_SEPARATOR,
    join_fragments, metric_name, operation_suffix_after, sanitize_fragment,
};
pub use pipeline::{MetricsPipeline, PipelineOutcome};
