//! Domain logic for metric reporting
//!
//! - `metrics` - flattening, naming and delivery pipeline

pub mod metrics;

pub use metrics::MetricsPipeline;
