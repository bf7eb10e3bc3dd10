//! Data layer: input model, intake, allow-list and transport
//!
//! - `types` - reporting events and raw values
//! - `source` - newline-delimited JSON event reader
//! - `allowlist` - regex allow-list of metric names
//! - `sinks` - log and Graphite transports

pub mod allowlist;
pub mod sinks;
pub mod source;
pub mod types;

pub use allowlist::{AllowListError, MetricFilter, MetricMatcher};
pub use sinks::{MetricSink, SinkError, SinkService};
