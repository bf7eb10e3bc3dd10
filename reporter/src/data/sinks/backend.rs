//! Sink backend trait definition

use async_trait::async_trait;

use super::error::SinkError;
use crate::data::types::TaskInfo;
use crate::domain::metrics::Metric;

/// Sink backend trait
///
/// Delivers the accepted metrics of one reporting event to a storage backend.
/// Implementations send what they are given once: no buffering across events
/// and no retry.
#[async_trait]
pub trait MetricSink: Send + Sync {
    /// Deliver a batch of metrics produced by `task`
    async fn send(&self, task: &TaskInfo, metrics: &[Metric]) -> Result<(), SinkError>;

    /// Backend name for debugging/logging
    fn backend_name(&self) -> &'static str;
}
