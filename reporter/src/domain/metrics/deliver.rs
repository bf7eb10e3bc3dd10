//! Metric delivery (single attempt, outcome logged)

use std::sync::Arc;

use crate::data::SinkService;
use crate::data::types::TaskInfo;

use super::metric::Metric;

/// Deliver a batch to the sink. Returns whether the sink accepted it.
///
/// Failures are logged and swallowed so one bad event never stops the pipeline.
pub async fn deliver_batch(task: &TaskInfo, metrics: &[Metric], sink: &Arc<SinkService>) -> bool {
    let metric_count = metrics.len();

    match sink.send(task, metrics).await {
        Ok(()) => {
            tracing::debug!(
                metrics = metric_count,
                backend = sink.backend_name(),
                component = %task.component_id,
                "Delivered metrics"
            );
            true
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                metrics = metric_count,
                backend = sink.backend_name(),
                component = %task.component_id,
                "Failed to deliver metrics"
            );
            false
        }
    }
}
