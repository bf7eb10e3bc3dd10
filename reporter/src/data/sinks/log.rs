//! Log sink: writes every metric as a structured log line

use async_trait::async_trait;

use super::backend::MetricSink;
use super::error::SinkError;
use crate::data::types::TaskInfo;
use crate::domain::metrics::Metric;

#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl MetricSink for LogSink {
    async fn send(&self, task: &TaskInfo, metrics: &[Metric]) -> Result<(), SinkError> {
        for metric in metrics {
            tracing::info!(
                metric = %metric.metric_name(),
                value = metric.value(),
                component = metric.component(),
                task_id = task.task_id,
                timestamp = task.timestamp,
                "metric"
            );
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "log"
    }
}
