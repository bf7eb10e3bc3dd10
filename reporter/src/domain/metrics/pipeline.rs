//! Metrics Processing Pipeline
//!
//! Receives reporting events, extracts and filters metrics, delivers them to the sink.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::deliver::deliver_batch;
use super::extract::extract_event;
use super::metric::Metric;
use crate::core::constants::PIPELINE_DRAIN_TIMEOUT_MS;
use crate::data::types::ReportingEvent;
use crate::data::{MetricFilter, SinkService};

/// What happened to one reporting event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// Metrics produced by flattening
    pub extracted: usize,
    /// Metrics that passed the allow-list
    pub accepted: usize,
    /// Whether the sink took the accepted batch (true when there was nothing to send)
    pub delivered: bool,
}

pub struct MetricsPipeline {
    filter: Arc<dyn MetricFilter>,
    sink: Arc<SinkService>,
}

impl MetricsPipeline {
    pub fn new(filter: Arc<dyn MetricFilter>, sink: Arc<SinkService>) -> Self {
        Self { filter, sink }
    }

    pub fn start(
        self,
        mut rx: mpsc::Receiver<ReportingEvent>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut shutdown_requested = false;

            loop {
                if shutdown_requested {
                    // Drain events already queued before shutdown
                    match tokio::time::timeout(
                        Duration::from_millis(PIPELINE_DRAIN_TIMEOUT_MS),
                        rx.recv(),
                    )
                    .await
                    {
                        Ok(Some(event)) => {
                            self.handle_event(&event).await;
                            continue;
                        }
                        _ => break,
                    }
                }

                tokio::select! {
                    biased;
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            tracing::debug!("MetricsPipeline received shutdown, draining...");
                            shutdown_requested = true;
                        }
                    }
                    event = rx.recv() => {
                        match event {
                            Some(event) => {
                                self.handle_event(&event).await;
                            }
                            None => break,
                        }
                    }
                }
            }
            tracing::debug!("MetricsPipeline shutdown complete");
        })
    }

    /// Process one reporting event end to end
    pub async fn handle_event(&self, event: &ReportingEvent) -> PipelineOutcome {
        tracing::debug!(
            task = %event.task,
            data_points = event.data_points.len(),
            "Getting data points"
        );

        let metrics = extract_event(event);
        let extracted = metrics.len();
        tracing::trace!(metrics = ?metrics, "Parsed metrics");

        let accepted: Vec<Metric> = metrics
            .into_iter()
            .filter(|m| self.filter.is_allowed(&m.metric_name()))
            .collect();

        tracing::debug!(
            component = %event.task.component_id,
            extracted,
            accepted = accepted.len(),
            "Filtered metrics"
        );

        let delivered = if accepted.is_empty() {
            true
        } else {
            deliver_batch(&event.task, &accepted, &self.sink).await
        };

        PipelineOutcome {
            extracted,
            accepted: accepted.len(),
            delivered,
        }
    }
}
