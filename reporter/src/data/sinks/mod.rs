//! Metric sinks
//!
//! Transport for accepted metrics, with pluggable backends:
//! - Log (default) - structured log line per metric
//! - Graphite - plaintext line protocol over TCP

mod backend;
mod error;
mod graphite;
mod log;

use std::sync::Arc;

pub use backend::MetricSink;
pub use error::SinkError;
pub use graphite::{GraphiteSink, format_graphite_line};
pub use log::LogSink;

use crate::core::config::{SinkBackend, SinkConfig};
use crate::data::types::TaskInfo;
use crate::domain::metrics::Metric;

/// Sink service wrapping the configured backend
pub struct SinkService {
    backend: Arc<dyn MetricSink>,
}

impl std::fmt::Debug for SinkService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkService")
            .field("backend", &self.backend.backend_name())
            .finish()
    }
}

impl SinkService {
    /// Create a sink service from configuration
    pub fn new(config: &SinkConfig) -> Result<Self, SinkError> {
        let backend: Arc<dyn MetricSink> = match config.backend {
            SinkBackend::Log => {
                tracing::debug!("Initializing log sink");
                Arc::new(LogSink)
            }
            SinkBackend::Graphite => Arc::new(GraphiteSink::new(&config.graphite)?),
        };

        Ok(Self { backend })
    }

    /// Wrap an existing backend
    pub fn from_backend(backend: Arc<dyn MetricSink>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    pub async fn send(&self, task: &TaskInfo, metrics: &[Metric]) -> Result<(), SinkError> {
        self.backend.send(task, metrics).await
    }
}
