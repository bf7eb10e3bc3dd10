//! Graphite plaintext sink
//!
//! Sends `<name> <value> <timestamp>\n` lines over TCP, one connection per
//! reporting event. Whitespace in names is rewritten to `_` here, after the
//! allow-list has matched the unrewritten name.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use super::backend::MetricSink;
use super::error::SinkError;
use crate::core::config::GraphiteConfig;
use crate::data::types::TaskInfo;
use crate::domain::metrics::{Metric, join_fragments};

pub struct GraphiteSink {
    addr: String,
    prefix: Option<String>,
    /// Applies to the connect and, separately, to writing the batch
    timeout: Duration,
}

impl GraphiteSink {
    pub fn new(config: &GraphiteConfig) -> Result<Self, SinkError> {
        if config.host.trim().is_empty() {
            return Err(SinkError::Config("graphite host must not be empty".into()));
        }
        if config.port == 0 {
            return Err(SinkError::Config(
                "graphite port must be greater than 0".into(),
            ));
        }

        let addr = format!("{}:{}", config.host, config.port);
        tracing::debug!(addr = %addr, prefix = ?config.prefix, "Initializing Graphite sink");

        Ok(Self {
            addr,
            prefix: config.prefix.clone().filter(|p| !p.trim().is_empty()),
            timeout: Duration::from_secs(config.connect_timeout_secs),
        })
    }

    async fn connect(&self) -> Result<TcpStream, SinkError> {
        match tokio::time::timeout(self.timeout, TcpStream::connect(&self.addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(source)) => Err(SinkError::Connection {
                addr: self.addr.clone(),
                source,
            }),
            Err(_) => Err(SinkError::Timeout {
                addr: self.addr.clone(),
                timeout_secs: self.timeout.as_secs(),
            }),
        }
    }
}

#[async_trait]
impl MetricSink for GraphiteSink {
    async fn send(&self, task: &TaskInfo, metrics: &[Metric]) -> Result<(), SinkError> {
        if metrics.is_empty() {
            return Ok(());
        }

        let timestamp = if task.timestamp > 0 {
            task.timestamp
        } else {
            chrono::Utc::now().timestamp()
        };

        let payload: String = metrics
            .iter()
            .map(|m| format_graphite_line(self.prefix.as_deref(), m, timestamp))
            .collect();

        let mut stream = self.connect().await?;
        let write = async {
            stream.write_all(payload.as_bytes()).await?;
            stream.flush().await?;
            stream.shutdown().await
        };
        // A peer that accepts but never reads must not stall the pipeline
        match tokio::time::timeout(self.timeout, write).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(SinkError::SendTimeout {
                    addr: self.addr.clone(),
                    timeout_secs: self.timeout.as_secs(),
                });
            }
        }

        tracing::trace!(addr = %self.addr, lines = metrics.len(), "Sent metrics to Graphite");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "graphite"
    }
}

/// Render one metric as a Graphite plaintext line (newline included).
///
/// Whitespace inside the name would split the line, so it becomes `_`.
pub fn format_graphite_line(prefix: Option<&str>, metric: &Metric, timestamp: i64) -> String {
    let name = match prefix {
        Some(prefix) => join_fragments([prefix, metric.metric_name().as_str()]),
        None => metric.metric_name(),
    };
    let name: String = name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{} {} {}\n", name, metric.value(), timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    fn config(host: &str, port: u16, prefix: Option<&str>) -> GraphiteConfig {
        GraphiteConfig {
            host: host.to_string(),
            port,
            prefix: prefix.map(String::from),
            connect_timeout_secs: 2,
        }
    }

    #[test]
    fn test_format_line() {
        let metric = Metric::new("spout", "emit-count.default", 2000.0).unwrap();
        assert_eq!(
            format_graphite_line(None, &metric, 1_700_000_000),
            "spout.emit-count.default 2000 1700000000\n"
        );
        assert_eq!(
            format_graphite_line(Some("storm.prod"), &metric, 5),
            "storm.prod.spout.emit-count.default 2000 5\n"
        );
    }

    #[test]
    fn test_format_line_fractional_and_whitespace() {
        let metric = Metric::new("my bolt", "latency", 1.25).unwrap();
        assert_eq!(
            format_graphite_line(None, &metric, 1),
            "my_bolt.latency 1.25 1\n"
        );
    }

    #[test]
    fn test_whitespace_rewritten_after_allow_list_match() {
        use crate::data::{MetricFilter, MetricMatcher};

        let metric = Metric::new("my bolt", "latency", 2.0).unwrap();
        let matcher = MetricMatcher::new(["my bolt\\..*"]).unwrap();
        assert!(matcher.is_allowed(&metric.metric_name()));
        assert!(!matcher.is_allowed("my_bolt.latency"));
        assert_eq!(format_graphite_line(None, &metric, 1), "my_bolt.latency 2 1\n");
    }

    #[test]
    fn test_new_rejects_bad_config() {
        assert!(matches!(
            GraphiteSink::new(&config("", 2003, None)),
            Err(SinkError::Config(_))
        ));
        assert!(matches!(
            GraphiteSink::new(&config("localhost", 0, None)),
            Err(SinkError::Config(_))
        ));
    }

    #[test]
    fn test_blank_prefix_ignored() {
        let sink = GraphiteSink::new(&config("localhost", 2003, Some("  "))).unwrap();
        assert!(sink.prefix.is_none());
        assert_eq!(sink.backend_name(), "graphite");
    }

    #[tokio::test]
    async fn test_send_writes_plaintext_lines() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = String::new();
            socket.read_to_string(&mut received).await.unwrap();
            received
        });

        let sink = GraphiteSink::new(&config("127.0.0.1", port, Some("storm"))).unwrap();
        let task = TaskInfo {
            timestamp: 1_700_000_000,
            ..Default::default()
        };
        let metrics = vec![
            Metric::new("spout", "emit-count", 10.0).unwrap(),
            Metric::new("spout", "ack-count", 0.5).unwrap(),
        ];
        sink.send(&task, &metrics).await.unwrap();

        let received = server.await.unwrap();
        assert_eq!(
            received,
            "storm.spout.emit-count 10 1700000000\nstorm.spout.ack-count 0.5 1700000000\n"
        );
    }

    #[tokio::test]
    async fn test_send_empty_batch_does_not_connect() {
        // Nothing listens on this port; an empty batch must not try to connect
        let sink = GraphiteSink::new(&config("127.0.0.1", 9, None)).unwrap();
        sink.send(&TaskInfo::default(), &[]).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_times_out_when_peer_stops_reading() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        // Accept and hold the socket without reading from it
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(60)).await;
            drop(socket);
        });

        let sink = GraphiteSink::new(&GraphiteConfig {
            connect_timeout_secs: 1,
            ..config("127.0.0.1", port, None)
        })
        .unwrap();
        // Far more than the loopback socket buffers can hold
        let metrics: Vec<Metric> = (0..600_000)
            .map(|i| Metric::new("spout", format!("emit-count.stream-{}", i), 1.0).unwrap())
            .collect();

        let result = tokio::time::timeout(
            Duration::from_secs(10),
            sink.send(&TaskInfo::default(), &metrics),
        )
        .await
        .expect("send must give up on its own");
        assert!(matches!(result, Err(SinkError::SendTimeout { .. })));
        server.abort();
    }

    #[tokio::test]
    async fn test_send_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let sink = GraphiteSink::new(&config("127.0.0.1", port, None)).unwrap();
        let metrics = vec![Metric::new("a", "b", 1.0).unwrap()];
        let err = sink.send(&TaskInfo::default(), &metrics).await.unwrap_err();
        assert!(matches!(err, SinkError::Connection { .. }));
    }
}
