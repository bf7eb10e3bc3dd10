//! Reporting event intake
//!
//! Reads newline-delimited JSON reporting events and forwards them to the
//! metrics pipeline. A malformed line, including one that is not valid
//! UTF-8, is logged and skipped.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::data::types::ReportingEvent;

/// Spawn a task reading events from `reader` until EOF, shutdown, or the
/// pipeline side of the channel closing.
pub fn spawn_reader<R>(
    reader: R,
    tx: mpsc::Sender<ReportingEvent>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = reader;
        // Holds a partial line across a cancelled read
        let mut buf: Vec<u8> = Vec::new();
        let mut line_no: u64 = 0;

        loop {
            let read = tokio::select! {
                biased;
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        tracing::debug!("Event reader received shutdown");
                        break;
                    }
                    continue;
                }
                read = reader.read_until(b'\n', &mut buf) => read,
            };

            match read {
                Ok(0) => {
                    tracing::debug!(lines = line_no, "Event input reached EOF");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read event input");
                    break;
                }
            }
            line_no += 1;

            let line = std::mem::take(&mut buf);
            let line = trim_line_end(&line);
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            let event = match parse_event_bytes(line) {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(line = line_no, error = %e, "Skipping malformed reporting event");
                    continue;
                }
            };

            if tx.send(event).await.is_err() {
                tracing::debug!("Metrics pipeline closed, stopping event reader");
                break;
            }
        }
    })
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Parse raw line bytes; invalid UTF-8 is reported as a parse error
fn parse_event_bytes(line: &[u8]) -> Result<ReportingEvent, serde_json::Error> {
    serde_json::from_slice(line)
}

/// Parse one JSON line into a reporting event
pub fn parse_event(line: &str) -> Result<ReportingEvent, serde_json::Error> {
    serde_json::from_str(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_reader_forwards_events_and_skips_bad_lines() {
        let input = concat!(
            r#"{"task": {"component_id": "spout"}, "data_points": [{"name": "a", "value": 1}]}"#,
            "\n",
            "\n",
            "not json\n",
            r#"{"task": {"component_id": "bolt"}}"#,
            "\n",
        );
        let (tx, mut rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = spawn_reader(input.as_bytes(), tx, shutdown_rx);
        handle.await.unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.task.component_id, "spout");
        assert_eq!(first.data_points.len(), 1);

        let second = rx.recv().await.unwrap();
        assert_eq!(second.task.component_id, "bolt");

        // Reader dropped its sender at EOF
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_reader_skips_invalid_utf8_line() {
        let mut input: Vec<u8> = Vec::new();
        input.extend_from_slice(br#"{"task":{"component_id":"a"}}"#);
        input.extend_from_slice(b"\n\xff\xfe garbage\n");
        input.extend_from_slice(br#"{"task":{"component_id":"b"}}"#);
        input.extend_from_slice(b"\r\n");

        let (tx, mut rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = spawn_reader(std::io::Cursor::new(input), tx, shutdown_rx);
        handle.await.unwrap();

        let mut components = Vec::new();
        while let Some(event) = rx.recv().await {
            components.push(event.task.component_id);
        }
        assert_eq!(components, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_reader_last_line_without_newline() {
        let input = r#"{"task": {"component_id": "tail"}}"#;
        let (tx, mut rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        spawn_reader(input.as_bytes(), tx, shutdown_rx).await.unwrap();
        assert_eq!(rx.recv().await.unwrap().task.component_id, "tail");
    }

    #[test]
    fn test_parse_event_bytes_rejects_invalid_utf8() {
        assert!(parse_event_bytes(b"{\"task\": {\"component_id\": \"\xff\"}}").is_err());
        assert!(parse_event_bytes(br#"{"task": {"component_id": "ok"}}"#).is_ok());
    }

    #[tokio::test]
    async fn test_reader_stops_on_shutdown() {
        let (client, server) = tokio::io::duplex(64);
        let (tx, _rx) = mpsc::channel(8);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = spawn_reader(tokio::io::BufReader::new(server), tx, shutdown_rx);
        shutdown_tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_millis(500), handle)
            .await
            .unwrap()
            .unwrap();
        drop(client);
    }

    #[tokio::test]
    async fn test_reader_stops_when_pipeline_closed() {
        let input = "{}\n{}\n{}\n";
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = spawn_reader(input.as_bytes(), tx, shutdown_rx);
        tokio::time::timeout(Duration::from_millis(500), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[test]
    fn test_parse_event_error() {
        assert!(parse_event("[1, 2]").is_err());
        assert!(parse_event("{}").is_ok());
    }
}
