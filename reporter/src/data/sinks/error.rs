//! Sink error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Sink configuration error: {0}")]
    Config(String),

    #[error("Failed to connect to {addr}: {source}")]
    Connection {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Timed out connecting to {addr} after {timeout_secs}s")]
    Timeout { addr: String, timeout_secs: u64 },

    #[error("Timed out sending to {addr} after {timeout_secs}s")]
    SendTimeout { addr: String, timeout_secs: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
