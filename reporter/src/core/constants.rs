// =============================================================================
// Application Identity
// =============================================================================

/// Application name (binary, paths and identifiers)
pub const APP_NAME: &str = "metric-reporter";

/// Library crate name, used as the default log filter target
pub const LOG_TARGET: &str = "metric_reporter";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".metric-reporter";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "metric-reporter.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "METRIC_REPORTER_CONFIG";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "METRIC_REPORTER_LOG";

/// Environment variable for the reporting event input file (stdin when unset)
pub const ENV_INPUT: &str = "METRIC_REPORTER_INPUT";

/// Environment variable for a single allow-list pattern
pub const ENV_ALLOWED_METRICS: &str = "METRIC_REPORTER_ALLOW";

/// Environment variable for the sink backend (`log` or `graphite`)
pub const ENV_SINK: &str = "METRIC_REPORTER_SINK";

pub const ENV_GRAPHITE_HOST: &str = "METRIC_REPORTER_GRAPHITE_HOST";

pub const ENV_GRAPHITE_PORT: &str = "METRIC_REPORTER_GRAPHITE_PORT";

pub const ENV_GRAPHITE_PREFIX: &str = "METRIC_REPORTER_GRAPHITE_PREFIX";

// =============================================================================
// Defaults
// =============================================================================

/// Allow-list used when none is configured: every metric
pub const DEFAULT_ALLOWED_METRICS: &[&str] = &[".*"];

pub const DEFAULT_GRAPHITE_HOST: &str = "127.0.0.1";

/// Graphite plaintext protocol port
pub const DEFAULT_GRAPHITE_PORT: u16 = 2003;

pub const DEFAULT_GRAPHITE_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Reporting events buffered between the reader and the pipeline
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

// =============================================================================
// Pipeline & Shutdown
// =============================================================================

/// Per-event wait while draining the pipeline on shutdown
pub const PIPELINE_DRAIN_TIMEOUT_MS: u64 = 100;

/// Graceful shutdown timeout in seconds
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 30;
