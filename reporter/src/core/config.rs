use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_ALLOWED_METRICS, DEFAULT_CHANNEL_CAPACITY,
    DEFAULT_GRAPHITE_CONNECT_TIMEOUT_SECS, DEFAULT_GRAPHITE_HOST, DEFAULT_GRAPHITE_PORT,
};

// =============================================================================
// Sink Backend Enum
// =============================================================================

/// Transport used for accepted metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkBackend {
    #[default]
    Log,
    Graphite,
}

impl fmt::Display for SinkBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkBackend::Log => write!(f, "log"),
            SinkBackend::Graphite => write!(f, "graphite"),
        }
    }
}

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Graphite configuration (nested under sink)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct GraphiteFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Prepended to every metric name
    pub prefix: Option<String>,
    pub connect_timeout_secs: Option<u64>,
}

/// Sink configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SinkFileConfig {
    pub backend: Option<SinkBackend>,
    pub graphite: Option<GraphiteFileConfig>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub allowed_metrics: Option<Vec<String>>,
    pub sink: Option<SinkFileConfig>,
    pub input: Option<String>,
    pub channel_capacity: Option<usize>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if other.allowed_metrics.is_some() {
            tracing::trace!(allowed_metrics = ?other.allowed_metrics, "Merging allowed_metrics");
            self.allowed_metrics = other.allowed_metrics;
        }

        if other.input.is_some() {
            tracing::trace!(input = ?other.input, "Merging input");
            self.input = other.input;
        }

        if other.channel_capacity.is_some() {
            tracing::trace!(capacity = ?other.channel_capacity, "Merging channel_capacity");
            self.channel_capacity = other.channel_capacity;
        }

        // Sink (with nested graphite)
        if let Some(sink) = other.sink {
            let current = self.sink.get_or_insert_with(SinkFileConfig::default);
            if sink.backend.is_some() {
                tracing::trace!(backend = ?sink.backend, "Merging sink.backend");
                current.backend = sink.backend;
            }

            if let Some(graphite) = sink.graphite {
                let current_graphite = current
                    .graphite
                    .get_or_insert_with(GraphiteFileConfig::default);
                if graphite.host.is_some() {
                    tracing::trace!(host = ?graphite.host, "Merging sink.graphite.host");
                    current_graphite.host = graphite.host;
                }
                if graphite.port.is_some() {
                    tracing::trace!(port = ?graphite.port, "Merging sink.graphite.port");
                    current_graphite.port = graphite.port;
                }
                if graphite.prefix.is_some() {
                    tracing::trace!(prefix = ?graphite.prefix, "Merging sink.graphite.prefix");
                    current_graphite.prefix = graphite.prefix;
                }
                if graphite.connect_timeout_secs.is_some() {
                    current_graphite.connect_timeout_secs = graphite.connect_timeout_secs;
                }
            }
        }
    }
}

// =============================================================================
// Runtime Config
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphiteConfig {
    pub host: String,
    pub port: u16,
    pub prefix: Option<String>,
    pub connect_timeout_secs: u64,
}

impl Default for GraphiteConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_GRAPHITE_HOST.to_string(),
            port: DEFAULT_GRAPHITE_PORT,
            prefix: None,
            connect_timeout_secs: DEFAULT_GRAPHITE_CONNECT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkConfig {
    pub backend: SinkBackend,
    pub graphite: GraphiteConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Regex patterns; a metric is delivered when any matches its full name
    pub allowed_metrics: Vec<String>,
    pub sink: SinkConfig,
    /// Reporting event input file, stdin when `None`
    pub input: Option<PathBuf>,
    pub channel_capacity: usize,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.metric-reporter/metric-reporter.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        Self::from_layers(file_config, cli)
    }

    /// Layer defaults -> file config -> CLI/env overrides, then validate
    fn from_layers(file_config: FileConfig, cli: &CliConfig) -> Result<Self> {
        let file_sink = file_config.sink.unwrap_or_default();
        let file_graphite = file_sink.graphite.unwrap_or_default();

        let allowed_metrics = cli
            .allowed_metrics
            .clone()
            .or(file_config.allowed_metrics)
            .unwrap_or_else(|| {
                DEFAULT_ALLOWED_METRICS
                    .iter()
                    .map(|p| p.to_string())
                    .collect()
            });

        let graphite = GraphiteConfig {
            host: cli
                .graphite_host
                .clone()
                .or(file_graphite.host)
                .unwrap_or_else(|| DEFAULT_GRAPHITE_HOST.to_string()),
            port: cli
                .graphite_port
                .or(file_graphite.port)
                .unwrap_or(DEFAULT_GRAPHITE_PORT),
            prefix: cli.graphite_prefix.clone().or(file_graphite.prefix),
            connect_timeout_secs: file_graphite
                .connect_timeout_secs
                .unwrap_or(DEFAULT_GRAPHITE_CONNECT_TIMEOUT_SECS),
        };

        let sink = SinkConfig {
            backend: cli.sink.or(file_sink.backend).unwrap_or_default(),
            graphite,
        };

        let input = cli
            .input
            .clone()
            .or_else(|| file_config.input.map(|p| expand_path(&p)));

        let config = Self {
            allowed_metrics,
            sink,
            input,
            channel_capacity: file_config
                .channel_capacity
                .unwrap_or(DEFAULT_CHANNEL_CAPACITY),
        };

        config.validate()?;
        tracing::debug!(
            sink = %config.sink.backend,
            patterns = config.allowed_metrics.len(),
            input = ?config.input,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.channel_capacity == 0 {
            anyhow::bail!("Configuration error: channel_capacity must be greater than 0");
        }

        if self.sink.backend == SinkBackend::Graphite {
            if self.sink.graphite.host.trim().is_empty() {
                anyhow::bail!("Configuration error: sink.graphite.host must not be empty");
            }
            if self.sink.graphite.port == 0 {
                anyhow::bail!("Configuration error: sink.graphite.port must be greater than 0");
            }
            if self.sink.graphite.connect_timeout_secs == 0 {
                anyhow::bail!(
                    "Configuration error: sink.graphite.connect_timeout_secs must be greater than 0"
                );
            }
        }

        if self.allowed_metrics.is_empty() {
            tracing::warn!("allowed_metrics is empty: no metrics will be delivered");
        }

        Ok(())
    }
}

/// Get the profile config path (~/.metric-reporter/metric-reporter.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}
