use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::config::SinkBackend;
use super::constants::{
    APP_NAME, ENV_ALLOWED_METRICS, ENV_CONFIG, ENV_GRAPHITE_HOST, ENV_GRAPHITE_PORT,
    ENV_GRAPHITE_PREFIX, ENV_INPUT, ENV_SINK,
};

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(
    version,
    about = "Flattens nested cluster telemetry into dot-named metrics",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Newline-delimited JSON reporting events (stdin when omitted)
    #[arg(long, short = 'i', global = true, env = ENV_INPUT)]
    pub input: Option<PathBuf>,

    /// Allow-list pattern, full-match regex (repeatable; replaces configured list)
    #[arg(long = "allow", short = 'a', global = true, env = ENV_ALLOWED_METRICS)]
    pub allow: Vec<String>,

    /// Sink backend (log or graphite)
    #[arg(long, global = true, env = ENV_SINK, value_parser = parse_sink_backend)]
    pub sink: Option<SinkBackend>,

    /// Graphite host
    #[arg(long, global = true, env = ENV_GRAPHITE_HOST)]
    pub graphite_host: Option<String>,

    /// Graphite plaintext port
    #[arg(long, global = true, env = ENV_GRAPHITE_PORT)]
    pub graphite_port: Option<u16>,

    /// Prefix prepended to every Graphite metric name
    #[arg(long, global = true, env = ENV_GRAPHITE_PREFIX)]
    pub graphite_prefix: Option<String>,
}

/// Parse sink backend from CLI/env string
fn parse_sink_backend(s: &str) -> Result<SinkBackend, String> {
    match s.to_lowercase().as_str() {
        "log" => Ok(SinkBackend::Log),
        "graphite" => Ok(SinkBackend::Graphite),
        _ => Err(format!(
            "Invalid sink backend '{}'. Valid options: log, graphite",
            s
        )),
    }
}

#[derive(Subcommand, Clone, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Read reporting events and deliver metrics (default command)
    Run,
    /// Show the metric name built from a component and observation, and whether it is allowed
    CheckName {
        /// Component id
        component: String,
        /// Observation names
        #[arg(required = true)]
        observations: Vec<String>,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub input: Option<PathBuf>,
    /// `None` when no `--allow` was given, so file config applies
    pub allowed_metrics: Option<Vec<String>>,
    pub sink: Option<SinkBackend>,
    pub graphite_host: Option<String>,
    pub graphite_port: Option<u16>,
    pub graphite_prefix: Option<String>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            config: cli.config,
            input: cli.input,
            allowed_metrics: (!cli.allow.is_empty()).then_some(cli.allow),
            sink: cli.sink,
            graphite_host: cli.graphite_host,
            graphite_port: cli.graphite_port,
            graphite_prefix: cli.graphite_prefix,
        }
    }
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let mut cli = Cli::parse();
    let command = cli.command.take();
    (CliConfig::from(cli), command)
}
