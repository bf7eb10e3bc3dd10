//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tokio::sync::mpsc;

use crate::core::cli::{self, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{ENV_LOG, LOG_TARGET};
use crate::core::shutdown::ShutdownService;
use crate::data::source::spawn_reader;
use crate::data::types::DataPoint;
use crate::data::{MetricFilter, MetricMatcher, SinkService};
use crate::domain::MetricsPipeline;
use crate::domain::metrics::{extract_metrics, sanitize_fragment};

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub filter: Arc<MetricMatcher>,
    pub sink: Arc<SinkService>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let config = AppConfig::load(&cli_config)?;
        let filter = Self::init_filter(&config)?;

        match command {
            Some(Commands::CheckName {
                component,
                observations,
            }) => {
                Self::check_names(filter.as_ref(), &component, &observations);
                Ok(())
            }
            Some(Commands::Run) | None => {
                let app = Self::init(config, filter)?;
                Self::start(app).await
            }
        }
    }

    fn init(config: AppConfig, filter: Arc<MetricMatcher>) -> Result<Self> {
        let sink = Arc::new(
            SinkService::new(&config.sink)
                .map_err(|e| anyhow::anyhow!("Failed to initialize metric sink: {}", e))?,
        );
        tracing::debug!(backend = sink.backend_name(), "Sink initialized");

        Ok(Self {
            shutdown: ShutdownService::new(),
            config,
            filter,
            sink,
        })
    }

    fn init_filter(config: &AppConfig) -> Result<Arc<MetricMatcher>> {
        let matcher = MetricMatcher::new(&config.allowed_metrics)
            .context("Failed to compile allowed_metrics")?;
        Ok(Arc::new(matcher))
    }

    /// Print the metric name each observation produces and whether it is allowed
    fn check_names(filter: &dyn MetricFilter, component: &str, observations: &[String]) {
        let component = sanitize_fragment(component);
        for observation in observations {
            // Name a plain number under this observation would get
            for metric in extract_metrics(&DataPoint::new(observation.as_str(), 0.0), &component)
            {
                let name = metric.metric_name();
                let status = if filter.is_allowed(&name) {
                    "allowed"
                } else {
                    "denied"
                };
                println!("{}\t{}", name, status);
            }
        }
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", LOG_TARGET);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        let (tx, rx) = mpsc::channel(app.config.channel_capacity);

        let reader_handle = match &app.config.input {
            Some(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("Failed to open input: {}", path.display()))?;
                tracing::info!(input = %path.display(), "Reading reporting events");
                spawn_reader(BufReader::new(file), tx, app.shutdown.subscribe())
            }
            None => {
                tracing::info!("Reading reporting events from stdin");
                spawn_reader(
                    BufReader::new(tokio::io::stdin()),
                    tx,
                    app.shutdown.subscribe(),
                )
            }
        };

        let pipeline = MetricsPipeline::new(app.filter.clone(), app.sink.clone());
        let mut pipeline_handle = pipeline.start(rx, app.shutdown.subscribe());
        tracing::info!(
            sink = app.sink.backend_name(),
            patterns = app.filter.len(),
            "Metric reporter started"
        );

        // Input exhausted or shutdown requested, whichever comes first
        let finished = tokio::select! {
            result = &mut pipeline_handle => {
                if let Err(e) = result {
                    tracing::error!(error = %e, "Metrics pipeline task failed");
                }
                true
            }
            _ = app.shutdown.wait() => false,
        };

        if !finished {
            app.shutdown.register(pipeline_handle).await;
        }
        app.shutdown.register(reader_handle).await;
        app.shutdown.shutdown().await;

        tracing::info!("Metric reporter stopped");
        Ok(())
    }
}
