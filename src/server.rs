//! Tracing setup and the long-running commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use darkscan_api::{ApiServer, AppState, InterfaceConfig};
use darkscan_config::{Config, ConfigLoader, LoggingConfig};
use darkscan_core::{Page, PageNode, ScanSession};
use darkscan_protocols::{ActivationSource, AggregateReport, ScanMode, StaticActivation};
use darkscan_runloop::{Scheduler, SchedulerConfig};

use crate::register::build_engine;

/// Initialize tracing with console and file output.
///
/// Console output goes to stderr so `scan` can print its report on stdout.
/// The file layer rotates daily under `logging.directory`.
pub(crate) fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let log_dir = PathBuf::from(ConfigLoader::expand_path(&logging.directory));
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("darkscan")
        .filename_suffix("log")
        .max_log_files(logging.max_files)
        .build(&log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keeps the writer flushing until exit.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(true),
        )
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Read a page description from disk.
pub(crate) fn read_page(path: &Path) -> Result<Page> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading page {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing page {}", path.display()))
}

fn blank_page() -> Page {
    Page {
        viewport: Default::default(),
        root: PageNode::element("body").into(),
    }
}

/// One pass over a page file.
pub(crate) async fn run_scan(
    config: &Config,
    page: &Path,
    mode: ScanMode,
    wait: bool,
) -> Result<AggregateReport> {
    if !config.activation.enabled {
        return Err(anyhow!("detection is deactivated in the configuration"));
    }
    let engine = build_engine(config)?;
    let session = Arc::new(ScanSession::from_page(&read_page(page)?)?);
    let scheduler = Scheduler::new(session, engine.diff, SchedulerConfig::from(&config.engine));

    scheduler
        .scan(mode, wait)
        .await
        .ok_or_else(|| anyhow!("a scan is already in progress"))
}

/// Run the scheduler and the host query interface until Ctrl+C.
pub(crate) async fn run_server(config: Config, page: Option<PathBuf>) -> Result<()> {
    info!("Starting darkscan v{}", env!("CARGO_PKG_VERSION"));

    let engine = build_engine(&config)?;
    let page = match page {
        Some(path) => read_page(&path)?,
        None => blank_page(),
    };
    let session = Arc::new(ScanSession::from_page(&page)?);
    let scheduler = Arc::new(Scheduler::new(
        session,
        engine.diff,
        SchedulerConfig::from(&config.engine),
    ));
    let activation: Arc<dyn ActivationSource> =
        Arc::new(StaticActivation::new(config.activation.enabled));

    let mut state = AppState::new(scheduler.clone(), activation.clone());
    if let Some(remote) = engine.remote {
        state = state.with_feedback_sink(remote);
    }

    let cancel = CancellationToken::new();
    let scheduler_task = tokio::spawn({
        let scheduler = scheduler.clone();
        let cancel = cancel.clone();
        async move {
            if scheduler.start(activation.as_ref()).await.is_none() {
                return;
            }
            if let Err(e) = scheduler.run(cancel).await {
                error!(error = %e, "Scheduler stopped");
            }
        }
    });

    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl+C");
                return;
            }
            info!("Received Ctrl+C, shutting down...");
            cancel.cancel();
        }
    });

    let server = ApiServer::new(InterfaceConfig::from(&config.server), Arc::new(state));
    let served = server.run(cancel.clone()).await;
    cancel.cancel();
    let _ = scheduler_task.await;

    served.map_err(|e| anyhow!(e))?;
    info!("darkscan stopped");
    Ok(())
}
