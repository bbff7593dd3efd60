/*
[INPUT]:  CLI arguments, YAML configuration file, NANO_L1_* environment, OS shutdown signals
[OUTPUT]: Live dashboard (terminal UI or headless log summaries) with graceful shutdown
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use nano_l1_dashboard::headless::run_headless;
use nano_l1_dashboard::tui::{LOG_BUFFER_CAPACITY, LogBuffer, LogBufferHandle, LogWriterFactory, run_tui};
use nano_l1_dashboard::{DashboardConfig, DashboardSession};

#[derive(Parser, Debug)]
#[command(name = "nano-l1-dashboard", version, about = "Live top-of-book, trade tape and P&L dashboard")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: Option<PathBuf>,
    /// Overrides the configured feed endpoint
    #[arg(long = "ws-url", value_name = "URL")]
    ws_url: Option<String>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Log periodic summaries instead of drawing the terminal UI
    #[arg(long = "headless")]
    headless: bool,
    /// Print the effective configuration as YAML and exit
    #[arg(long = "print-config")]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let config = DashboardConfig::load(args.config_path.as_deref())
        .context("load config")?
        .with_endpoint(args.ws_url.clone())
        .context("apply --ws-url")?;

    if args.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    let log_buffer = (!args.headless && args.log_file.is_none())
        .then(|| LogBuffer::handle(LOG_BUFFER_CAPACITY));
    let _log_guard = init_tracing(&args.log_level, args.log_file.as_deref(), log_buffer.clone())?;

    info!(
        endpoint = %config.endpoint,
        headless = args.headless,
        reconnect = config.reconnect.enabled,
        "starting nano-l1-dashboard"
    );

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    let session = DashboardSession::new(config.endpoint.clone(), config.reconnect.clone());
    let snapshots = session.subscribe_snapshots();
    let status = session.subscribe_status();
    let feed_task = tokio::spawn(session.run(shutdown.clone()));

    let result = if args.headless {
        run_headless(
            snapshots,
            status,
            config.ui.report_interval(),
            shutdown.clone(),
        )
        .await;
        Ok(())
    } else {
        run_tui(
            config.endpoint.clone(),
            snapshots,
            status,
            log_buffer,
            config.ui.tick_interval(),
            shutdown.clone(),
        )
        .await
    };

    shutdown.cancel();
    feed_task.await.context("join feed task")?;
    info!("dashboard stopped");

    result
}

fn init_tracing(
    log_level: &str,
    log_file: Option<&Path>,
    log_buffer: Option<LogBufferHandle>,
) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;

    if let Some(path) = log_file {
        let directory = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = path
            .file_name()
            .context("log file path must name a file")?;
        let appender = tracing_appender::rolling::never(directory, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(writer)
            .try_init()
            .map_err(|err| anyhow!(err))
            .context("initialize tracing subscriber")?;
        return Ok(Some(guard));
    }

    match log_buffer {
        Some(buffer) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(LogWriterFactory::new(buffer))
            .try_init(),
        None => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    }
    .map_err(|err| anyhow!(err))
    .context("initialize tracing subscriber")?;
    Ok(None)
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
