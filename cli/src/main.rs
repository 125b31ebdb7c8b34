//! CLI entrypoint for triage-bot
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use triage_application::{
    MinutesLogger, NoMinutesLogger, SessionRegistry, TriageController, idle_timeout,
};
use triage_infrastructure::{
    ConfigLoader, FileConfigStore, JsonlMinutesLogger, RedmineIssueTracker,
};
use triage_presentation::{ChannelRepl, Cli, ConsoleTransport};

/// How often idle sessions are looked for.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let _log_guard = init_logging(cli.verbose);

    info!("Starting triage-bot");

    // === Configuration ===
    let file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let issues = file_config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("config: {}", issue);
        }
        bail!("Invalid configuration ({} issue(s))", issues.len());
    }

    // === Dependency Injection ===
    let tracker = Arc::new(RedmineIssueTracker::new(
        &file_config.redmine.url,
        file_config.redmine.api_key.clone(),
        Duration::from_secs(file_config.redmine.timeout_secs),
    )?);
    info!("Using Redmine at {}", tracker.base_url());

    let minutes_dir = cli
        .minutes_dir
        .clone()
        .or_else(|| file_config.minutes.resolved_dir());
    let minutes: Arc<dyn MinutesLogger> =
        match minutes_dir.as_ref().and_then(|dir| JsonlMinutesLogger::new(dir)) {
            Some(logger) => {
                info!("Writing minutes to {}", logger.dir().display());
                Arc::new(logger)
            }
            None => Arc::new(NoMinutesLogger),
        };

    let config = Arc::new(FileConfigStore::new(file_config));
    let registry = Arc::new(SessionRegistry::new());

    let shutdown = CancellationToken::new();
    let max_idle = idle_timeout(config.as_ref());
    let sweeper = if max_idle.is_zero() {
        warn!("session.idle_timeout_secs is 0, idle sessions are never dropped");
        None
    } else {
        Some(
            Arc::clone(&registry).spawn_idle_sweeper(max_idle, SWEEP_INTERVAL, shutdown.clone()),
        )
    };

    let controller = Arc::new(
        TriageController::new(tracker, Arc::new(ConsoleTransport::new()), config.clone())
            .with_minutes_logger(minutes)
            .with_registry(registry),
    );

    let mut repl = ChannelRepl::new(
        controller,
        config,
        cli.network.clone(),
        cli.channel.clone(),
        cli.resolved_nick(),
    );
    repl.run().await?;

    shutdown.cancel();
    if let Some(sweeper) = sweeper {
        let _ = sweeper.await;
    }

    Ok(())
}

/// Install the tracing subscriber: stderr at the `-v` level, plus a daily
/// rolling file at info level when the log directory is usable.
fn init_logging(verbose: u8) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(level));

    let (file_layer, guard) = match ConfigLoader::log_dir()
        .filter(|dir| std::fs::create_dir_all(dir).is_ok())
    {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "triage-bot.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new("info"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}
