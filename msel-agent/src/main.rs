//! Prediction agent (msel-agent) - Main entry point
//!
//! Polls the classifier feed, keeps the best-performing model active and
//! rewrites the prediction file every cycle until stopped.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use msel_agent::{Agent, AgentConfig, JsonFileFeed, Roster};
use msel_common::{AgentEvent, EventLog};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for msel-agent
#[derive(Parser, Debug)]
#[command(name = "msel-agent")]
#[command(about = "Model-selecting prediction agent")]
#[command(version)]
struct Args {
    /// Feed document with the latest classifier predictions
    #[arg(long, default_value = "data.json", env = "MSEL_DATA_FILE")]
    data: PathBuf,

    /// Configuration document (JSON, or TOML with a .toml extension)
    #[arg(long, default_value = "config.json", env = "MSEL_CONFIG_FILE")]
    config: PathBuf,

    /// Report file, overwritten every cycle
    #[arg(long, default_value = "predictions.txt", env = "MSEL_OUTPUT_FILE")]
    output: PathBuf,

    /// Event log, truncated at startup
    #[arg(long, default_value = "agent.log", env = "MSEL_LOG_FILE")]
    log: PathBuf,

    /// Pause between cycles in milliseconds
    #[arg(long, default_value = "2000", env = "MSEL_INTERVAL_MS")]
    interval_ms: u64,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "msel_agent=info,msel_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting msel-agent v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let log = EventLog::create(&args.log)
        .with_context(|| format!("Failed to create event log {}", args.log.display()))?;
    log.record(&AgentEvent::AgentStarted {
        version: env!("CARGO_PKG_VERSION").to_string(),
    });

    let config = AgentConfig::load_or_default(&args.config, &Roster::default(), &log);
    info!(
        "Feed: {} | Output: {} | Auto-switching: {} | Initial model: {}",
        args.data.display(),
        args.output.display(),
        config.auto_switching,
        config.manual_model
    );

    let mut agent = Agent::new(JsonFileFeed::new(&args.data), &args.output, config, log)
        .with_interval(msel_common::time::millis_to_duration(args.interval_ms));

    if args.once {
        let outcome = agent.tick();
        info!("Single cycle finished: {:?}", outcome);
        return Ok(());
    }

    let state = agent.run(shutdown_signal()).await;
    info!("Agent stopped with active model {}", state.active_candidate);
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
