//! vaned — the weathervane daemon.
//!
//! On a fixed interval, fetches current temperature and humidity for a
//! configured ZIP code from OpenWeather and forwards two gauge series to
//! Datadog. SIGINT or SIGTERM stops the loop cleanly.
//!
//! # Usage
//!
//! ```text
//! OPENWEATHER_API_KEY=... DATADOG_API_KEY=... DATADOG_APP_KEY=... \
//! ZIP_CODE=02134 vaned --interval 15
//! ```
//!
//! Configuration errors, an unreadable env file, and rejected Datadog
//! credentials exit with status 1 before the loop starts; per-cycle fetch
//! or submit failures are logged and never fatal.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info, warn};

use vane_core::{Config, SubmitError};
use vane_datadog::DatadogClient;
use vane_openweather::OpenWeatherClient;
use vane_poller::Poller;

mod sink;

/// Weather-to-Datadog polling agent.
#[derive(Parser)]
#[command(name = "vaned", about = "Weather-to-Datadog polling agent", version)]
struct Cli {
    /// Seconds between poll cycles.
    #[arg(long, default_value = "15", value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,

    /// KEY=VALUE file consulted for variables missing from the environment.
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Override the OpenWeather endpoint (for testing).
    #[arg(long, value_name = "URL")]
    weather_url: Option<String>,

    /// Override the Datadog endpoint (for testing, or the EU site).
    #[arg(long, value_name = "URL")]
    datadog_url: Option<String>,

    /// Fetch and log readings without submitting any metrics.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    run(cli).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    info!("weathervane {} starting", env!("CARGO_PKG_VERSION"));

    let config = match Config::load(cli.env_file.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "configuration error");
            return Err(e.into());
        }
    };
    info!(zip = %config.zip_code, interval_secs = cli.interval, "configuration loaded");

    let mut weather = OpenWeatherClient::new(&config.openweather_api_key);
    if let Some(url) = &cli.weather_url {
        weather = weather.with_base_url(url);
    }

    let mut datadog = DatadogClient::new(&config.datadog_api_key, &config.datadog_app_key);
    if let Some(url) = &cli.datadog_url {
        datadog = datadog.with_base_url(url);
    }

    // Credential rejection is a startup failure; a transport error here is
    // only a warning so a network blip at boot does not kill the service.
    if !cli.dry_run {
        match datadog.validate().await {
            Ok(()) => info!("datadog credentials validated"),
            Err(e @ SubmitError::Unauthorized(_)) => {
                error!(error = %e, "datadog initialization failed");
                return Err(e.into());
            }
            Err(e) => warn!(error = %e, "datadog validation unreachable, continuing"),
        }
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let interval = Duration::from_secs(cli.interval);
    if cli.dry_run {
        info!("dry-run mode: metrics will not be submitted");
        Poller::new(weather, sink::DryRunSink, config.zip_code, interval)
            .run(shutdown_rx)
            .await;
    } else {
        Poller::new(weather, datadog, config.zip_code, interval)
            .run(shutdown_rx)
            .await;
    }

    info!("weathervane stopped");
    Ok(())
}

/// Resolves on SIGINT or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut term = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => {}
            _ = term.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
    }
}
