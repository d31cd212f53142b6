//! # Good Surf Application Entry Point
//!
//! This binary crate surveys every configured surf spot, builds the summary
//! message and pushes it to the configured devices. It supports both production
//! mode (push notification) and development mode (`--stdout`, message printed).


use anyhow::Context;
use chrono::Utc;
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

use good_surf::config::{self, Config};
use good_surf::forecast::ForecastClient;
use good_surf::notify::Notifier;
use good_surf::survey::report_message;

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Development mode: print the message instead of notifying
    let development_mode = env::args().any(|arg| arg == "--stdout");

    let config = Config::load();
    config.validate().context("refusing to run with invalid configuration")?;

    let forecast_key = config::secret(config::FORECAST_KEY_ENV)?;
    let client = ForecastClient::new(&config.forecast.url, forecast_key);

    // Create Tokio runtime for the HTTP calls; spots are still surveyed one by one
    let rt = tokio::runtime::Runtime::new()?;

    let now = Utc::now().with_timezone(&config.timezone);
    info!(timezone = %config.timezone, now = %now, "Surveying {} spots", config.locations.len());
    let message = rt.block_on(report_message(&config, &client, now));

    if development_mode {
        println!("{message}");
        return Ok(());
    }

    let notifier = Notifier::new(
        &config.notify.url,
        config::secret(config::NOTIFY_TOKEN_ENV)?,
        config::secret(config::NOTIFY_USER_ENV)?,
        &config.notify.title,
    );

    // broadcast logs a rejected delivery itself; the run still completes
    if let Ok(sent) = rt.block_on(notifier.broadcast(&config.notify.devices, &message)) {
        info!(devices = sent, "Notification delivered\n{message}");
    }

    Ok(())
}
