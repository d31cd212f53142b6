//! # Spot Survey
//!
//! Runs the fetch → evaluate → scan pipeline for every configured spot, one at
//! a time and in configured order. A spot whose forecast cannot be fetched or
//! evaluated is reported as unavailable; the remaining spots still run.

use crate::config::Config;
use crate::evaluate::{evaluate, good_windows};
use crate::forecast::ForecastClient;
use crate::message::{compose, readable_date, LocationReport, Outcome};
use chrono::DateTime;
use chrono_tz::Tz;
use tracing::{error, info};

/// Survey every spot, starting the forecast at `now`.
///
/// `now` must already be expressed in the configured reference timezone.
pub async fn survey(
    config: &Config,
    client: &ForecastClient,
    now: DateTime<Tz>,
) -> Vec<LocationReport> {
    let mut reports = Vec::with_capacity(config.locations.len());

    for location in &config.locations {
        let outcome = match client.fetch(location, now).await {
            Err(e) => {
                error!(location = %location.name, "Forecast fetch failed: {e}");
                Outcome::Unavailable(e.to_string())
            }
            Ok(samples) => match evaluate(&samples, location, &config.thresholds) {
                Err(e) => {
                    error!(location = %location.name, "{e}");
                    Outcome::Unavailable(e.to_string())
                }
                Ok(hours) => {
                    let windows = good_windows(&hours, &config.thresholds);
                    for window in &windows {
                        info!(
                            location = %location.name,
                            day = %readable_date(window.date),
                            from = %window.start.format("%H:%M"),
                            swell_m = window.swell_height,
                            "Good window"
                        );
                    }
                    Outcome::Windows(windows)
                }
            },
        };

        reports.push(LocationReport {
            name: location.name.clone(),
            outcome,
        });
    }

    reports
}

/// Survey every spot and render the notification body.
pub async fn report_message(config: &Config, client: &ForecastClient, now: DateTime<Tz>) -> String {
    let reports = survey(config, client, now).await;
    compose(&reports, now.date_naive())
}
