//! # Marine Forecast Fetching
//!
//! This module handles the network side of obtaining hourly marine forecasts
//! from the Stormglass point API and converting the response into typed
//! [`Sample`]s.
//!
//! ## Data Source
//!
//! ### Stormglass point forecast
//! - **URL**: https://api.stormglass.io/v2/weather/point (configurable)
//! - **Auth**: API key in the `Authorization` header
//! - **Query**: `params` (field list), `start` (epoch seconds), `lat`, `lng`
//! - **Format**: JSON, one object per forecast hour
//!
//! ```json
//! {
//!   "hours": [
//!     {
//!       "time": "2024-05-06T08:00:00+00:00",
//!       "swellHeight": { "icon": 1.21, "noaa": 1.35, "sg": 1.21 },
//!       "windDirection": { "icon": 12.5, "noaa": 8.1, "sg": 12.5 },
//!       ...
//!     }
//!   ],
//!   "meta": { ... }
//! }
//! ```
//!
//! ## Error Handling
//!
//! A response is only parsed when the provider answered with a success status.
//! Anything else becomes [`ForecastError::Status`] carrying the error body for
//! the log, so an error payload is never mistaken for forecast data.

use crate::{Location, Readings, Sample};
use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while fetching or decoding a forecast.
#[derive(Error, Debug)]
pub enum ForecastError {
    /// HTTP request failed (network, DNS, TLS or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("forecast request rejected with status {status}: {body}")]
    Status { status: u16, body: String },

    /// Body did not match the expected forecast shape
    #[error("malformed forecast data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Forecast response envelope; `meta` and friends are ignored.
#[derive(Deserialize)]
struct ForecastResponse {
    hours: Vec<ForecastHour>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastHour {
    time: DateTime<FixedOffset>,
    #[serde(default)]
    swell_height: Readings,
    #[serde(default)]
    swell_direction: Readings,
    #[serde(default)]
    wave_direction: Readings,
    #[serde(default)]
    swell_period: Readings,
    #[serde(default)]
    wind_direction: Readings,
    #[serde(default)]
    wind_speed: Readings,
}

impl ForecastHour {
    fn into_sample(self, tz: &Tz) -> Sample {
        Sample {
            time: self.time.with_timezone(tz),
            swell_height: self.swell_height,
            swell_direction: self.swell_direction,
            wave_direction: self.wave_direction,
            swell_period: self.swell_period,
            wind_direction: self.wind_direction,
            wind_speed: self.wind_speed,
        }
    }
}

/// Client for the forecast provider.
pub struct ForecastClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl ForecastClient {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    /// Fetch hourly samples for `location`, starting at `start`.
    ///
    /// Sample timestamps are converted into the timezone of `start`.
    pub async fn fetch(
        &self,
        location: &Location,
        start: DateTime<Tz>,
    ) -> Result<Vec<Sample>, ForecastError> {
        debug!(location = %location.name, start = %start, "Requesting forecast");

        let response = self
            .http
            .get(&self.url)
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .query(&[
                ("params", crate::Field::query_list()),
                ("start", start.timestamp().to_string()),
                ("lat", location.latitude.to_string()),
                ("lng", location.longitude.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ForecastError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let body = response.text().await?;

        let samples = parse_forecast(&body, &start.timezone())?;
        info!(location = %location.name, hours = samples.len(), "Retrieved forecast");
        Ok(samples)
    }
}

/// Decode a forecast body into samples ordered by time, in timezone `tz`.
pub fn parse_forecast(body: &str, tz: &Tz) -> Result<Vec<Sample>, ForecastError> {
    let response: ForecastResponse = serde_json::from_str(body)?;
    let mut samples: Vec<Sample> = response
        .hours
        .into_iter()
        .map(|hour| hour.into_sample(tz))
        .collect();
    samples.sort_by_key(|sample| sample.time);
    Ok(samples)
}
