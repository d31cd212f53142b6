//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the good-surf.toml file.
//! It provides a centralized way to configure surf spots, evaluation thresholds,
//! the reference timezone, and the forecast and notification endpoints.
//!
//! Secrets never live in the file; they are read from the process environment.

use crate::evaluate::Thresholds;
use crate::Location;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "good-surf.toml";

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "GOOD_SURF_CONFIG";

pub const FORECAST_KEY_ENV: &str = "STORMGLASS_KEY";
pub const NOTIFY_TOKEN_ENV: &str = "PUSHOVER_TOKEN";
pub const NOTIFY_USER_ENV: &str = "PUSHOVER_USER";

/// Configuration problems detected at startup.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration loaded from good-surf.toml
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// IANA zone used for every date/time computation (e.g. "Australia/Melbourne")
    pub timezone: Tz,
    pub thresholds: Thresholds,
    pub forecast: ForecastConfig,
    pub notify: NotifyConfig,
    /// Surf spots, reported in this order
    pub locations: Vec<Location>,
}

/// Forecast provider endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForecastConfig {
    pub url: String,
}

/// Push notification endpoint and targets
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifyConfig {
    pub url: String,
    /// Notification title
    pub title: String,
    /// Device identifiers, notified in order
    pub devices: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timezone: chrono_tz::Australia::Melbourne,
            thresholds: Thresholds::default(),
            forecast: ForecastConfig {
                url: "https://api.stormglass.io/v2/weather/point".to_string(),
            },
            notify: NotifyConfig {
                url: "https://api.pushover.net/1/messages.json".to_string(),
                title: "Clean Surf Conditions".to_string(),
                devices: vec!["iphonexs".to_string(), "pixel6a".to_string()],
            },
            locations: vec![
                Location::new("13th Beach", -38.2889164, 144.4708001, 10),
                Location::new("Sandy", -38.83, 146.118, 33),
            ],
        }
    }
}

impl Config {
    /// Load configuration from `$GOOD_SURF_CONFIG` or good-surf.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        match env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load_from_path(path),
            Err(_) => Self::load_from_path(CONFIG_FILE),
        }
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.display(),
                        locations = config.locations.len(),
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), "Invalid config file format: {e}");
                    warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "No config file found, using default configuration");
                Self::default()
            }
        }
    }

    /// Check the values a TOML file could get wrong.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        if t.end_hour > 24 {
            return Err(ConfigError::Invalid(format!(
                "end_hour {} is past the end of the day",
                t.end_hour
            )));
        }
        if t.start_hour >= t.end_hour {
            return Err(ConfigError::Invalid(format!(
                "start_hour {} must be before end_hour {}",
                t.start_hour, t.end_hour
            )));
        }
        if t.min_good_hours == 0 {
            return Err(ConfigError::Invalid("min_good_hours must be at least 1".into()));
        }
        if t.wind_range > 360 {
            return Err(ConfigError::Invalid(format!(
                "wind_range {} exceeds a full circle",
                t.wind_range
            )));
        }
        if self.locations.is_empty() {
            return Err(ConfigError::Invalid("no locations configured".into()));
        }
        for location in &self.locations {
            if location.offshore_direction >= 360 {
                return Err(ConfigError::Invalid(format!(
                    "{}: offshore_direction {} is not a compass bearing",
                    location.name, location.offshore_direction
                )));
            }
            if !(-90.0..=90.0).contains(&location.latitude)
                || !(-180.0..=180.0).contains(&location.longitude)
            {
                return Err(ConfigError::Invalid(format!(
                    "{}: coordinates ({}, {}) out of range",
                    location.name, location.latitude, location.longitude
                )));
            }
        }
        Ok(())
    }
}

/// Read a required secret from the environment.
pub fn secret(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnv(name)),
    }
}
