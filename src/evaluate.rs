//! # Surf Condition Evaluation
//!
//! Turns forecast samples into per-hour suitability flags and scans each day
//! for a run of clean hours.
//!
//! ## Per-hour flags
//! - **wind direction**: the aggregated wind bearing lies inside a window of
//!   `wind_range` degrees centred on the spot's offshore bearing
//! - **wind speed**: the aggregated wind speed is below `min_wind_speed`; light
//!   wind is fine from any direction
//! - **swell height**: the aggregated swell height exceeds `min_swell_height`
//! - **ok**: (direction OR speed) AND swell height
//!
//! ## Daily scan
//! Only hours in `[start_hour, end_hour)` count. On every calendar day the
//! first run of `min_good_hours` consecutive samples that are all ok becomes
//! that day's [`GoodWindow`]; later runs on the same day are not considered.

use crate::aggregate::{mean, round_to};
use crate::{Field, Location, Sample};
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while evaluating forecast samples.
#[derive(Error, Debug, PartialEq)]
pub enum EvaluateError {
    /// The forecast hour carried no readings for a field the evaluation needs
    #[error("malformed forecast data: no {field} readings at {time}")]
    MissingReading { field: Field, time: DateTime<Utc> },
}

/// How the wind direction window is matched against a bearing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionWindow {
    /// Plain integer range `[centre - width/2, centre + width/2)`.
    ///
    /// The range does not wrap, so a spot whose offshore bearing sits near
    /// north rejects bearings on the far side of 0°/360°.
    #[default]
    Linear,
    /// Same half-open window measured around the compass.
    Circular,
}

impl DirectionWindow {
    pub fn contains(self, centre: u16, width: u16, bearing: u16) -> bool {
        let half = i32::from(width / 2);
        let low = i32::from(centre) - half;
        let bearing = i32::from(bearing);
        match self {
            DirectionWindow::Linear => (low..low + 2 * half).contains(&bearing),
            DirectionWindow::Circular => (bearing - low).rem_euclid(360) < 2 * half,
        }
    }
}

/// Thresholds that decide whether an hour is surfable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Total width in degrees of the accepted offshore wind window
    pub wind_range: u16,
    /// Reserved; not used by the evaluation
    pub swell_range: u16,
    /// Wind speed (m/s) below which direction does not matter
    pub min_wind_speed: f64,
    /// Swell height (m) that must be exceeded
    pub min_swell_height: f64,
    /// Consecutive ok hours needed for a good window
    pub min_good_hours: usize,
    /// First hour of day considered (inclusive)
    pub start_hour: u32,
    /// Last hour of day considered (exclusive)
    pub end_hour: u32,
    #[serde(default)]
    pub direction_window: DirectionWindow,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            wind_range: 100,
            swell_range: 100,
            min_wind_speed: 1.5,
            min_swell_height: 1.0,
            min_good_hours: 3,
            start_hour: 6,
            end_hour: 19,
            direction_window: DirectionWindow::Linear,
        }
    }
}

/// Suitability flags for one hour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags {
    pub wind_direction_ok: bool,
    pub wind_speed_ok: bool,
    pub swell_height_ok: bool,
    /// Gate for inclusion in a good window
    pub ok: bool,
}

impl Flags {
    pub fn new(wind_direction_ok: bool, wind_speed_ok: bool, swell_height_ok: bool) -> Self {
        Self {
            wind_direction_ok,
            wind_speed_ok,
            swell_height_ok,
            ok: (wind_direction_ok || wind_speed_ok) && swell_height_ok,
        }
    }

    /// Offshore wind or barely any wind.
    pub fn wind_ok(&self) -> bool {
        self.wind_direction_ok || self.wind_speed_ok
    }
}

/// Aggregated values and flags of one forecast hour.
#[derive(Clone, Debug, PartialEq)]
pub struct HourlyEvaluation {
    pub time: DateTime<Tz>,
    /// Circular mean of the model wind bearings, whole degrees
    pub wind_direction: u16,
    pub wind_speed: f64,
    pub swell_height: f64,
    pub flags: Flags,
}

/// The first qualifying run of hours on one day.
#[derive(Clone, Debug, PartialEq)]
pub struct GoodWindow {
    pub date: NaiveDate,
    /// First hour of the run
    pub start: DateTime<Tz>,
    /// Mean swell height over the run in metres, one decimal
    pub swell_height: f64,
}

/// Evaluate a single forecast hour for `location`.
pub fn evaluate_hour(
    sample: &Sample,
    location: &Location,
    thresholds: &Thresholds,
) -> Result<HourlyEvaluation, EvaluateError> {
    // circular_mean yields whole degrees in [0, 360)
    let wind_direction = sample.aggregate(Field::WindDirection)? as u16;
    let wind_speed = sample.aggregate(Field::WindSpeed)?;
    let swell_height = sample.aggregate(Field::SwellHeight)?;

    let flags = Flags::new(
        thresholds.direction_window.contains(
            location.offshore_direction,
            thresholds.wind_range,
            wind_direction,
        ),
        wind_speed < thresholds.min_wind_speed,
        swell_height > thresholds.min_swell_height,
    );

    Ok(HourlyEvaluation {
        time: sample.time,
        wind_direction,
        wind_speed,
        swell_height,
        flags,
    })
}

/// Evaluate every sample, failing on the first malformed hour.
pub fn evaluate(
    samples: &[Sample],
    location: &Location,
    thresholds: &Thresholds,
) -> Result<Vec<HourlyEvaluation>, EvaluateError> {
    samples
        .iter()
        .map(|sample| evaluate_hour(sample, location, thresholds))
        .collect()
}

/// Find at most one good window per calendar day, earliest day first.
///
/// Hours are grouped by their date in the reference timezone and restricted to
/// `[start_hour, end_hour)`. Days without hours in that interval are skipped.
pub fn good_windows(hours: &[HourlyEvaluation], thresholds: &Thresholds) -> Vec<GoodWindow> {
    let run = thresholds.min_good_hours.max(1);

    let mut days: BTreeMap<NaiveDate, Vec<&HourlyEvaluation>> = BTreeMap::new();
    for hour in hours {
        let hour_of_day = hour.time.hour();
        if hour_of_day >= thresholds.start_hour && hour_of_day < thresholds.end_hour {
            days.entry(hour.time.date_naive()).or_default().push(hour);
        }
    }

    days.into_iter()
        .filter_map(|(date, mut day)| {
            day.sort_by_key(|hour| hour.time);
            let window = day
                .windows(run)
                .find(|window| window.iter().all(|hour| hour.flags.ok))?;

            let heights = window.iter().map(|hour| round_to(hour.swell_height, 2));
            let swell_height = round_to(mean(heights)?, 1);
            Some(GoodWindow {
                date,
                start: window[0].time,
                swell_height,
            })
        })
        .collect()
}
