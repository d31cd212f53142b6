//! # Good Surf Core Library
//!
//! This library provides the data structures and the evaluation pipeline for the
//! good-surf notifier. Once per run it pulls an hourly marine forecast for each
//! configured surf spot, decides hour by hour whether conditions are clean, and
//! summarises the days that hold a long enough run of clean hours.
//!
//! ## Data Flow
//! 1. **Fetch**: [`forecast::ForecastClient`] requests six fields per hour, each
//!    reported by several forecast models
//! 2. **Evaluate**: [`evaluate`] collapses the model readings into one value per
//!    field and derives per-hour suitability flags
//! 3. **Scan**: [`evaluate::good_windows`] finds the first qualifying run of hours
//!    on every calendar day
//! 4. **Compose**: [`message`] renders one section per spot
//! 5. **Deliver**: [`notify::Notifier`] pushes the message to every device
//!
//! Nothing is cached between runs. Every timestamp is normalised to the single
//! reference timezone carried by [`config::Config`].
//!
//! ## Core Types
//! - [`Location`]: a named surf spot and its offshore wind bearing
//! - [`Field`]: one of the forecast quantities requested from the provider
//! - [`Readings`]: per-model values of one field at one hour
//! - [`Sample`]: one forecast hour with readings for every field

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// Module declarations
pub mod aggregate;
pub mod config;
pub mod evaluate;
pub mod forecast;
pub mod message;
pub mod notify;
pub mod survey;

use evaluate::EvaluateError;

/// A surf spot.
///
/// `offshore_direction` is the compass bearing (0-359) perpendicular to the
/// shore pointing out to sea; wind blowing that way grooms the incoming swell.
///
/// # Example
/// ```
/// use good_surf::Location;
///
/// let sandy = Location::new("Sandy", -38.83, 146.118, 33);
/// assert_eq!(sandy.offshore_direction, 33);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Name shown in the notification header
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Offshore wind bearing in degrees
    pub offshore_direction: u16,
}

impl Location {
    pub fn new(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        offshore_direction: u16,
    ) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            offshore_direction,
        }
    }
}

/// How several model readings of one field collapse into a single value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aggregation {
    /// Vector mean of compass bearings, see [`aggregate::circular_mean`]
    Circular,
    /// Plain arithmetic mean, see [`aggregate::mean`]
    Arithmetic,
}

/// Forecast quantities requested from the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    SwellHeight,
    SwellDirection,
    WaveDirection,
    SwellPeriod,
    WindDirection,
    WindSpeed,
}

impl Field {
    /// Every requested field, in request order.
    pub const ALL: [Field; 6] = [
        Field::SwellHeight,
        Field::SwellDirection,
        Field::WaveDirection,
        Field::SwellPeriod,
        Field::WindDirection,
        Field::WindSpeed,
    ];

    /// Parameter name used by the forecast provider.
    pub fn api_name(self) -> &'static str {
        match self {
            Field::SwellHeight => "swellHeight",
            Field::SwellDirection => "swellDirection",
            Field::WaveDirection => "waveDirection",
            Field::SwellPeriod => "swellPeriod",
            Field::WindDirection => "windDirection",
            Field::WindSpeed => "windSpeed",
        }
    }

    pub fn aggregation(self) -> Aggregation {
        match self {
            Field::SwellDirection | Field::WaveDirection | Field::WindDirection => {
                Aggregation::Circular
            }
            Field::SwellHeight | Field::SwellPeriod | Field::WindSpeed => Aggregation::Arithmetic,
        }
    }

    /// Comma separated list for the provider's `params` query argument.
    ///
    /// ```
    /// assert_eq!(
    ///     good_surf::Field::query_list(),
    ///     "swellHeight,swellDirection,waveDirection,swellPeriod,windDirection,windSpeed"
    /// );
    /// ```
    pub fn query_list() -> String {
        Self::ALL
            .iter()
            .map(|field| field.api_name())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

/// Readings of one field at one hour, keyed by forecast model (`"noaa"`, `"sg"`, ...).
///
/// Serialised exactly like the provider's JSON object, so a `Readings` can be
/// deserialised straight out of a forecast hour.
///
/// ```
/// use good_surf::Readings;
///
/// let readings: Readings = serde_json::from_str(r#"{"noaa": 1.2, "sg": 1.4}"#).unwrap();
/// assert_eq!(readings.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Readings(BTreeMap<String, f64>);

impl Readings {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self(pairs.into_iter().map(|(source, value)| (source.into(), value)).collect())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.values().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One forecast hour, timestamped in the reference timezone.
#[derive(Clone, Debug, Serialize)]
pub struct Sample {
    pub time: DateTime<Tz>,
    pub swell_height: Readings,
    pub swell_direction: Readings,
    pub wave_direction: Readings,
    pub swell_period: Readings,
    pub wind_direction: Readings,
    pub wind_speed: Readings,
}

impl Sample {
    /// An hour with no readings at all; fill fields with [`Sample::with`].
    pub fn empty(time: DateTime<Tz>) -> Self {
        Self {
            time,
            swell_height: Readings::default(),
            swell_direction: Readings::default(),
            wave_direction: Readings::default(),
            swell_period: Readings::default(),
            wind_direction: Readings::default(),
            wind_speed: Readings::default(),
        }
    }

    pub fn with(mut self, field: Field, readings: Readings) -> Self {
        *self.readings_mut(field) = readings;
        self
    }

    pub fn readings(&self, field: Field) -> &Readings {
        match field {
            Field::SwellHeight => &self.swell_height,
            Field::SwellDirection => &self.swell_direction,
            Field::WaveDirection => &self.wave_direction,
            Field::SwellPeriod => &self.swell_period,
            Field::WindDirection => &self.wind_direction,
            Field::WindSpeed => &self.wind_speed,
        }
    }

    fn readings_mut(&mut self, field: Field) -> &mut Readings {
        match field {
            Field::SwellHeight => &mut self.swell_height,
            Field::SwellDirection => &mut self.swell_direction,
            Field::WaveDirection => &mut self.wave_direction,
            Field::SwellPeriod => &mut self.swell_period,
            Field::WindDirection => &mut self.wind_direction,
            Field::WindSpeed => &mut self.wind_speed,
        }
    }

    /// Collapse the readings of `field` into one representative value.
    ///
    /// Directions use the circular mean (rounded to whole degrees), magnitudes
    /// the arithmetic mean. A field without readings is reported as
    /// [`EvaluateError::MissingReading`].
    pub fn aggregate(&self, field: Field) -> Result<f64, EvaluateError> {
        let readings = self.readings(field);
        let value = match field.aggregation() {
            Aggregation::Circular => aggregate::circular_mean(readings.values()),
            Aggregation::Arithmetic => aggregate::mean(readings.values()),
        };
        value.ok_or_else(|| EvaluateError::MissingReading {
            field,
            time: self.time.with_timezone(&Utc),
        })
    }
}
