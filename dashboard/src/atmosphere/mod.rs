//! Types for surfacing atmospheric data.
//!
//! [`openmeteo`] fetches current conditions and history over HTTP;
//! [`FakeSource`] serves fixed data for tests and demos.

use airq::{IndexError, Readings, Sample};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

pub mod openmeteo;
pub mod openweather;

/// Current conditions at the configured location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conditions {
    /// Time at which the data was acquired.
    pub timestamp: DateTime<Utc>,

    /// Temperature in degrees Celsius.
    pub temperature: f64,

    /// Relative humidity as a percentage (i.e. range 0.0 to 100.0).
    pub relative_humidity: f64,

    /// US AQI, rounded to an integer.
    pub aqi: f64,
}

impl Conditions {
    pub fn readings(&self) -> Readings {
        Readings {
            temperature: self.temperature,
            humidity: self.relative_humidity,
            aqi: self.aqi,
        }
    }
}

/// Raw history for the reporting window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    /// Reporting days, ascending. Every daily series has one entry per day.
    pub days: Vec<NaiveDate>,

    /// Daily maximum temperature; `None` where the archive has no value.
    pub max_temperature: Vec<Option<f64>>,

    /// Hourly relative humidity, local time.
    pub humidity: Vec<Sample>,

    /// Hourly PM2.5 in µg/m³, UTC. `None` when no pollution history is
    /// available.
    pub pm25: Option<Vec<Sample>>,
}

/// An error fetching or interpreting upstream data.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing field in response: {0}")]
    MissingField(&'static str),

    #[error("{field} has {actual} values for {expected} timestamps")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid timestamp {value:?}")]
    Timestamp { value: String },

    #[error("no index for concentration: {0}")]
    Index(#[from] IndexError),
}

/// A type that can get conditions at the configured location.
pub trait AtmosphereSource {
    /// Latest conditions.
    fn current(&self) -> Result<Conditions, FetchError>;

    /// History covering `start..=end`.
    fn history(&self, start: NaiveDate, end: NaiveDate) -> Result<History, FetchError>;
}

/// Fake source: repeatedly provides the indicated data.
#[derive(Debug, Clone, Default)]
pub struct FakeSource {
    pub conditions: Conditions,
    pub history: History,
}

impl Default for Conditions {
    fn default() -> Self {
        Self {
            timestamp: DateTime::<Utc>::default(),
            temperature: 0.0,
            relative_humidity: 0.0,
            aqi: 0.0,
        }
    }
}

impl AtmosphereSource for FakeSource {
    fn current(&self) -> Result<Conditions, FetchError> {
        Ok(self.conditions)
    }

    fn history(&self, _start: NaiveDate, _end: NaiveDate) -> Result<History, FetchError> {
        Ok(self.history.clone())
    }
}

/// Parse an upstream wall-clock timestamp, e.g. `2024-01-01T13:00`.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, FetchError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| FetchError::Timestamp {
            value: value.to_string(),
        })
}

/// Pair timestamps with values, skipping null values.
pub(crate) fn samples(
    field: &'static str,
    times: &[String],
    values: &[Option<f64>],
) -> Result<Vec<Sample>, FetchError> {
    if times.len() != values.len() {
        return Err(FetchError::LengthMismatch {
            field,
            expected: times.len(),
            actual: values.len(),
        });
    }
    let mut out = Vec::with_capacity(times.len());
    for (time, value) in times.iter().zip(values) {
        if let Some(value) = value {
            out.push(Sample::new(parse_timestamp(time)?, *value));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minute_and_second_timestamps() {
        let a = parse_timestamp("2024-01-01T13:00").unwrap();
        let b = parse_timestamp("2024-01-01T13:00:00").unwrap();
        assert_eq!(a, b);
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(FetchError::Timestamp { .. })
        ));
    }

    #[test]
    fn samples_skip_nulls() {
        let times = vec!["2024-01-01T00:00".to_string(), "2024-01-01T01:00".to_string()];
        let out = samples("humidity", &times, &[None, Some(55.0)]).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value, 55.0);
    }

    #[test]
    fn samples_reject_ragged_arrays() {
        let times = vec!["2024-01-01T00:00".to_string()];
        let err = samples("humidity", &times, &[]).unwrap_err();
        assert!(matches!(
            err,
            FetchError::LengthMismatch {
                expected: 1,
                actual: 0,
                ..
            }
        ));
    }
}
