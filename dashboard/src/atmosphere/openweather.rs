//! PM2.5 history from the OpenWeather
//! [air pollution API](https://openweathermap.org/api/air-pollution).
//!
//! `/data/2.5/air_pollution/history?lat&lon&start&end&appid` returns
//! `.list[]`, hourly entries with `.dt` (unix seconds) and
//! `.components.pm2_5` (µg/m³). Needs an API key.
//!
//! Samples are keyed by the UTC date of `dt`; unlike the Open-Meteo series
//! there is no local time to use.

use airq::Sample;
use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::blocking::Client;
use serde::Deserialize;

use super::FetchError;
use crate::settings::Location;

#[derive(Debug, Clone, Deserialize)]
pub struct PollutionResponse {
    #[serde(default)]
    pub list: Vec<PollutionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollutionEntry {
    pub dt: i64,
    pub components: Components,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Components {
    pub pm2_5: f64,
}

impl PollutionResponse {
    pub fn pm25_samples(&self) -> Result<Vec<Sample>, FetchError> {
        self.list
            .iter()
            .map(|entry| {
                let timestamp = DateTime::from_timestamp(entry.dt, 0).ok_or_else(|| {
                    FetchError::Timestamp {
                        value: entry.dt.to_string(),
                    }
                })?;
                Ok(Sample::new(timestamp.naive_utc(), entry.components.pm2_5))
            })
            .collect()
    }
}

pub struct OpenWeather {
    client: Client,
    location: Location,
    endpoint: String,
    api_key: String,
}

impl OpenWeather {
    pub fn new(client: Client, location: Location, endpoint: &str, api_key: &str) -> Self {
        Self {
            client,
            location,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Hourly PM2.5 from the start of `start` to the end of `end`, UTC.
    pub fn pm25_history(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Sample>, FetchError> {
        let start = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let end = end
            .succ_opt()
            .unwrap_or(end)
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp();
        // Keep the key out of the logs.
        tracing::debug!("GET {} start={start} end={end}", self.endpoint);
        let body = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("lat", self.location.latitude.to_string()),
                ("lon", self.location.longitude.to_string()),
                ("start", start.to_string()),
                ("end", end.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()?
            .error_for_status()?
            .text()?;
        let response: PollutionResponse = serde_json::from_str(&body)?;
        response.pm25_samples()
    }
}
