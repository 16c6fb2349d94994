//! Get atmospheric data from [Open-Meteo](https://open-meteo.com/en/docs).
//!
//! Three services are involved, none of which need a key:
//!
//! - `/v1/forecast?current=temperature_2m,relative_humidity_2m` for current
//!   weather
//! - `/v1/air-quality?current=us_aqi,pm2_5` for current air quality; `us_aqi`
//!   is already an index, `pm2_5` is the raw concentration
//! - `/v1/archive` for history: `daily=temperature_2m_max` and
//!   `hourly=relative_humidity_2m`
//!
//! All requests pass `timezone=auto`, so timestamps come back as naive
//! wall-clock strings (`2024-01-01T13:00`) in the location's own zone.

use airq::convert_to_index;
use chrono::{NaiveDate, Utc};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::openweather::OpenWeather;
use super::{samples, AtmosphereSource, Conditions, FetchError, History};
use crate::settings::{Endpoints, Location, Settings};

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub current: ForecastCurrent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastCurrent {
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirQualityResponse {
    pub current: AirQualityCurrent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirQualityCurrent {
    #[serde(default)]
    pub us_aqi: Option<f64>,
    #[serde(default)]
    pub pm2_5: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyArchiveResponse {
    pub daily: DailyArchive,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyArchive {
    pub time: Vec<NaiveDate>,
    pub temperature_2m_max: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HourlyArchiveResponse {
    pub hourly: HourlyArchive,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HourlyArchive {
    pub time: Vec<String>,
    pub relative_humidity_2m: Vec<Option<f64>>,
}

/// The current AQI: the reported index if there is one, otherwise computed
/// from the PM2.5 concentration.
pub fn current_aqi(air: &AirQualityCurrent) -> Result<f64, FetchError> {
    match (air.us_aqi, air.pm2_5) {
        (Some(aqi), _) => Ok(aqi.round()),
        (None, Some(pm25)) => Ok(convert_to_index(pm25)?.into()),
        (None, None) => Err(FetchError::MissingField("current.us_aqi")),
    }
}

/// Combine the forecast and air quality responses.
pub fn conditions_from(
    forecast: &ForecastResponse,
    air: &AirQualityResponse,
) -> Result<Conditions, FetchError> {
    Ok(Conditions {
        timestamp: Utc::now(),
        temperature: forecast.current.temperature_2m,
        relative_humidity: forecast.current.relative_humidity_2m,
        aqi: current_aqi(&air.current)?,
    })
}

/// Combine the two archive responses. `pm25` is left unset.
pub fn history_from(
    daily: DailyArchiveResponse,
    hourly: &HourlyArchiveResponse,
) -> Result<History, FetchError> {
    let DailyArchive {
        time: days,
        temperature_2m_max: max_temperature,
    } = daily.daily;
    if days.len() != max_temperature.len() {
        return Err(FetchError::LengthMismatch {
            field: "daily.temperature_2m_max",
            expected: days.len(),
            actual: max_temperature.len(),
        });
    }
    let humidity = samples(
        "hourly.relative_humidity_2m",
        &hourly.hourly.time,
        &hourly.hourly.relative_humidity_2m,
    )?;
    Ok(History {
        days,
        max_temperature,
        humidity,
        pm25: None,
    })
}

/// Open-Meteo client, optionally backed by OpenWeather for PM2.5 history.
pub struct OpenMeteo {
    client: Client,
    location: Location,
    endpoints: Endpoints,
    pollution: Option<OpenWeather>,
}

impl OpenMeteo {
    pub fn new(client: Client, location: Location, endpoints: Endpoints) -> Self {
        Self {
            client,
            location,
            endpoints,
            pollution: None,
        }
    }

    /// Use `pollution` for historical PM2.5.
    pub fn with_pollution(mut self, pollution: OpenWeather) -> Self {
        self.pollution = Some(pollution);
        self
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(settings.timeout()).build()?;
        let mut source = Self::new(
            client.clone(),
            settings.location,
            settings.endpoints.clone(),
        );
        match settings.api_key() {
            Some(key) => {
                source = source.with_pollution(OpenWeather::new(
                    client,
                    settings.location,
                    &settings.endpoints.pollution_history,
                    key,
                ))
            }
            None => tracing::info!("no OpenWeather API key; historical AQI will be zero"),
        }
        Ok(source)
    }

    fn get<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T, FetchError> {
        let mut params = vec![
            ("latitude", self.location.latitude.to_string()),
            ("longitude", self.location.longitude.to_string()),
            ("timezone", "auto".to_string()),
        ];
        params.extend(query.iter().map(|(k, v)| (*k, v.clone())));
        tracing::debug!("GET {url} {params:?}");
        let body = self
            .client
            .get(url)
            .query(&params)
            .send()?
            .error_for_status()?
            .text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl AtmosphereSource for OpenMeteo {
    fn current(&self) -> Result<Conditions, FetchError> {
        let forecast: ForecastResponse = self.get(
            &self.endpoints.forecast,
            &[("current", "temperature_2m,relative_humidity_2m".to_string())],
        )?;
        let air: AirQualityResponse = self.get(
            &self.endpoints.air_quality,
            &[
                ("current", "us_aqi,pm2_5".to_string()),
                ("domains", "auto".to_string()),
            ],
        )?;
        conditions_from(&forecast, &air)
    }

    fn history(&self, start: NaiveDate, end: NaiveDate) -> Result<History, FetchError> {
        let window = [
            ("start_date", start.format("%Y-%m-%d").to_string()),
            ("end_date", end.format("%Y-%m-%d").to_string()),
        ];
        let with = |series: (&'static str, &'static str)| {
            let mut q = window.to_vec();
            q.push((series.0, series.1.to_string()));
            q
        };
        let daily: DailyArchiveResponse =
            self.get(&self.endpoints.archive, &with(("daily", "temperature_2m_max")))?;
        let hourly: HourlyArchiveResponse =
            self.get(&self.endpoints.archive, &with(("hourly", "relative_humidity_2m")))?;
        let mut history = history_from(daily, &hourly)?;

        if let Some(pollution) = &self.pollution {
            // A failed pollution lookup only blanks the AQI series.
            match pollution.pm25_history(start, end) {
                Ok(pm25) => history.pm25 = Some(pm25),
                Err(e) => tracing::warn!("could not fetch PM2.5 history: {e}"),
            }
        }
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_aqi_prefers_reported_index() {
        let air = AirQualityCurrent {
            us_aqi: Some(57.4),
            pm2_5: Some(100.0),
        };
        assert_eq!(current_aqi(&air).unwrap(), 57.0);
    }

    #[test]
    fn current_aqi_falls_back_to_concentration() {
        let air = AirQualityCurrent {
            us_aqi: None,
            pm2_5: Some(41.0),
        };
        assert_eq!(current_aqi(&air).unwrap(), 115.0);
    }

    #[test]
    fn current_aqi_needs_something() {
        let air = AirQualityCurrent {
            us_aqi: None,
            pm2_5: None,
        };
        assert!(matches!(
            current_aqi(&air),
            Err(FetchError::MissingField(_))
        ));
    }

    #[test]
    fn parses_current_responses() {
        let forecast: ForecastResponse = serde_json::from_str(
            r#"{"latitude":5.6,"longitude":-0.19,"current_units":{"temperature_2m":"°C"},
                "current":{"time":"2024-05-01T14:00","interval":900,
                "temperature_2m":31.26,"relative_humidity_2m":74}}"#,
        )
        .unwrap();
        let air: AirQualityResponse =
            serde_json::from_str(r#"{"current":{"time":"2024-05-01T14:00","us_aqi":88}}"#).unwrap();
        let conditions = conditions_from(&forecast, &air).unwrap();
        assert_eq!(conditions.temperature, 31.26);
        assert_eq!(conditions.relative_humidity, 74.0);
        assert_eq!(conditions.aqi, 88.0);
    }

    #[test]
    fn history_rejects_ragged_daily_series() {
        let daily: DailyArchiveResponse = serde_json::from_str(
            r#"{"daily":{"time":["2024-05-01","2024-05-02"],"temperature_2m_max":[31.0]}}"#,
        )
        .unwrap();
        let hourly: HourlyArchiveResponse =
            serde_json::from_str(r#"{"hourly":{"time":[],"relative_humidity_2m":[]}}"#).unwrap();
        assert!(matches!(
            history_from(daily, &hourly),
            Err(FetchError::LengthMismatch { .. })
        ));
    }
}
