//! Dashboard settings.
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, then `AIRWATCH_*` environment variables with `__` between
//! sections (e.g. `AIRWATCH_OPENWEATHER__API_KEY`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use airq::{alerts::default_rules, AlertRule, Metric, Scale};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub location: Location,
    pub endpoints: Endpoints,
    pub openweather: OpenWeatherSettings,
    /// Seconds between refreshes of current conditions.
    pub refresh_secs: u64,
    /// Days of history before today; the chart covers this many plus today.
    pub history_days: u32,
    /// Per-request HTTP timeout, in seconds.
    pub timeout_secs: u64,
    pub chart: ChartSettings,
    pub scales: Scales,
    pub alerts: Vec<AlertRule>,
}

/// The single location the dashboard reports on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    pub forecast: String,
    pub air_quality: String,
    pub archive: String,
    pub pollution_history: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenWeatherSettings {
    /// Without a key the historical AQI series is left at zero.
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSettings {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Classification scale for each displayed metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scales {
    pub temperature: Scale,
    pub humidity: Scale,
    pub air_quality: Scale,
}

impl Scales {
    pub fn get(&self, metric: Metric) -> &Scale {
        match metric {
            Metric::Temperature => &self.temperature,
            Metric::Humidity => &self.humidity,
            Metric::AirQuality => &self.air_quality,
        }
    }
}

impl Default for Scales {
    fn default() -> Self {
        Self {
            temperature: Scale::temperature(),
            humidity: Scale::humidity(),
            air_quality: Scale::air_quality(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            forecast: "https://api.open-meteo.com/v1/forecast".to_string(),
            air_quality: "https://air-quality-api.open-meteo.com/v1/air-quality".to_string(),
            archive: "https://archive-api.open-meteo.com/v1/archive".to_string(),
            pollution_history: "https://api.openweathermap.org/data/2.5/air_pollution/history"
                .to_string(),
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("history.svg"),
            width: 960,
            height: 480,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Accra
            location: Location {
                latitude: 5.6037,
                longitude: -0.187,
            },
            endpoints: Endpoints::default(),
            openweather: OpenWeatherSettings::default(),
            refresh_secs: 5 * 60,
            history_days: 7,
            timeout_secs: 30,
            chart: ChartSettings::default(),
            scales: Scales::default(),
            alerts: default_rules(),
        }
    }
}

impl Settings {
    /// Load settings, layering an optional file and the environment over the
    /// defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Settings::default())?);
        if let Some(path) = path {
            builder = builder.add_source(File::from(path.to_path_buf()));
        }
        builder = builder.add_source(
            Environment::with_prefix("AIRWATCH")
                .prefix_separator("_")
                .separator("__"),
        );
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_secs == 0 {
            return Err(ConfigError::Message("refresh_secs must be positive".into()));
        }
        for metric in Metric::ALL {
            let scale = self.scales.get(metric);
            if scale.low >= scale.high {
                return Err(ConfigError::Message(format!(
                    "{} scale: low threshold {} must be below high threshold {}",
                    metric.name(),
                    scale.low,
                    scale.high
                )));
            }
        }
        Ok(())
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The OpenWeather key, if one is usable.
    pub fn api_key(&self) -> Option<&str> {
        self.openweather
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_load_without_file() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.refresh_period(), Duration::from_secs(300));
        assert_eq!(settings.history_days, 7);
        assert_eq!(settings.alerts.len(), 3);
        assert_eq!(settings.scales, Scales::default());
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
refresh_secs = 60

[location]
latitude = 51.5
longitude = -0.12

[openweather]
api_key = "abc123"

[scales.humidity]
low = 30.0
high = 60.0
labels = ["Arid", "Fine", "Muggy"]
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.refresh_secs, 60);
        assert_eq!(settings.location.latitude, 51.5);
        assert_eq!(settings.api_key(), Some("abc123"));
        assert_eq!(settings.scales.humidity.classify(65.0).label, "Muggy");
        assert_eq!(settings.scales.temperature, Scale::temperature());
    }

    #[test]
    fn rejects_inverted_scale() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[scales.temperature]
low = 35.0
high = 20.0
labels = ["Cool", "Warm", "Hot"]
"#
        )
        .unwrap();
        assert!(Settings::load(Some(file.path())).is_err());
    }

    #[test]
    fn blank_api_key_is_unset() {
        let mut settings = Settings::default();
        settings.openweather.api_key = Some("  ".to_string());
        assert_eq!(settings.api_key(), None);
    }
}
