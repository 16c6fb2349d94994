//! Alert records derived from current readings.
//!
//! Evaluation is a pure function of readings and rules; whoever displays the
//! alerts owns clearing and replacing them between refreshes.

use serde::{Deserialize, Serialize};

/// Text shown when no alert fires.
pub const ALL_CLEAR: &str = "All conditions are safe.";

/// One of the displayed metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Temperature,
    Humidity,
    AirQuality,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Humidity, Metric::AirQuality];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
            Metric::AirQuality => "AQI",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Humidity => "%",
            Metric::AirQuality => "",
        }
    }
}

/// Current values of every metric.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Readings {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// US AQI.
    pub aqi: f64,
}

impl Readings {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.temperature,
            Metric::Humidity => self.humidity,
            Metric::AirQuality => self.aqi,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Danger,
}

/// Fires when `metric` is strictly above `above`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    pub metric: Metric,
    pub above: f64,
    pub message: String,
    pub severity: Severity,
}

impl AlertRule {
    pub fn new(metric: Metric, above: f64, message: &str, severity: Severity) -> Self {
        Self {
            metric,
            above,
            message: message.to_owned(),
            severity,
        }
    }

    pub fn fires(&self, readings: &Readings) -> bool {
        readings.get(self.metric) > self.above
    }
}

/// The stock rules: heat, humidity and poor air.
pub fn default_rules() -> Vec<AlertRule> {
    vec![
        AlertRule::new(
            Metric::Temperature,
            35.0,
            "High temperature alert: Stay hydrated!",
            Severity::Danger,
        ),
        AlertRule::new(
            Metric::Humidity,
            80.0,
            "High humidity alert: Risk of discomfort.",
            Severity::Warning,
        ),
        AlertRule::new(
            Metric::AirQuality,
            100.0,
            "Poor air quality alert: Limit outdoor activities.",
            Severity::Danger,
        ),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub condition: Metric,
    pub message: String,
    pub severity: Severity,
}

/// Alerts for every rule that fires, in rule order.
pub fn evaluate(readings: &Readings, rules: &[AlertRule]) -> Vec<Alert> {
    rules
        .iter()
        .filter(|rule| rule.fires(readings))
        .map(|rule| Alert {
            condition: rule.metric,
            message: rule.message.clone(),
            severity: rule.severity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calm_day_has_no_alerts() {
        let readings = Readings {
            temperature: 27.0,
            humidity: 60.0,
            aqi: 42.0,
        };
        assert!(evaluate(&readings, &default_rules()).is_empty());
    }

    #[test]
    fn limits_are_exclusive() {
        let readings = Readings {
            temperature: 35.0,
            humidity: 80.0,
            aqi: 100.0,
        };
        assert!(evaluate(&readings, &default_rules()).is_empty());
    }

    #[test]
    fn fires_in_rule_order() {
        let readings = Readings {
            temperature: 36.2,
            humidity: 60.0,
            aqi: 151.0,
        };
        let alerts = evaluate(&readings, &default_rules());
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].condition, Metric::Temperature);
        assert_eq!(alerts[0].severity, Severity::Danger);
        assert_eq!(alerts[1].condition, Metric::AirQuality);
        assert_eq!(
            alerts[1].message,
            "Poor air quality alert: Limit outdoor activities."
        );
    }

    #[test]
    fn humidity_is_a_warning() {
        let readings = Readings {
            humidity: 91.0,
            ..Default::default()
        };
        let alerts = evaluate(&readings, &default_rules());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, Severity::Warning);
    }
}
