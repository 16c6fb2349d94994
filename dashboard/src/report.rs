//! What the dashboard shows, independent of how it is drawn.

use airq::alerts::{evaluate, ALL_CLEAR};
use airq::series::round_tenths;
use airq::{convert_to_index, AlertRule, Band, DailyGroups, Metric, Readings, Severity};
use chrono::NaiveDate;

use crate::atmosphere::History;
use crate::settings::Scales;

/// Shown in place of the widgets when a refresh fails.
pub const LOAD_ERROR: &str = "Error loading data. Please try again.";

/// Current value of one metric with its classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub metric: Metric,
    /// The displayed value; classification uses this, not the raw reading.
    pub value: f64,
    pub band: Band,
    pub label: String,
}

impl Widget {
    pub fn new(metric: Metric, raw: f64, scales: &Scales) -> Self {
        let value = match metric {
            Metric::AirQuality => raw.round(),
            Metric::Temperature | Metric::Humidity => round_tenths(raw),
        };
        let classification = scales.get(metric).classify(value);
        Self {
            metric,
            value,
            band: classification.band,
            label: classification.label.to_string(),
        }
    }

    /// The value as displayed, without unit.
    pub fn display_value(&self) -> String {
        match self.metric {
            Metric::AirQuality => format!("{:.0}", self.value),
            Metric::Temperature | Metric::Humidity => format!("{:.1}", self.value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerStyle {
    Info,
    Warning,
    Danger,
}

impl From<Severity> for BannerStyle {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Warning => BannerStyle::Warning,
            Severity::Danger => BannerStyle::Danger,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub message: String,
    pub style: BannerStyle,
}

/// Status widgets plus alert banners for one refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub widgets: Vec<Widget>,
    pub banners: Vec<Banner>,
}

impl StatusReport {
    pub fn new(readings: &Readings, scales: &Scales, rules: &[AlertRule]) -> Self {
        let widgets = Metric::ALL
            .iter()
            .map(|m| Widget::new(*m, readings.get(*m), scales))
            .collect();
        let mut banners: Vec<Banner> = evaluate(readings, rules)
            .into_iter()
            .map(|alert| Banner {
                message: alert.message,
                style: alert.severity.into(),
            })
            .collect();
        if banners.is_empty() {
            banners.push(Banner {
                message: ALL_CLEAR.to_string(),
                style: BannerStyle::Info,
            });
        }
        Self { widgets, banners }
    }

    /// Nothing to show but the load error.
    pub fn failed() -> Self {
        Self {
            widgets: Vec::new(),
            banners: vec![Banner {
                message: LOAD_ERROR.to_string(),
                style: BannerStyle::Danger,
            }],
        }
    }

    pub fn is_failed(&self) -> bool {
        self.widgets.is_empty()
    }
}

/// Daily series for the trend chart, one entry per day.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendReport {
    pub days: Vec<NaiveDate>,
    pub max_temperature: Vec<Option<f64>>,
    pub mean_humidity: Vec<f64>,
    pub mean_aqi: Vec<f64>,
}

impl TrendReport {
    pub fn new(history: &History) -> Self {
        let days = history.days.clone();
        let mean_humidity = airq::aggregate_daily(&history.humidity, &days, 0.0);
        let mean_aqi = match &history.pm25 {
            Some(pm25) => DailyGroups::new(pm25).reduce(&days, 0.0, |mean| {
                convert_to_index(mean).map(f64::from).unwrap_or_else(|e| {
                    tracing::warn!("dropping daily PM2.5 mean: {e}");
                    0.0
                })
            }),
            None => vec![0.0; days.len()],
        };
        Self {
            days,
            max_temperature: history.max_temperature.clone(),
            mean_humidity,
            mean_aqi,
        }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
