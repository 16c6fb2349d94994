//! Recorded upstream responses, through to the status face and the chart.

use std::fs;

use chrono::NaiveDate;
use dashboard::atmosphere::openmeteo::{
    conditions_from, history_from, AirQualityResponse, DailyArchiveResponse, ForecastResponse,
    HourlyArchiveResponse,
};
use dashboard::atmosphere::openweather::PollutionResponse;
use dashboard::atmosphere::{FakeSource, History};
use dashboard::face::{self, Framebuffer};
use dashboard::report::{BannerStyle, TrendReport};
use dashboard::settings::Settings;
use dashboard::{chart, Dashboard};

use airq::Band;
use serde::de::DeserializeOwned;

fn fixture<T: DeserializeOwned>(name: &str) -> T {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    let body = fs::read_to_string(&path).unwrap();
    serde_json::from_str(&body).unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

fn history() -> History {
    let daily: DailyArchiveResponse = fixture("archive_daily.json");
    let hourly: HourlyArchiveResponse = fixture("archive_hourly.json");
    let pollution: PollutionResponse = fixture("pollution.json");
    let mut history = history_from(daily, &hourly).unwrap();
    history.pm25 = Some(pollution.pm25_samples().unwrap());
    history
}

#[test]
fn archive_to_trend() {
    let trend = TrendReport::new(&history());
    assert_eq!(trend.days, vec![day(1), day(2), day(3)]);
    assert_eq!(trend.max_temperature, vec![Some(31.2), None, Some(33.0)]);
    // The null hour on the 2nd is skipped, not counted as zero.
    assert_eq!(trend.mean_humidity, vec![75.0, 60.0, 55.0]);
    // Mean 12.0 µg/m³, then 41.0, then no samples.
    assert_eq!(trend.mean_aqi, vec![50.0, 115.0, 0.0]);
}

#[test]
fn trend_without_pollution_is_zero() {
    let mut history = history();
    history.pm25 = None;
    let trend = TrendReport::new(&history);
    assert_eq!(trend.mean_aqi, vec![0.0; 3]);
}

#[test]
fn current_conditions_raise_every_alert() {
    let forecast: ForecastResponse = fixture("forecast.json");
    let air: AirQualityResponse = fixture("air_quality.json");
    let conditions = conditions_from(&forecast, &air).unwrap();
    // No us_aqi in the response; computed from pm2_5.
    assert_eq!(conditions.aqi, 115.0);

    let source = FakeSource {
        conditions,
        history: History::default(),
    };
    let mut dash = Dashboard::new(Settings::default(), source, Framebuffer::default());
    let report = dash.refresh().unwrap();

    let labels: Vec<&str> = report.widgets.iter().map(|w| w.label.as_str()).collect();
    assert_eq!(labels, ["Hot", "Humid", "Unhealthy"]);
    assert!(report.widgets.iter().all(|w| w.band == Band::High));

    let styles: Vec<BannerStyle> = report.banners.iter().map(|b| b.style).collect();
    assert_eq!(
        styles,
        [BannerStyle::Danger, BannerStyle::Warning, BannerStyle::Danger]
    );
    assert!(dash.panel().count(face::POOR) > 0);
    assert_eq!(dash.panel().count(face::GOOD), 0);
}

#[test]
fn chart_written_to_configured_path() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.history_days = 2;
    settings.chart.path = dir.path().join("week.svg");

    let source = FakeSource {
        conditions: Default::default(),
        history: history(),
    };
    let dash = Dashboard::new(settings, source, Framebuffer::default());
    let trend = dash.render_trend(day(3)).unwrap();
    assert_eq!(trend.len(), 3);

    let svg = fs::read_to_string(dir.path().join("week.svg")).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains(chart::TEMPERATURE_LABEL));
    assert!(svg.contains("2024-05-01"));
}

#[test]
fn empty_history_writes_no_chart() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = Settings::default();
    settings.chart.path = dir.path().join("week.svg");

    let source = FakeSource {
        conditions: Default::default(),
        history: History::default(),
    };
    let dash = Dashboard::new(settings, source, Framebuffer::default());
    assert!(dash.render_trend(day(8)).is_err());
    assert!(!dir.path().join("week.svg").exists());
}
