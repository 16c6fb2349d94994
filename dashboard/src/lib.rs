//! A weather and air quality dashboard for one location.
//!
//! Shows current temperature, humidity and AQI as status widgets with alert
//! banners, refreshed on a timer, and writes a chart of the last week.
//!
//! # Building
//! The `simulator` feature shows the status face in a window; it requires
//! SDL2, per [embedded-graphics-simulator](https://crates.io/crates/embedded-graphics-simulator).
//!
use std::convert::Infallible;

pub mod atmosphere;
pub mod chart;
pub mod context;
pub mod face;
pub mod report;
pub mod settings;

#[cfg(feature = "simulator")]
pub mod simulator;

use atmosphere::{AtmosphereSource, FetchError};
use chart::ChartError;
use chrono::{Days, NaiveDate};
use context::Context;
use embedded_graphics_core::{draw_target::DrawTarget, pixelcolor::Rgb888};
use face::{draw_status, Framebuffer};
use report::{BannerStyle, StatusReport, TrendReport};
use settings::Settings;
use thiserror::Error;

/// A Panel is where the status face is shown.
pub trait Panel {
    type Target: DrawTarget<Color = Rgb888, Error = Infallible>;

    /// Access the underlying drawable of this panel.
    fn face(&mut self) -> &mut Self::Target;

    /// Show the most recently drawn face.
    fn flush(&mut self) -> Result<(), String>;
}

/// Headless: the face is drawn but only the log shows it.
impl Panel for Framebuffer {
    type Target = Self;

    fn face(&mut self) -> &mut Self::Target {
        self
    }

    fn flush(&mut self) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("fetching history: {0}")]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error("panel: {0}")]
    Panel(String),
}

pub struct Dashboard<S, P> {
    settings: Settings,
    source: S,
    panel: P,
}

impl<S, P> Dashboard<S, P>
where
    S: AtmosphereSource,
    P: Panel,
{
    pub fn new(settings: Settings, source: S, panel: P) -> Self {
        Self {
            settings,
            source,
            panel,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Fetch current conditions, then draw and show the status face.
    ///
    /// A failed fetch is shown on the face and is not an error here; only a
    /// panel failure is.
    pub fn refresh(&mut self) -> Result<StatusReport, Error> {
        let report = match self.source.current() {
            Ok(conditions) => {
                tracing::info!(
                    temperature = conditions.temperature,
                    humidity = conditions.relative_humidity,
                    aqi = conditions.aqi,
                    "current conditions"
                );
                StatusReport::new(
                    &conditions.readings(),
                    &self.settings.scales,
                    &self.settings.alerts,
                )
            }
            Err(e) => {
                tracing::error!("error fetching current conditions: {e}");
                StatusReport::failed()
            }
        };

        for widget in &report.widgets {
            tracing::info!(
                "{}: {}{} ({}, {})",
                widget.metric.name(),
                widget.display_value(),
                widget.metric.unit(),
                widget.label,
                widget.band.status()
            );
        }
        for banner in &report.banners {
            match banner.style {
                BannerStyle::Info => tracing::info!("{}", banner.message),
                BannerStyle::Warning | BannerStyle::Danger => tracing::warn!("{}", banner.message),
            }
        }

        if let Err(e) = draw_status(&report, self.panel.face()) {
            match e {}
        }
        self.panel.flush().map_err(Error::Panel)?;
        Ok(report)
    }

    /// Fetch history for the window ending `today` and reduce it to daily
    /// series.
    pub fn trend(&self, today: NaiveDate) -> Result<TrendReport, Error> {
        let start = today
            .checked_sub_days(Days::new(self.settings.history_days.into()))
            .unwrap_or(today);
        tracing::info!("fetching history {start}..={today}");
        let history = self.source.history(start, today)?;
        Ok(TrendReport::new(&history))
    }

    /// Fetch history and write the chart to the configured path.
    pub fn render_trend(&self, today: NaiveDate) -> Result<TrendReport, Error> {
        let trend = self.trend(today)?;
        let out = &self.settings.chart;
        chart::render_to_file(&trend, &out.path, (out.width, out.height))?;
        tracing::info!("wrote history chart to {}", out.path.display());
        Ok(trend)
    }

    /// Chart history once, then refresh current conditions every refresh
    /// period until the context is cancelled.
    pub fn run(&mut self, ctx: &Context) {
        let today = chrono::Local::now().date_naive();
        if let Err(e) = self.render_trend(today) {
            tracing::error!("error rendering history: {e}");
        }

        let period = self.settings.refresh_period();
        ctx.every(period, || {
            if let Err(e) = self.refresh() {
                tracing::error!("{e}; stopping");
                ctx.cancel();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atmosphere::{Conditions, FakeSource, History};

    struct Broken;

    impl AtmosphereSource for Broken {
        fn current(&self) -> Result<Conditions, FetchError> {
            Err(FetchError::MissingField("current"))
        }

        fn history(&self, _: NaiveDate, _: NaiveDate) -> Result<History, FetchError> {
            Err(FetchError::MissingField("daily"))
        }
    }

    struct Closed(Framebuffer);

    impl Panel for Closed {
        type Target = Framebuffer;

        fn face(&mut self) -> &mut Framebuffer {
            &mut self.0
        }

        fn flush(&mut self) -> Result<(), String> {
            Err("window closed".to_string())
        }
    }

    fn hot_day() -> FakeSource {
        FakeSource {
            conditions: Conditions {
                temperature: 36.0,
                relative_humidity: 50.0,
                aqi: 12.0,
                ..Default::default()
            },
            history: History::default(),
        }
    }

    #[test]
    fn refresh_draws_report() {
        let mut dash = Dashboard::new(Settings::default(), hot_day(), Framebuffer::default());
        let report = dash.refresh().unwrap();
        assert_eq!(report.widgets[0].label, "Hot");
        assert_eq!(report.banners.len(), 1);
        assert!(dash.panel().count(face::POOR) > 0);
    }

    #[test]
    fn failed_fetch_is_shown_not_returned() {
        let mut dash = Dashboard::new(Settings::default(), Broken, Framebuffer::default());
        let report = dash.refresh().unwrap();
        assert!(report.is_failed());
    }

    #[test]
    fn failed_history_is_an_error() {
        let dash = Dashboard::new(Settings::default(), Broken, Framebuffer::default());
        let today = NaiveDate::from_ymd_opt(2024, 5, 8).unwrap();
        assert!(matches!(dash.trend(today), Err(Error::Fetch(_))));
    }

    #[test]
    fn run_stops_when_panel_closes() {
        let mut settings = Settings::default();
        settings.chart.path = std::env::temp_dir().join("airwatch-run-test.svg");
        let mut dash = Dashboard::new(settings, hot_day(), Closed(Framebuffer::default()));
        let ctx = Context::new();
        dash.run(&ctx);
        assert!(ctx.is_cancelled());
    }
}
