//! Historical trend chart.
//!
//! A line chart over the reporting days: maximum temperature against the
//! left axis; mean humidity and mean AQI share the right axis.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

use crate::report::TrendReport;

pub const TEMPERATURE_COLOR: RGBColor = RGBColor(255, 99, 132);
pub const HUMIDITY_COLOR: RGBColor = RGBColor(54, 162, 235);
pub const AQI_COLOR: RGBColor = RGBColor(153, 102, 255);

pub const TEMPERATURE_LABEL: &str = "Max Temperature (°C)";
pub const HUMIDITY_LABEL: &str = "Average Humidity (%)";
pub const AQI_LABEL: &str = "Average AQI";

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("no days to chart")]
    Empty,
    #[error("drawing chart: {0}")]
    Draw(String),
}

fn draw_err(e: impl std::fmt::Display) -> ChartError {
    ChartError::Draw(e.to_string())
}

/// Pad a value range so flat or empty series still get a visible axis.
fn axis_range(values: impl Iterator<Item = f64>, floor: Option<f64>) -> std::ops::Range<f64> {
    let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        (lo, hi) = (0.0, 1.0);
    }
    if let Some(floor) = floor {
        lo = lo.min(floor);
    }
    let pad = ((hi - lo) * 0.1).max(1.0);
    (lo - pad)..(hi + pad)
}

fn draw<DB: DrawingBackend>(
    report: &TrendReport,
    root: &DrawingArea<DB, Shift>,
) -> Result<(), ChartError> {
    if report.is_empty() {
        return Err(ChartError::Empty);
    }
    let last = report.len() as i32 - 1;
    let labels: Vec<String> = report
        .days
        .iter()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .collect();

    let left = axis_range(report.max_temperature.iter().flatten().copied(), None);
    let right = axis_range(
        report
            .mean_humidity
            .iter()
            .chain(report.mean_aqi.iter())
            .copied(),
        Some(0.0),
    );

    root.fill(&WHITE).map_err(draw_err)?;
    let mut chart = ChartBuilder::on(root)
        .caption("Last days", ("sans-serif", 20))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .right_y_label_area_size(50)
        .build_cartesian_2d(0..last.max(1), left)
        .map_err(draw_err)?
        .set_secondary_coord(0..last.max(1), right);

    chart
        .configure_mesh()
        .x_labels(report.len())
        .x_label_formatter(&|i| {
            usize::try_from(*i)
                .ok()
                .and_then(|i| labels.get(i).cloned())
                .unwrap_or_default()
        })
        .y_desc("°C")
        .draw()
        .map_err(draw_err)?;
    chart
        .configure_secondary_axes()
        .y_desc("% / AQI")
        .draw()
        .map_err(draw_err)?;

    // Days without a maximum temperature leave a gap rather than a zero.
    let mut segment = Vec::new();
    let mut segments = Vec::new();
    for (i, t) in report.max_temperature.iter().enumerate() {
        match t {
            Some(t) => segment.push((i as i32, *t)),
            None if !segment.is_empty() => segments.push(std::mem::take(&mut segment)),
            None => {}
        }
    }
    if !segment.is_empty() {
        segments.push(segment);
    }
    for (n, points) in segments.into_iter().enumerate() {
        let series = chart
            .draw_series(LineSeries::new(points, TEMPERATURE_COLOR.stroke_width(2)))
            .map_err(draw_err)?;
        if n == 0 {
            series
                .label(TEMPERATURE_LABEL)
                .legend(|(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], TEMPERATURE_COLOR.stroke_width(2))
                });
        }
    }

    for (values, label, color) in [
        (&report.mean_humidity, HUMIDITY_LABEL, HUMIDITY_COLOR),
        (&report.mean_aqi, AQI_LABEL, AQI_COLOR),
    ] {
        chart
            .draw_secondary_series(LineSeries::new(
                values.iter().enumerate().map(|(i, v)| (i as i32, *v)),
                color.stroke_width(2),
            ))
            .map_err(draw_err)?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;
    Ok(())
}

/// Render the chart as an SVG document.
pub fn render_svg(report: &TrendReport, size: (u32, u32)) -> Result<String, ChartError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw(report, &root)?;
    }
    Ok(svg)
}

/// Render the chart to an SVG file.
pub fn render_to_file(report: &TrendReport, path: &Path, size: (u32, u32)) -> Result<(), ChartError> {
    // The backend writes the file when dropped, drawn or not.
    if report.is_empty() {
        return Err(ChartError::Empty);
    }
    let root = SVGBackend::new(path, size).into_drawing_area();
    draw(report, &root)
}
