//! Three-band classification of a value against a pair of thresholds.

use serde::{Deserialize, Serialize};

/// Ordered qualitative band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Low,
    Mid,
    High,
}

impl Band {
    /// Status name for display, e.g. as a style class.
    pub fn status(&self) -> &'static str {
        match self {
            Band::Low => "good",
            Band::Mid => "moderate",
            Band::High => "poor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    pub band: Band,
    pub label: &'a str,
}

/// Classify `value` against `low < high`.
///
/// A value equal to a threshold belongs to the band below it. The thresholds
/// are not checked; callers must keep them ordered.
pub fn classify<'a>(value: f64, low: f64, high: f64, labels: [&'a str; 3]) -> Classification<'a> {
    let band = if value <= low {
        Band::Low
    } else if value <= high {
        Band::Mid
    } else {
        Band::High
    };
    let label = match band {
        Band::Low => labels[0],
        Band::Mid => labels[1],
        Band::High => labels[2],
    };
    Classification { band, label }
}

/// Thresholds and labels for one displayed metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub low: f64,
    pub high: f64,
    /// Labels for the low, mid and high bands.
    pub labels: [String; 3],
}

impl Scale {
    pub fn new(low: f64, high: f64, labels: [&str; 3]) -> Self {
        Self {
            low,
            high,
            labels: labels.map(String::from),
        }
    }

    /// Degrees Celsius.
    pub fn temperature() -> Self {
        Self::new(20.0, 35.0, ["Cool", "Warm", "Hot"])
    }

    /// Relative humidity, percent.
    pub fn humidity() -> Self {
        Self::new(40.0, 70.0, ["Dry", "Comfortable", "Humid"])
    }

    /// US AQI.
    pub fn air_quality() -> Self {
        Self::new(50.0, 100.0, ["Good", "Moderate", "Unhealthy"])
    }

    pub fn classify(&self, value: f64) -> Classification<'_> {
        let [a, b, c] = &self.labels;
        classify(value, self.low, self.high, [a.as_str(), b.as_str(), c.as_str()])
    }
}
