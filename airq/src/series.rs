//! Reduction of irregularly-sampled series into one value per calendar day.
//!
//! Days are derived by truncating each sample's wall-clock timestamp to its
//! date. No timezone conversion happens here: a sample stamped
//! `2024-01-01T23:30` belongs to 2024-01-01, whatever zone the source used.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

/// A single reading from a time series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Wall-clock time of the reading, in the series' own timezone.
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// The calendar day this sample is counted towards.
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Sample values grouped by calendar day.
#[derive(Debug, Clone, Default)]
pub struct DailyGroups {
    groups: BTreeMap<NaiveDate, Vec<f64>>,
}

impl DailyGroups {
    pub fn new(samples: &[Sample]) -> Self {
        samples.iter().copied().collect()
    }

    /// Values recorded on the given day, in input order.
    pub fn get(&self, day: NaiveDate) -> Option<&[f64]> {
        self.groups.get(&day).map(Vec::as_slice)
    }

    /// Arithmetic mean of the day's values, if there are any.
    ///
    /// Values are summed in sorted order so the result does not depend on
    /// the order samples arrived in.
    pub fn mean(&self, day: NaiveDate) -> Option<f64> {
        let values = self.get(day).filter(|v| !v.is_empty())?;
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(sorted.iter().sum::<f64>() / sorted.len() as f64)
    }

    /// One value per entry of `days`, in the same order: `f` applied to the
    /// day's mean, or `default` for a day with no samples.
    ///
    /// Days that have samples but are not listed are ignored.
    pub fn reduce<F>(&self, days: &[NaiveDate], default: f64, f: F) -> Vec<f64>
    where
        F: Fn(f64) -> f64,
    {
        days.iter()
            .map(|day| self.mean(*day).map(&f).unwrap_or(default))
            .collect()
    }

    /// Days with at least one sample, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.groups.keys().copied()
    }
}

impl FromIterator<Sample> for DailyGroups {
    fn from_iter<T: IntoIterator<Item = Sample>>(iter: T) -> Self {
        let mut groups: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
        for sample in iter {
            groups.entry(sample.day()).or_default().push(sample.value);
        }
        DailyGroups { groups }
    }
}

/// Round to one decimal place, half away from zero.
pub fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Daily means of `samples` for each of `days`, rounded to one decimal.
///
/// The output always has exactly `days.len()` entries; days without samples
/// get `default`.
///
/// # Examples
///
/// ```
/// use airq::series::{aggregate_daily, Sample};
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let samples = [
///     Sample::new(day.and_hms_opt(0, 0, 0).unwrap(), 10.0),
///     Sample::new(day.and_hms_opt(12, 0, 0).unwrap(), 20.0),
/// ];
/// let next = day.succ_opt().unwrap();
/// assert_eq!(aggregate_daily(&samples, &[day, next], 0.0), vec![15.0, 0.0]);
/// ```
pub fn aggregate_daily(samples: &[Sample], days: &[NaiveDate], default: f64) -> Vec<f64> {
    DailyGroups::new(samples).reduce(days, default, round_tenths)
}
