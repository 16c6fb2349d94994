//! PM2.5 concentration to air quality index.
//!
//! Breakpoints are the EPA's PM2.5 table as published before the 2024 revision;
//! see the [technical assistance document](https://document.airnow.gov/technical-assistance-document-for-the-reporting-of-daily-air-quailty.pdf).
//! Results can be checked against the
//! [AirNow calculator](https://www.airnow.gov/aqi/aqi-calculator-concentration/).

use thiserror::Error;

/// The largest index value. Concentrations beyond the table saturate here.
pub const MAX_INDEX: u16 = 500;

/// One linear segment of the concentration-to-index mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub index_low: u16,
    pub index_high: u16,
    /// Lower concentration bound, in µg/m³.
    pub concentration_low: f64,
    /// Upper concentration bound, in µg/m³.
    pub concentration_high: f64,
}

impl Breakpoint {
    const fn new(
        index_low: u16,
        index_high: u16,
        concentration_low: f64,
        concentration_high: f64,
    ) -> Self {
        Self {
            index_low,
            index_high,
            concentration_low,
            concentration_high,
        }
    }

    fn contains(&self, concentration: f64) -> bool {
        (self.concentration_low..=self.concentration_high).contains(&concentration)
    }

    /// Linear interpolation, rounded half away from zero.
    fn interpolate(&self, concentration: f64) -> u16 {
        let span = (self.index_high - self.index_low) as f64;
        let fraction = (concentration - self.concentration_low)
            / (self.concentration_high - self.concentration_low);
        (self.index_low as f64 + span * fraction).round() as u16
    }
}

/// PM2.5 bands, ascending. Adjacent bands leave a 0.1 µg/m³ gap between them.
pub const PM25_BREAKPOINTS: [Breakpoint; 6] = [
    Breakpoint::new(0, 50, 0.0, 12.0),        // Good
    Breakpoint::new(51, 100, 12.1, 35.4),     // Moderate
    Breakpoint::new(101, 150, 35.5, 55.4),    // Unhealthy for sensitive groups
    Breakpoint::new(151, 200, 55.5, 150.4),   // Unhealthy
    Breakpoint::new(201, 300, 150.5, 250.4),  // Very unhealthy
    Breakpoint::new(301, 500, 250.5, 500.4),  // Hazardous
];

/// A concentration that has no index.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum IndexError {
    #[error("concentration must be non-negative, got {0}")]
    Negative(f64),
    #[error("concentration is not a number")]
    NotANumber,
}

/// Calculate the index for a PM2.5 concentration in µg/m³.
///
/// The first band (in ascending order) containing the concentration is used,
/// so a value on a shared boundary belongs to the lower band. A value in the
/// gap between two bands is truncated into the lower one and gets its
/// `index_high`. Anything above the table saturates at [`MAX_INDEX`].
///
/// # Examples
///
/// ```
/// use airq::index::convert_to_index;
///
/// assert_eq!(convert_to_index(12.0), Ok(50));
/// assert_eq!(convert_to_index(41.0), Ok(115));
/// assert_eq!(convert_to_index(900.0), Ok(500));
/// assert!(convert_to_index(-1.0).is_err());
/// ```
pub fn convert_to_index(concentration: f64) -> Result<u16, IndexError> {
    if concentration.is_nan() {
        return Err(IndexError::NotANumber);
    }
    if concentration < 0.0 {
        return Err(IndexError::Negative(concentration));
    }

    for (i, bp) in PM25_BREAKPOINTS.iter().enumerate() {
        if bp.contains(concentration) {
            return Ok(bp.interpolate(concentration));
        }
        if let Some(next) = PM25_BREAKPOINTS.get(i + 1) {
            if concentration > bp.concentration_high && concentration < next.concentration_low {
                return Ok(bp.index_high);
            }
        }
    }

    // Hazardous
    Ok(MAX_INDEX)
}

/// EPA category of an index value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl Category {
    /// The category an index falls in.
    pub fn of(index: u16) -> Self {
        match index {
            0..=50 => Category::Good,
            51..=100 => Category::Moderate,
            101..=150 => Category::UnhealthyForSensitiveGroups,
            151..=200 => Category::Unhealthy,
            201..=300 => Category::VeryUnhealthy,
            _ => Category::Hazardous,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Good => "Good",
            Category::Moderate => "Moderate",
            Category::UnhealthyForSensitiveGroups => "Unhealthy for sensitive groups",
            Category::Unhealthy => "Unhealthy",
            Category::VeryUnhealthy => "Very unhealthy",
            Category::Hazardous => "Hazardous",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_bounds_are_exact() {
        for bp in PM25_BREAKPOINTS {
            assert_eq!(
                convert_to_index(bp.concentration_low),
                Ok(bp.index_low),
                "low bound of {bp:?}"
            );
            assert_eq!(
                convert_to_index(bp.concentration_high),
                Ok(bp.index_high),
                "high bound of {bp:?}"
            );
        }
    }

    #[test]
    fn known_values() {
        assert_eq!(convert_to_index(0.0), Ok(0));
        assert_eq!(convert_to_index(6.0), Ok(25));
        assert_eq!(convert_to_index(41.0), Ok(115));
        assert_eq!(convert_to_index(100.0), Ok(174));
    }

    #[test]
    fn saturates_above_table() {
        assert_eq!(convert_to_index(500.5), Ok(MAX_INDEX));
        assert_eq!(convert_to_index(600.0), Ok(MAX_INDEX));
        assert_eq!(convert_to_index(f64::INFINITY), Ok(MAX_INDEX));
    }

    #[test]
    fn gaps_truncate_to_lower_band() {
        assert_eq!(convert_to_index(12.05), Ok(50));
        assert_eq!(convert_to_index(35.45), Ok(100));
        assert_eq!(convert_to_index(250.45), Ok(300));
    }

    #[test]
    fn rejects_negative_and_nan() {
        assert_eq!(convert_to_index(-0.1), Err(IndexError::Negative(-0.1)));
        assert_eq!(convert_to_index(f64::NAN), Err(IndexError::NotANumber));
    }

    #[test]
    fn rounds_half_away_from_zero() {
        let bp = Breakpoint::new(0, 1, 0.0, 2.0);
        assert_eq!(bp.interpolate(1.0), 1);
        let bp = Breakpoint::new(0, 3, 0.0, 2.0);
        assert_eq!(bp.interpolate(1.0), 2);
        let bp = Breakpoint::new(10, 11, 0.0, 4.0);
        assert_eq!(bp.interpolate(1.0), 10);
    }

    #[test]
    fn monotonic_over_table() {
        let mut last = 0;
        for i in 0..=50040 {
            let c = i as f64 / 100.0;
            let index = convert_to_index(c).unwrap();
            assert!(index >= last, "index fell from {last} to {index} at {c}");
            last = index;
        }
        assert_eq!(last, MAX_INDEX);
    }

    #[test]
    fn categories() {
        assert_eq!(Category::of(0), Category::Good);
        assert_eq!(Category::of(50), Category::Good);
        assert_eq!(Category::of(51), Category::Moderate);
        assert_eq!(Category::of(150), Category::UnhealthyForSensitiveGroups);
        assert_eq!(Category::of(151), Category::Unhealthy);
        assert_eq!(Category::of(300), Category::VeryUnhealthy);
        assert_eq!(Category::of(301), Category::Hazardous);
        assert_eq!(Category::of(999), Category::Hazardous);
    }
}
