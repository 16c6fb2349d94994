//! Air quality and comfort calculations.
//!
//! Pure functions behind the dashboard: PM2.5 to index conversion,
//! per-day reduction of sampled series, three-band classification, and
//! alert evaluation. Nothing here performs I/O or keeps state between calls.

pub mod alerts;
pub mod classify;
pub mod index;
pub mod series;

pub use alerts::{evaluate, Alert, AlertRule, Metric, Readings, Severity};
pub use classify::{classify, Band, Classification, Scale};
pub use index::{convert_to_index, Category, IndexError};
pub use series::{aggregate_daily, DailyGroups, Sample};
