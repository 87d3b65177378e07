//! Two-tier caching for fetched weather data
//!
//! Historical data is persisted to disk, one JSON file per location, time
//! step, and calendar month; months accumulate indefinitely and are never
//! rewritten once stored. Forecast data is held in an in-memory map with a
//! TTL and a freshness check against the end of the forecast window.

mod forecast;
mod historical;

pub use forecast::ForecastCache;
pub use historical::HistoricalCache;
pub(crate) use historical::{month_bounds, month_span};

/// Builds a filesystem-safe key from coordinates
///
/// Coordinates are normalized to 4 decimal places so nearby float
/// representations map to the same cache partition. `-` and `.` are
/// replaced since they are awkward in file names that also use `-` as a
/// field separator (e.g. `55p7500_37p6200` for Moscow).
pub(crate) fn coord_key(latitude: f64, longitude: f64) -> String {
    format!("{latitude:.4}_{longitude:.4}")
        .replace('-', "m")
        .replace('.', "p")
}
