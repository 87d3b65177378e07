//! File-based cache for historical weather data
//!
//! Stores the raw fetched payload for each (location, step, month) in its
//! own JSON file under the cache directory:
//!
//! ```text
//! cache_dir/
//! ├── 55p7500_37p6200_hourly_2024-01.json
//! ├── 55p7500_37p6200_hourly_2024-02.json
//! └── 55p7500_37p6200_daily_2024-01.json
//! ```
//!
//! Published monthly data never changes upstream, so a stored month is
//! final: requests only fetch months with no file on disk.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Months, NaiveDate};
use serde_json::Value;

use super::coord_key;
use crate::data::TimeStep;

/// Month key in `YYYY-MM` form
pub(crate) fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Month keys covering the given date range, in chronological order
pub(crate) fn month_span(start: NaiveDate, end: NaiveDate) -> Vec<String> {
    let mut months = Vec::new();
    let mut cursor = start.with_day(1).unwrap_or(start);
    let end_month = end.with_day(1).unwrap_or(end);
    while cursor <= end_month {
        months.push(month_key(cursor));
        cursor = match cursor.checked_add_months(Months::new(1)) {
            Some(next) => next,
            None => break,
        };
    }
    months
}

/// First and last day of the month named by a `YYYY-MM` key
pub(crate) fn month_bounds(key: &str) -> Option<(NaiveDate, NaiveDate)> {
    let (year, month) = key.split_once('-')?;
    let start = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)?;
    let end = start.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((start, end))
}

/// Persistent per-month cache for historical weather data
#[derive(Debug, Clone)]
pub struct HistoricalCache {
    /// Directory where month files are stored
    cache_dir: PathBuf,
}

impl HistoricalCache {
    /// Creates a cache rooted at the given directory
    ///
    /// The directory is created lazily on the first write.
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Directory holding the cache files
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of the cache file for one (location, step, month)
    fn cache_path(&self, latitude: f64, longitude: f64, step: TimeStep, month: &str) -> PathBuf {
        let coord = coord_key(latitude, longitude);
        self.cache_dir
            .join(format!("{}_{}_{}.json", coord, step.as_str(), month))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Loads the stored payload for one month
    ///
    /// Returns `None` when no file exists or when the file cannot be
    /// parsed; an unreadable file is treated as a miss so the month is
    /// fetched again rather than failing the request.
    pub fn load_month(
        &self,
        latitude: f64,
        longitude: f64,
        step: TimeStep,
        month: &str,
    ) -> Option<Value> {
        let path = self.cache_path(latitude, longitude, step, month);
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "discarding unreadable cache file");
                None
            }
        }
    }

    /// Writes the payload for one month to its cache file
    pub fn save_month(
        &self,
        latitude: f64,
        longitude: f64,
        step: TimeStep,
        month: &str,
        data: &Value,
    ) -> std::io::Result<()> {
        self.ensure_dir()?;
        let path = self.cache_path(latitude, longitude, step, month);
        let json = serde_json::to_string(data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(&path, json)?;
        tracing::debug!(path = %path.display(), "saved historical month");
        Ok(())
    }

    /// Month keys already stored for a location and step
    pub fn cached_months(&self, latitude: f64, longitude: f64, step: TimeStep) -> BTreeSet<String> {
        let prefix = format!("{}_{}_", coord_key(latitude, longitude), step.as_str());
        let mut months = BTreeSet::new();
        let Ok(entries) = fs::read_dir(&self.cache_dir) else {
            return months;
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(month) = name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(".json"))
            {
                months.insert(month.to_string());
            }
        }
        months
    }

    /// Month keys in the requested range that have no cache file yet
    pub fn missing_months(
        &self,
        latitude: f64,
        longitude: f64,
        step: TimeStep,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<String> {
        let cached = self.cached_months(latitude, longitude, step);
        month_span(start, end)
            .into_iter()
            .filter(|month| !cached.contains(month))
            .collect()
    }

    /// Deletes every stored month and recreates the empty cache directory
    pub fn clear(&self) -> std::io::Result<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
        }
        fs::create_dir_all(&self.cache_dir)
    }
}
