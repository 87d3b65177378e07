//! Async client for the Open-Meteo weather API
//!
//! [`OpenMeteoClient`] orchestrates every request the same way: validate
//! the input, consult the matching cache, fetch from the network only on a
//! miss, store the raw payload, then deserialize into the typed models.
//! Historical months are cached on disk and never refetched; forecasts are
//! cached in memory with a TTL and a freshness check near the forecast
//! horizon; current conditions are never cached.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use directories::ProjectDirs;
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::debug;

use crate::cache::{ForecastCache, HistoricalCache};
use crate::cache::{month_bounds, month_span};
use crate::data::{
    CurrentResponse, ErrorResponse, TimeStep, Units, WeatherResponse, CURRENT_VARIABLES,
};
use crate::error::Error;

/// Base URL for the archive (historical) endpoint
const ARCHIVE_BASE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Base URL for the forecast endpoint, which also serves current conditions
const FORECAST_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Default time-to-live for cached forecast entries
const DEFAULT_TTL_MINUTES: i64 = 60;

/// Largest forecast window the API supports
pub const MAX_FORECAST_DAYS: u8 = 16;

/// Client for fetching historical, forecast, and current weather data
///
/// Construct with [`OpenMeteoClient::new`] and adjust defaults with the
/// `with_*` builders:
///
/// ```no_run
/// use std::path::PathBuf;
/// use openmeteo::OpenMeteoClient;
///
/// let client = OpenMeteoClient::new()
///     .with_timezone("Europe/Moscow")
///     .with_cache_dir(PathBuf::from("./weather-cache"));
/// ```
#[derive(Debug)]
pub struct OpenMeteoClient {
    http: Client,
    timezone: String,
    archive_url: String,
    forecast_url: String,
    historical_cache: HistoricalCache,
    forecast_cache: ForecastCache,
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenMeteoClient {
    /// Creates a client with default settings
    ///
    /// The historical cache lives under the platform cache directory
    /// (`~/.cache/openmeteo/historical` on Linux), falling back to the
    /// system temp directory when no home directory is available. The
    /// timezone for returned series defaults to `"auto"` (resolved by the
    /// API from the coordinates).
    pub fn new() -> Self {
        let cache_base = ProjectDirs::from("", "", "openmeteo")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("openmeteo"));

        Self {
            http: Client::new(),
            timezone: "auto".to_string(),
            archive_url: ARCHIVE_BASE_URL.to_string(),
            forecast_url: FORECAST_BASE_URL.to_string(),
            historical_cache: HistoricalCache::new(cache_base.join("historical")),
            forecast_cache: ForecastCache::new(chrono::Duration::minutes(DEFAULT_TTL_MINUTES)),
        }
    }

    /// Replaces the HTTP client, e.g. to configure timeouts or proxies
    pub fn with_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// Sets the timezone used for returned series (default `"auto"`)
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Roots the historical cache at the given directory
    pub fn with_cache_dir(mut self, cache_dir: PathBuf) -> Self {
        self.historical_cache = HistoricalCache::new(cache_dir);
        self
    }

    /// Sets the time-to-live for cached forecast entries (default 60 minutes)
    pub fn with_forecast_ttl(mut self, ttl: std::time::Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        self.forecast_cache = ForecastCache::new(ttl);
        self
    }

    /// Overrides the archive endpoint, e.g. to point at a test server
    pub fn with_archive_url(mut self, url: impl Into<String>) -> Self {
        self.archive_url = url.into();
        self
    }

    /// Overrides the forecast endpoint, e.g. to point at a test server
    pub fn with_forecast_url(mut self, url: impl Into<String>) -> Self {
        self.forecast_url = url.into();
        self
    }

    /// Fetches historical weather for a location and date range
    ///
    /// Months already on disk are read back without touching the network;
    /// only missing months are fetched from the archive endpoint, each
    /// written to its own cache file. The merged series is clipped to the
    /// requested start/end window (cache granularity is the month, request
    /// granularity the day).
    ///
    /// A fetch failure for any month fails the whole request; months
    /// already written stay cached.
    pub async fn get_historical(
        &self,
        latitude: f64,
        longitude: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        step: TimeStep,
    ) -> Result<WeatherResponse, Error> {
        validate_coordinates(latitude, longitude)?;
        validate_date_range(start_date, end_date)?;

        let variables = step.default_variables();
        let missing =
            self.historical_cache
                .missing_months(latitude, longitude, step, start_date, end_date);

        let today = Utc::now().date_naive();
        let mut fetched: HashMap<String, Value> = HashMap::new();

        for month in &missing {
            let Some((month_start, month_end)) = month_bounds(month) else {
                continue;
            };
            // The archive has no rows past today for a month in progress.
            let month_end = month_end.min(today);

            debug!(%month, latitude, longitude, "fetching historical month");
            let params = [
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("start_date", month_start.to_string()),
                ("end_date", month_end.to_string()),
                ("timezone", self.timezone.clone()),
                (step.as_str(), variables.join(",")),
            ];
            let data = self.fetch(&self.archive_url, &params).await?;
            self.historical_cache
                .save_month(latitude, longitude, step, month, &data)?;
            fetched.insert(month.clone(), data);
        }

        let mut merged: Option<Value> = None;
        for month in month_span(start_date, end_date) {
            let data = match fetched.remove(&month) {
                Some(data) => Some(data),
                None => self
                    .historical_cache
                    .load_month(latitude, longitude, step, &month),
            };
            if let Some(data) = data {
                merged = Some(merge_series(merged, &data, step));
            }
        }

        let Some(merged) = merged else {
            return Ok(empty_response(latitude, longitude, &self.timezone, step));
        };
        let trimmed = trim_to_range(merged, start_date, end_date, step);
        Ok(serde_json::from_value(trimmed)?)
    }

    /// Fetches the weather forecast for a location
    ///
    /// Served from the in-memory cache while the entry is younger than the
    /// TTL and not close to the end of its forecast window; otherwise the
    /// entry is refetched and replaced.
    pub async fn get_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        days: u8,
        step: TimeStep,
    ) -> Result<WeatherResponse, Error> {
        validate_coordinates(latitude, longitude)?;
        validate_forecast_days(days)?;

        if let Some(cached) = self.forecast_cache.get_fresh(latitude, longitude, step) {
            debug!(latitude, longitude, "serving forecast from cache");
            return Ok(serde_json::from_value(cached)?);
        }

        debug!(latitude, longitude, "fetching fresh forecast");
        let params = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("forecast_days", days.to_string()),
            ("timezone", self.timezone.clone()),
            (step.as_str(), step.default_variables().join(",")),
        ];
        let data = self.fetch(&self.forecast_url, &params).await?;

        let response: WeatherResponse = serde_json::from_value(data.clone())?;
        self.forecast_cache.insert(latitude, longitude, step, &data);
        Ok(response)
    }

    /// Fetches current conditions for a location
    ///
    /// Current weather changes too often to be worth caching, so every
    /// call goes to the network.
    pub async fn get_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentResponse, Error> {
        validate_coordinates(latitude, longitude)?;

        let params = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("timezone", self.timezone.clone()),
            ("current", CURRENT_VARIABLES.join(",")),
        ];
        let data = self.fetch(&self.forecast_url, &params).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Clears the in-memory forecast cache
    pub fn clear_forecast_cache(&self) {
        self.forecast_cache.clear();
    }

    /// Deletes all historical cache files
    ///
    /// The next historical request fetches every month from the API again.
    pub fn clear_historical_cache(&self) -> Result<(), Error> {
        self.historical_cache.clear()?;
        Ok(())
    }

    /// Clears both the forecast and historical caches
    pub fn clear_all_cache(&self) -> Result<(), Error> {
        self.clear_forecast_cache();
        self.clear_historical_cache()
    }

    /// Issues a GET request and maps failures onto the error kinds
    ///
    /// Transport failures become [`Error::Connection`]. A response whose
    /// body carries `{"error": true, "reason": ...}`, or a non-success
    /// status, becomes [`Error::Api`].
    async fn fetch(&self, url: &str, params: &[(&str, String)]) -> Result<Value, Error> {
        let response = self.http.get(url).query(params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let value: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(e) if status.is_success() => return Err(Error::Decode(e)),
            Err(_) => {
                return Err(Error::Api {
                    reason: format!("HTTP {status}"),
                })
            }
        };

        if value.get("error").and_then(Value::as_bool).unwrap_or(false) {
            let reason = serde_json::from_value::<ErrorResponse>(value)
                .map(|e| e.reason)
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(Error::Api { reason });
        }
        if !status.is_success() {
            return Err(Error::Api {
                reason: format!("HTTP {status}"),
            });
        }

        Ok(value)
    }
}

fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), Error> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(Error::Validation(format!(
            "latitude must be in range [-90.0, 90.0], got {latitude}"
        )));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(Error::Validation(format!(
            "longitude must be in range [-180.0, 180.0], got {longitude}"
        )));
    }
    Ok(())
}

fn validate_date_range(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), Error> {
    if start_date > end_date {
        return Err(Error::Validation(format!(
            "start_date ({start_date}) must be <= end_date ({end_date})"
        )));
    }
    if end_date > Utc::now().date_naive() {
        return Err(Error::Validation(format!(
            "end_date ({end_date}) cannot be in the future for historical data"
        )));
    }
    Ok(())
}

fn validate_forecast_days(days: u8) -> Result<(), Error> {
    if !(1..=MAX_FORECAST_DAYS).contains(&days) {
        return Err(Error::Validation(format!(
            "days must be in range [1, {MAX_FORECAST_DAYS}], got {days}"
        )));
    }
    Ok(())
}

/// Appends one month's series onto the accumulated payload
///
/// The first month becomes the base. Later months contribute the values at
/// timestamps not yet present, so overlapping fetches never duplicate
/// entries. Variables absent from the base are adopted wholesale.
fn merge_series(existing: Option<Value>, new: &Value, step: TimeStep) -> Value {
    let Some(mut merged) = existing else {
        return new.clone();
    };
    let section = step.as_str();

    let existing_times: HashSet<String> = merged
        .get(section)
        .and_then(|s| s.get("time"))
        .and_then(Value::as_array)
        .map(|a| {
            a.iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default();

    let Some(new_section) = new.get(section).and_then(Value::as_object) else {
        return merged;
    };
    let new_times: Vec<&str> = new_section
        .get("time")
        .and_then(Value::as_array)
        .map(|a| a.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    if merged.get(section).and_then(Value::as_object).is_none() {
        if let Some(obj) = merged.as_object_mut() {
            obj.insert(section.to_string(), Value::Object(Map::new()));
        }
    }
    let Some(merged_section) = merged.get_mut(section).and_then(Value::as_object_mut) else {
        return merged;
    };

    for (key, values) in new_section {
        if !merged_section.contains_key(key) {
            merged_section.insert(key.clone(), values.clone());
            continue;
        }
        let mut out = merged_section
            .get(key)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let new_values = values.as_array();
        for (i, t) in new_times.iter().enumerate() {
            if existing_times.contains(*t) {
                continue;
            }
            if let Some(v) = new_values.and_then(|a| a.get(i)) {
                out.push(v.clone());
            }
        }
        merged_section.insert(key.clone(), Value::Array(out));
    }

    merged
}

/// Clips the merged series to the requested date window
///
/// Timestamps are compared lexicographically, which matches chronological
/// order for the API's fixed-width ISO 8601 strings. A window that matches
/// nothing leaves the payload untouched.
fn trim_to_range(mut data: Value, start: NaiveDate, end: NaiveDate, step: TimeStep) -> Value {
    let section = step.as_str();
    let times: Vec<String> = data
        .get(section)
        .and_then(|s| s.get("time"))
        .and_then(Value::as_array)
        .map(|a| {
            a.iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default();
    if times.is_empty() {
        return data;
    }

    let (start_bound, end_bound) = match step {
        TimeStep::Hourly => (format!("{start}T00:00"), format!("{end}T23:59")),
        TimeStep::Daily => (start.to_string(), end.to_string()),
    };

    let indices: Vec<usize> = times
        .iter()
        .enumerate()
        .filter(|(_, t)| start_bound.as_str() <= t.as_str() && t.as_str() <= end_bound.as_str())
        .map(|(i, _)| i)
        .collect();
    if indices.is_empty() {
        return data;
    }

    if let Some(section) = data.get_mut(section).and_then(Value::as_object_mut) {
        for (_key, values) in section.iter_mut() {
            if let Some(array) = values.as_array() {
                let filtered: Vec<Value> =
                    indices.iter().filter_map(|&i| array.get(i).cloned()).collect();
                *values = Value::Array(filtered);
            }
        }
    }
    data
}

/// Response with an empty series, returned when the range yields no data
fn empty_response(
    latitude: f64,
    longitude: f64,
    timezone: &str,
    step: TimeStep,
) -> WeatherResponse {
    let units = Units::from([("time".to_string(), "iso8601".to_string())]);
    let mut response = WeatherResponse {
        latitude,
        longitude,
        elevation: 0.0,
        generationtime_ms: 0.0,
        utc_offset_seconds: 0,
        timezone: timezone.to_string(),
        timezone_abbreviation: String::new(),
        hourly_units: None,
        hourly: None,
        daily_units: None,
        daily: None,
    };
    match step {
        TimeStep::Hourly => {
            response.hourly_units = Some(units);
            response.hourly = Some(Default::default());
        }
        TimeStep::Daily => {
            response.daily_units = Some(units);
            response.daily = Some(Default::default());
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn test_valid_coordinates_accepted() {
        for (lat, lon) in [
            (0.0, 0.0),
            (55.782298, 37.327136),
            (-90.0, -180.0),
            (90.0, 180.0),
            (45.5, -122.5),
        ] {
            assert!(validate_coordinates(lat, lon).is_ok(), "({lat}, {lon})");
        }
    }

    #[test]
    fn test_latitude_out_of_range_rejected() {
        for lat in [91.0, -91.0, 180.0] {
            let err = validate_coordinates(lat, 0.0).expect_err("should reject");
            assert!(matches!(err, Error::Validation(_)));
            assert!(err.to_string().contains("latitude"));
        }
    }

    #[test]
    fn test_longitude_out_of_range_rejected() {
        let err = validate_coordinates(0.0, 181.0).expect_err("should reject");
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("longitude"));
    }

    #[test]
    fn test_date_range_start_after_end_rejected() {
        let today = Utc::now().date_naive();
        let err =
            validate_date_range(today, today - Duration::days(1)).expect_err("should reject");
        assert!(err.to_string().contains("must be <="));
    }

    #[test]
    fn test_date_range_in_future_rejected() {
        let today = Utc::now().date_naive();
        let err =
            validate_date_range(today, today + Duration::days(10)).expect_err("should reject");
        assert!(err.to_string().contains("future"));
    }

    #[test]
    fn test_date_range_up_to_today_accepted() {
        let today = Utc::now().date_naive();
        assert!(validate_date_range(today - Duration::days(10), today).is_ok());
    }

    #[test]
    fn test_forecast_days_bounds() {
        for days in [1, 5, 16] {
            assert!(validate_forecast_days(days).is_ok());
        }
        assert!(validate_forecast_days(0).is_err());
        assert!(validate_forecast_days(17).is_err());
    }

    #[test]
    fn test_merge_into_empty_returns_new() {
        let new = json!({"daily": {"time": ["2024-01-01"], "temperature_2m_max": [5.0]}});
        let merged = merge_series(None, &new, TimeStep::Daily);
        assert_eq!(merged, new);
    }

    #[test]
    fn test_merge_appends_non_overlapping_month() {
        let existing = json!({"daily": {"time": ["2024-01-31"], "temperature_2m_max": [5.0]}});
        let new = json!({"daily": {"time": ["2024-02-01"], "temperature_2m_max": [6.0]}});

        let merged = merge_series(Some(existing), &new, TimeStep::Daily);

        assert_eq!(
            merged["daily"]["time"],
            json!(["2024-01-31", "2024-02-01"])
        );
        assert_eq!(merged["daily"]["temperature_2m_max"], json!([5.0, 6.0]));
    }

    #[test]
    fn test_merge_skips_duplicate_timestamps() {
        let existing = json!({"hourly": {"time": ["2024-01-01T00:00"], "temperature_2m": [5.0]}});
        let new = json!({"hourly": {
            "time": ["2024-01-01T00:00", "2024-01-01T01:00"],
            "temperature_2m": [5.0, 6.0]
        }});

        let merged = merge_series(Some(existing), &new, TimeStep::Hourly);

        assert_eq!(
            merged["hourly"]["time"],
            json!(["2024-01-01T00:00", "2024-01-01T01:00"])
        );
        assert_eq!(merged["hourly"]["temperature_2m"], json!([5.0, 6.0]));
    }

    #[test]
    fn test_merge_adopts_new_variable() {
        let existing = json!({"hourly": {"time": ["2024-01-01T00:00"], "temperature_2m": [5.0]}});
        let new = json!({"hourly": {
            "time": ["2024-01-01T01:00"],
            "temperature_2m": [6.0],
            "rain": [0.4]
        }});

        let merged = merge_series(Some(existing), &new, TimeStep::Hourly);

        assert_eq!(merged["hourly"]["time"], json!(["2024-01-01T00:00", "2024-01-01T01:00"]));
        assert_eq!(merged["hourly"]["rain"], json!([0.4]));
    }

    #[test]
    fn test_trim_daily_to_window() {
        let data = json!({"daily": {
            "time": ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"],
            "temperature_2m_max": [1.0, 2.0, 3.0, 4.0, 5.0]
        }});

        let trimmed = trim_to_range(
            data,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
            TimeStep::Daily,
        );

        assert_eq!(
            trimmed["daily"]["time"],
            json!(["2024-01-02", "2024-01-03", "2024-01-04"])
        );
        assert_eq!(trimmed["daily"]["temperature_2m_max"], json!([2.0, 3.0, 4.0]));
    }

    #[test]
    fn test_trim_hourly_keeps_full_requested_day() {
        let data = json!({"hourly": {
            "time": ["2024-01-01T00:00", "2024-01-01T01:00", "2024-01-01T23:00", "2024-01-02T00:00"],
            "temperature_2m": [1.0, 2.0, 3.0, 4.0]
        }});

        let trimmed = trim_to_range(
            data,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            TimeStep::Hourly,
        );

        assert_eq!(
            trimmed["hourly"]["time"],
            json!(["2024-01-01T00:00", "2024-01-01T01:00", "2024-01-01T23:00"])
        );
    }

    #[test]
    fn test_trim_empty_series_is_untouched() {
        let data = json!({"daily": {"time": []}});
        let trimmed = trim_to_range(
            data.clone(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            TimeStep::Daily,
        );
        assert_eq!(trimmed, data);
    }

    #[test]
    fn test_trim_without_matches_is_untouched() {
        let data = json!({"hourly": {"time": ["2024-01-01T00:00"], "temperature_2m": [1.0]}});
        let trimmed = trim_to_range(
            data.clone(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            TimeStep::Hourly,
        );
        assert_eq!(trimmed, data);
    }

    #[test]
    fn test_empty_response_carries_requested_section() {
        let hourly = empty_response(55.75, 37.62, "auto", TimeStep::Hourly);
        assert!(hourly.hourly.is_some());
        assert!(hourly.daily.is_none());
        assert!(hourly.hourly.unwrap().time.is_empty());

        let daily = empty_response(55.75, 37.62, "auto", TimeStep::Daily);
        assert!(daily.daily.is_some());
        assert!(daily.hourly.is_none());
    }
}
