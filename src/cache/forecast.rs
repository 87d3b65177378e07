//! In-memory cache for forecast data
//!
//! Entries are keyed by (location key, time step) and stored together with
//! the instant they were fetched and the timestamp of the last forecast
//! point. An entry is served only while both hold:
//!
//! 1. TTL: less than the configured time-to-live has passed since fetch.
//! 2. Freshness: "now" is not within the safety margin of the forecast's
//!    last timestamp, so a multi-day window aging toward its boundary is
//!    refreshed even inside the TTL.
//!
//! Entries are replaced wholesale under the lock; readers never observe a
//! partially written entry. Concurrent misses may both refetch, which is
//! harmless since the replacement is idempotent (last write wins).

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use super::coord_key;
use crate::data::TimeStep;

/// Hours before the last forecast point at which an entry goes stale
const SAFETY_MARGIN_HOURS: i64 = 3;

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Value,
    fetched_at: DateTime<Utc>,
    last_point: DateTime<Utc>,
}

/// TTL-bounded in-memory cache for forecast payloads
///
/// Owned by a client instance; dropping the client drops the cache.
#[derive(Debug)]
pub struct ForecastCache {
    ttl: Duration,
    entries: Mutex<HashMap<(String, TimeStep), CacheEntry>>,
}

impl ForecastCache {
    /// Creates an empty cache with the given time-to-live
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached payload if it is still valid
    pub fn get_fresh(&self, latitude: f64, longitude: f64, step: TimeStep) -> Option<Value> {
        let key = (coord_key(latitude, longitude), step);
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(&key)?;

        let now = Utc::now();
        if now - entry.fetched_at > self.ttl {
            return None;
        }
        if now > entry.last_point - Duration::hours(SAFETY_MARGIN_HOURS) {
            return None;
        }
        Some(entry.payload.clone())
    }

    /// Stores a payload, replacing any previous entry for the key
    pub fn insert(&self, latitude: f64, longitude: f64, step: TimeStep, payload: &Value) {
        let now = Utc::now();
        let entry = CacheEntry {
            payload: payload.clone(),
            fetched_at: now,
            // An unparseable horizon makes the entry immediately stale
            // rather than serving data of unknown age.
            last_point: last_forecast_point(payload).unwrap_or(now),
        };
        let key = (coord_key(latitude, longitude), step);
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, entry);
    }

    /// Removes all cached entries
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Timestamp of the last point in the payload's hourly or daily series
fn last_forecast_point(payload: &Value) -> Option<DateTime<Utc>> {
    let last = |section: &str| -> Option<String> {
        payload
            .get(section)?
            .get("time")?
            .as_array()?
            .last()?
            .as_str()
            .map(str::to_owned)
    };

    let raw = last("hourly").or_else(|| last("daily"))?;
    parse_point(&raw)
}

/// Parses "2024-01-15T12:00" or "2024-01-15" as a UTC instant
fn parse_point(raw: &str) -> Option<DateTime<Utc>> {
    if raw.contains('T') {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
            .ok()
            .map(|dt| dt.and_utc())
    } else {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload_ending_at(time: &str) -> Value {
        json!({
            "hourly": {
                "time": ["2024-01-01T00:00", time],
                "temperature_2m": [1.0, 2.0]
            }
        })
    }

    fn far_future_payload() -> Value {
        let horizon = Utc::now() + Duration::days(7);
        payload_ending_at(&horizon.format("%Y-%m-%dT%H:%M").to_string())
    }

    #[test]
    fn test_get_fresh_returns_stored_payload() {
        let cache = ForecastCache::new(Duration::minutes(60));
        let payload = far_future_payload();

        cache.insert(55.75, 37.62, TimeStep::Hourly, &payload);
        let cached = cache
            .get_fresh(55.75, 37.62, TimeStep::Hourly)
            .expect("fresh entry should be served");

        assert_eq!(cached, payload);
    }

    #[test]
    fn test_get_fresh_misses_for_unknown_key() {
        let cache = ForecastCache::new(Duration::minutes(60));
        assert!(cache.get_fresh(55.75, 37.62, TimeStep::Hourly).is_none());
    }

    #[test]
    fn test_get_fresh_distinguishes_step() {
        let cache = ForecastCache::new(Duration::minutes(60));
        cache.insert(55.75, 37.62, TimeStep::Hourly, &far_future_payload());
        assert!(cache.get_fresh(55.75, 37.62, TimeStep::Daily).is_none());
    }

    #[test]
    fn test_expired_ttl_invalidates_entry() {
        let cache = ForecastCache::new(Duration::zero());
        cache.insert(55.75, 37.62, TimeStep::Hourly, &far_future_payload());
        assert!(cache.get_fresh(55.75, 37.62, TimeStep::Hourly).is_none());
    }

    #[test]
    fn test_entry_near_forecast_horizon_is_stale() {
        let cache = ForecastCache::new(Duration::minutes(60));
        // Last point two hours from now, inside the safety margin.
        let near = Utc::now() + Duration::hours(2);
        let payload = payload_ending_at(&near.format("%Y-%m-%dT%H:%M").to_string());

        cache.insert(55.75, 37.62, TimeStep::Hourly, &payload);
        assert!(cache.get_fresh(55.75, 37.62, TimeStep::Hourly).is_none());
    }

    #[test]
    fn test_entry_without_parseable_horizon_is_stale() {
        let cache = ForecastCache::new(Duration::minutes(60));
        let payload = json!({"hourly": {"time": []}});

        cache.insert(55.75, 37.62, TimeStep::Hourly, &payload);
        assert!(cache.get_fresh(55.75, 37.62, TimeStep::Hourly).is_none());
    }

    #[test]
    fn test_insert_replaces_previous_entry() {
        let cache = ForecastCache::new(Duration::minutes(60));
        let horizon = (Utc::now() + Duration::days(7))
            .format("%Y-%m-%dT%H:%M")
            .to_string();
        let first = json!({"hourly": {"time": [horizon.clone()], "temperature_2m": [1.0]}});
        let second = json!({"hourly": {"time": [horizon], "temperature_2m": [9.5]}});

        cache.insert(55.75, 37.62, TimeStep::Hourly, &first);
        cache.insert(55.75, 37.62, TimeStep::Hourly, &second);

        let cached = cache
            .get_fresh(55.75, 37.62, TimeStep::Hourly)
            .expect("entry present");
        assert_eq!(cached, second);
    }

    #[test]
    fn test_clear_removes_entries() {
        let cache = ForecastCache::new(Duration::minutes(60));
        cache.insert(55.75, 37.62, TimeStep::Hourly, &far_future_payload());

        cache.clear();

        assert!(cache.get_fresh(55.75, 37.62, TimeStep::Hourly).is_none());
    }

    #[test]
    fn test_last_forecast_point_prefers_hourly() {
        let payload = json!({
            "hourly": {"time": ["2024-01-01T00:00", "2024-01-03T12:00"]},
            "daily": {"time": ["2024-01-01", "2024-01-09"]}
        });
        let point = last_forecast_point(&payload).expect("parseable");
        assert_eq!(
            point,
            NaiveDate::from_ymd_opt(2024, 1, 3)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
                .and_utc()
        );
    }

    #[test]
    fn test_last_forecast_point_daily_midnight() {
        let payload = json!({"daily": {"time": ["2024-01-01", "2024-01-05"]}});
        let point = last_forecast_point(&payload).expect("parseable");
        assert_eq!(
            point,
            NaiveDate::from_ymd_opt(2024, 1, 5)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
                .and_utc()
        );
    }
}
