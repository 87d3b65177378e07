//! Response models for the Open-Meteo API
//!
//! All series containers hold parallel arrays aligned with a shared `time`
//! index. Every variable field is optional and only present when it was
//! requested, so one set of models covers historical and forecast data.
//! Individual measurements are `Option` as well since the archive reports
//! gaps as `null`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Unit labels keyed by variable name (e.g. `"temperature_2m" -> "°C"`)
pub type Units = BTreeMap<String, String>;

/// Response envelope for hourly or daily weather series
///
/// Mirrors the upstream JSON shape: location metadata plus an optional
/// `hourly` and/or `daily` section. Requests made through
/// [`crate::OpenMeteoClient`] populate exactly one section, selected by
/// the [`crate::TimeStep`] argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    /// Latitude of the model grid point the data was resolved to
    pub latitude: f64,
    /// Longitude of the model grid point the data was resolved to
    pub longitude: f64,
    /// Elevation above sea level in meters
    pub elevation: f64,
    /// Server-side generation time in milliseconds
    pub generationtime_ms: f64,
    /// Offset from UTC in seconds
    pub utc_offset_seconds: i32,
    /// Timezone name (e.g. "Europe/Moscow")
    pub timezone: String,
    /// Timezone abbreviation (e.g. "MSK")
    pub timezone_abbreviation: String,
    /// Units for the hourly variables, present for hourly requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_units: Option<Units>,
    /// Hourly series, present for hourly requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly: Option<HourlyData>,
    /// Units for the daily variables, present for daily requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_units: Option<Units>,
    /// Daily series, present for daily requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily: Option<DailyData>,
}

/// Hourly weather measurements as parallel arrays
///
/// Indices in every variable array correspond to entries in `time`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyData {
    /// ISO 8601 datetimes (e.g. "2024-01-15T00:00")
    pub time: Vec<String>,
    /// Temperature at 2m in °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_2m: Option<Vec<Option<f64>>>,
    /// Relative humidity at 2m in %
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_humidity_2m: Option<Vec<Option<i32>>>,
    /// Dew point at 2m in °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dew_point_2m: Option<Vec<Option<f64>>>,
    /// "Feels like" temperature in °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apparent_temperature: Option<Vec<Option<f64>>>,
    /// Total precipitation in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<Vec<Option<f64>>>,
    /// Rain in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain: Option<Vec<Option<f64>>>,
    /// Snowfall in cm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snowfall: Option<Vec<Option<f64>>>,
    /// Snow depth in m
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snow_depth: Option<Vec<Option<f64>>>,
    /// WMO weather code (0-99)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_code: Option<Vec<Option<i32>>>,
    /// Pressure at mean sea level in hPa
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure_msl: Option<Vec<Option<f64>>>,
    /// Surface pressure in hPa
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_pressure: Option<Vec<Option<f64>>>,
    /// Total cloud cover in %
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_cover: Option<Vec<Option<i32>>>,
    /// Low-level cloud cover in %
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_cover_low: Option<Vec<Option<i32>>>,
    /// Mid-level cloud cover in %
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_cover_mid: Option<Vec<Option<i32>>>,
    /// High-level cloud cover in %
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_cover_high: Option<Vec<Option<i32>>>,
    /// Wind speed at 10m in km/h
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed_10m: Option<Vec<Option<f64>>>,
    /// Wind direction at 10m in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_direction_10m: Option<Vec<Option<i32>>>,
    /// Wind gusts at 10m in km/h
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_gusts_10m: Option<Vec<Option<f64>>>,
    /// Shortwave solar radiation in W/m²
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortwave_radiation: Option<Vec<Option<f64>>>,
    /// Direct solar radiation in W/m²
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_radiation: Option<Vec<Option<f64>>>,
    /// Diffuse solar radiation in W/m²
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diffuse_radiation: Option<Vec<Option<f64>>>,
    /// FAO reference evapotranspiration in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub et0_fao_evapotranspiration: Option<Vec<Option<f64>>>,
    /// Vapour pressure deficit in kPa
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vapour_pressure_deficit: Option<Vec<Option<f64>>>,
    /// Visibility in m
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Vec<Option<f64>>>,
    /// Day/night indicator (1 = day, 0 = night)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_day: Option<Vec<Option<i32>>>,
}

/// Daily weather aggregates as parallel arrays
///
/// Values are aggregates (max, min, sum, mean) computed upstream from the
/// hourly series. Indices correspond to entries in `time`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyData {
    /// ISO 8601 dates (e.g. "2024-01-15")
    pub time: Vec<String>,
    /// Maximum daily temperature at 2m in °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_2m_max: Option<Vec<Option<f64>>>,
    /// Minimum daily temperature at 2m in °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_2m_min: Option<Vec<Option<f64>>>,
    /// Mean daily temperature at 2m in °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_2m_mean: Option<Vec<Option<f64>>>,
    /// Maximum "feels like" temperature in °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apparent_temperature_max: Option<Vec<Option<f64>>>,
    /// Minimum "feels like" temperature in °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apparent_temperature_min: Option<Vec<Option<f64>>>,
    /// Mean "feels like" temperature in °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apparent_temperature_mean: Option<Vec<Option<f64>>>,
    /// Total daily precipitation in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation_sum: Option<Vec<Option<f64>>>,
    /// Total daily rain in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain_sum: Option<Vec<Option<f64>>>,
    /// Total daily snowfall in cm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snowfall_sum: Option<Vec<Option<f64>>>,
    /// Hours with precipitation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation_hours: Option<Vec<Option<f64>>>,
    /// Dominant WMO weather code (0-99)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_code: Option<Vec<Option<i32>>>,
    /// Sunrise times as ISO 8601 strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<Vec<String>>,
    /// Sunset times as ISO 8601 strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunset: Option<Vec<String>>,
    /// Daylight duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daylight_duration: Option<Vec<Option<f64>>>,
    /// Sunshine duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunshine_duration: Option<Vec<Option<f64>>>,
    /// Maximum wind speed at 10m in km/h
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed_10m_max: Option<Vec<Option<f64>>>,
    /// Maximum wind gusts at 10m in km/h
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_gusts_10m_max: Option<Vec<Option<f64>>>,
    /// Dominant wind direction in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_direction_10m_dominant: Option<Vec<Option<i32>>>,
    /// Total daily shortwave radiation in MJ/m²
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortwave_radiation_sum: Option<Vec<Option<f64>>>,
    /// Daily FAO reference evapotranspiration in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub et0_fao_evapotranspiration: Option<Vec<Option<f64>>>,
    /// Maximum UV index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uv_index_max: Option<Vec<Option<f64>>>,
}

/// Response envelope for current conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentResponse {
    /// Latitude of the model grid point the data was resolved to
    pub latitude: f64,
    /// Longitude of the model grid point the data was resolved to
    pub longitude: f64,
    /// Elevation above sea level in meters
    pub elevation: f64,
    /// Server-side generation time in milliseconds
    pub generationtime_ms: f64,
    /// Offset from UTC in seconds
    pub utc_offset_seconds: i32,
    /// Timezone name (e.g. "Europe/Moscow")
    pub timezone: String,
    /// Timezone abbreviation (e.g. "MSK")
    pub timezone_abbreviation: String,
    /// Units for the current variables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_units: Option<Units>,
    /// Current weather measurements
    pub current: CurrentData,
}

/// Weather conditions at a single point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentData {
    /// ISO 8601 datetime of the measurement
    pub time: String,
    /// Measurement interval in seconds
    pub interval: i32,
    /// Temperature at 2m in °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_2m: Option<f64>,
    /// Relative humidity at 2m in %
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_humidity_2m: Option<i32>,
    /// Dew point at 2m in °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dew_point_2m: Option<f64>,
    /// "Feels like" temperature in °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apparent_temperature: Option<f64>,
    /// Precipitation in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
    /// Rain in mm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain: Option<f64>,
    /// Snowfall in cm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snowfall: Option<f64>,
    /// WMO weather code (0-99)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_code: Option<i32>,
    /// Pressure at mean sea level in hPa
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure_msl: Option<f64>,
    /// Surface pressure in hPa
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface_pressure: Option<f64>,
    /// Total cloud cover in %
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_cover: Option<i32>,
    /// Wind speed at 10m in km/h
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed_10m: Option<f64>,
    /// Wind direction at 10m in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_direction_10m: Option<i32>,
    /// Wind gusts at 10m in km/h
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_gusts_10m: Option<f64>,
}

/// Error payload returned by the API alongside a non-success status
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    /// Always true for error responses
    pub error: bool,
    /// Human-readable error description
    pub reason: String,
}
