//! Core data models for Open-Meteo responses
//!
//! This module contains the data types used throughout the crate for
//! representing hourly, daily, and current weather series, plus the time
//! step enumeration and the default variable sets requested from the API.

pub mod models;

pub use models::{
    CurrentData, CurrentResponse, DailyData, ErrorResponse, HourlyData, Units, WeatherResponse,
};

use serde::{Deserialize, Serialize};

/// Time step granularity for weather data
///
/// Selects which variable set is requested, which response section
/// (`hourly` or `daily`) carries the series, and the granularity of the
/// historical cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeStep {
    /// Hourly measurements, one entry per hour
    Hourly,
    /// Daily aggregates (min/max/sum/mean), one entry per day
    Daily,
}

impl TimeStep {
    /// The request parameter and response section name for this step
    pub fn as_str(self) -> &'static str {
        match self {
            TimeStep::Hourly => "hourly",
            TimeStep::Daily => "daily",
        }
    }

    /// Default variables requested when no custom list is configured
    pub fn default_variables(self) -> &'static [&'static str] {
        match self {
            TimeStep::Hourly => HOURLY_VARIABLES,
            TimeStep::Daily => DAILY_VARIABLES,
        }
    }
}

/// Default hourly variables fetched for historical and forecast requests
///
/// The same names are valid for both the archive and forecast endpoints,
/// so cached historical series and fresh forecasts share one schema.
pub const HOURLY_VARIABLES: &[&str] = &[
    "temperature_2m",
    "relative_humidity_2m",
    "dew_point_2m",
    "apparent_temperature",
    "precipitation",
    "rain",
    "snowfall",
    "snow_depth",
    "weather_code",
    "pressure_msl",
    "surface_pressure",
    "cloud_cover",
    "cloud_cover_low",
    "cloud_cover_mid",
    "cloud_cover_high",
    "wind_speed_10m",
    "wind_direction_10m",
    "wind_gusts_10m",
    "shortwave_radiation",
    "direct_radiation",
    "diffuse_radiation",
    "et0_fao_evapotranspiration",
    "vapour_pressure_deficit",
    "visibility",
    "is_day",
];

/// Default daily variables fetched for historical and forecast requests
pub const DAILY_VARIABLES: &[&str] = &[
    "temperature_2m_max",
    "temperature_2m_min",
    "temperature_2m_mean",
    "apparent_temperature_max",
    "apparent_temperature_min",
    "apparent_temperature_mean",
    "precipitation_sum",
    "rain_sum",
    "snowfall_sum",
    "precipitation_hours",
    "weather_code",
    "sunrise",
    "sunset",
    "daylight_duration",
    "sunshine_duration",
    "wind_speed_10m_max",
    "wind_gusts_10m_max",
    "wind_direction_10m_dominant",
    "shortwave_radiation_sum",
    "et0_fao_evapotranspiration",
    "uv_index_max",
];

/// Default variables fetched for current conditions
pub const CURRENT_VARIABLES: &[&str] = &[
    "temperature_2m",
    "relative_humidity_2m",
    "dew_point_2m",
    "apparent_temperature",
    "precipitation",
    "rain",
    "snowfall",
    "weather_code",
    "pressure_msl",
    "surface_pressure",
    "cloud_cover",
    "wind_speed_10m",
    "wind_direction_10m",
    "wind_gusts_10m",
];
