//! DataFrame conversion for Open-Meteo responses
//!
//! Available only with the `polars` cargo feature:
//!
//! ```toml
//! openmeteo = { version = "0.1", features = ["polars"] }
//! ```
//!
//! Conversion is a pure function from a response to a
//! [`polars::frame::DataFrame`] with one row per time point and one column
//! per present variable, named exactly like the variable. The `time`
//! column comes first; the rest follow the variable declaration order.

use polars::prelude::*;

use crate::data::{CurrentResponse, DailyData, HourlyData, WeatherResponse};
use crate::error::Error;

/// Converts an hourly or daily response into a DataFrame
///
/// Missing measurements become nulls. Returns an error when the response
/// carries neither an hourly nor a daily section.
pub fn to_dataframe(response: &WeatherResponse) -> Result<DataFrame, Error> {
    if let Some(hourly) = &response.hourly {
        hourly_frame(hourly)
    } else if let Some(daily) = &response.daily {
        daily_frame(daily)
    } else {
        Err(Error::Validation(
            "response contains no hourly or daily series".to_string(),
        ))
    }
}

/// Converts current conditions into a single-row DataFrame
///
/// All current variables appear as columns; those the API did not return
/// hold a null.
pub fn current_to_dataframe(response: &CurrentResponse) -> Result<DataFrame, Error> {
    let current = &response.current;
    let mut columns: Vec<Column> = vec![
        Column::new("time".into(), vec![current.time.clone()]),
        Column::new("interval".into(), vec![current.interval]),
    ];
    push_f64(&mut columns, "temperature_2m", &Some(vec![current.temperature_2m]));
    push_i32(&mut columns, "relative_humidity_2m", &Some(vec![current.relative_humidity_2m]));
    push_f64(&mut columns, "dew_point_2m", &Some(vec![current.dew_point_2m]));
    push_f64(&mut columns, "apparent_temperature", &Some(vec![current.apparent_temperature]));
    push_f64(&mut columns, "precipitation", &Some(vec![current.precipitation]));
    push_f64(&mut columns, "rain", &Some(vec![current.rain]));
    push_f64(&mut columns, "snowfall", &Some(vec![current.snowfall]));
    push_i32(&mut columns, "weather_code", &Some(vec![current.weather_code]));
    push_f64(&mut columns, "pressure_msl", &Some(vec![current.pressure_msl]));
    push_f64(&mut columns, "surface_pressure", &Some(vec![current.surface_pressure]));
    push_i32(&mut columns, "cloud_cover", &Some(vec![current.cloud_cover]));
    push_f64(&mut columns, "wind_speed_10m", &Some(vec![current.wind_speed_10m]));
    push_i32(&mut columns, "wind_direction_10m", &Some(vec![current.wind_direction_10m]));
    push_f64(&mut columns, "wind_gusts_10m", &Some(vec![current.wind_gusts_10m]));
    Ok(DataFrame::new(columns)?)
}

fn hourly_frame(data: &HourlyData) -> Result<DataFrame, Error> {
    let mut columns: Vec<Column> = vec![Column::new("time".into(), &data.time)];
    push_f64(&mut columns, "temperature_2m", &data.temperature_2m);
    push_i32(&mut columns, "relative_humidity_2m", &data.relative_humidity_2m);
    push_f64(&mut columns, "dew_point_2m", &data.dew_point_2m);
    push_f64(&mut columns, "apparent_temperature", &data.apparent_temperature);
    push_f64(&mut columns, "precipitation", &data.precipitation);
    push_f64(&mut columns, "rain", &data.rain);
    push_f64(&mut columns, "snowfall", &data.snowfall);
    push_f64(&mut columns, "snow_depth", &data.snow_depth);
    push_i32(&mut columns, "weather_code", &data.weather_code);
    push_f64(&mut columns, "pressure_msl", &data.pressure_msl);
    push_f64(&mut columns, "surface_pressure", &data.surface_pressure);
    push_i32(&mut columns, "cloud_cover", &data.cloud_cover);
    push_i32(&mut columns, "cloud_cover_low", &data.cloud_cover_low);
    push_i32(&mut columns, "cloud_cover_mid", &data.cloud_cover_mid);
    push_i32(&mut columns, "cloud_cover_high", &data.cloud_cover_high);
    push_f64(&mut columns, "wind_speed_10m", &data.wind_speed_10m);
    push_i32(&mut columns, "wind_direction_10m", &data.wind_direction_10m);
    push_f64(&mut columns, "wind_gusts_10m", &data.wind_gusts_10m);
    push_f64(&mut columns, "shortwave_radiation", &data.shortwave_radiation);
    push_f64(&mut columns, "direct_radiation", &data.direct_radiation);
    push_f64(&mut columns, "diffuse_radiation", &data.diffuse_radiation);
    push_f64(&mut columns, "et0_fao_evapotranspiration", &data.et0_fao_evapotranspiration);
    push_f64(&mut columns, "vapour_pressure_deficit", &data.vapour_pressure_deficit);
    push_f64(&mut columns, "visibility", &data.visibility);
    push_i32(&mut columns, "is_day", &data.is_day);
    Ok(DataFrame::new(columns)?)
}

fn daily_frame(data: &DailyData) -> Result<DataFrame, Error> {
    let mut columns: Vec<Column> = vec![Column::new("time".into(), &data.time)];
    push_f64(&mut columns, "temperature_2m_max", &data.temperature_2m_max);
    push_f64(&mut columns, "temperature_2m_min", &data.temperature_2m_min);
    push_f64(&mut columns, "temperature_2m_mean", &data.temperature_2m_mean);
    push_f64(&mut columns, "apparent_temperature_max", &data.apparent_temperature_max);
    push_f64(&mut columns, "apparent_temperature_min", &data.apparent_temperature_min);
    push_f64(&mut columns, "apparent_temperature_mean", &data.apparent_temperature_mean);
    push_f64(&mut columns, "precipitation_sum", &data.precipitation_sum);
    push_f64(&mut columns, "rain_sum", &data.rain_sum);
    push_f64(&mut columns, "snowfall_sum", &data.snowfall_sum);
    push_f64(&mut columns, "precipitation_hours", &data.precipitation_hours);
    push_i32(&mut columns, "weather_code", &data.weather_code);
    push_str(&mut columns, "sunrise", &data.sunrise);
    push_str(&mut columns, "sunset", &data.sunset);
    push_f64(&mut columns, "daylight_duration", &data.daylight_duration);
    push_f64(&mut columns, "sunshine_duration", &data.sunshine_duration);
    push_f64(&mut columns, "wind_speed_10m_max", &data.wind_speed_10m_max);
    push_f64(&mut columns, "wind_gusts_10m_max", &data.wind_gusts_10m_max);
    push_i32(&mut columns, "wind_direction_10m_dominant", &data.wind_direction_10m_dominant);
    push_f64(&mut columns, "shortwave_radiation_sum", &data.shortwave_radiation_sum);
    push_f64(&mut columns, "et0_fao_evapotranspiration", &data.et0_fao_evapotranspiration);
    push_f64(&mut columns, "uv_index_max", &data.uv_index_max);
    Ok(DataFrame::new(columns)?)
}

fn push_f64(columns: &mut Vec<Column>, name: &str, values: &Option<Vec<Option<f64>>>) {
    if let Some(values) = values {
        columns.push(Column::new(name.into(), values));
    }
}

fn push_i32(columns: &mut Vec<Column>, name: &str, values: &Option<Vec<Option<i32>>>) {
    if let Some(values) = values {
        columns.push(Column::new(name.into(), values));
    }
}

fn push_str(columns: &mut Vec<Column>, name: &str, values: &Option<Vec<String>>) {
    if let Some(values) = values {
        columns.push(Column::new(name.into(), values));
    }
}
