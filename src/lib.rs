//! Async client for the Open-Meteo weather API
//!
//! Fetches historical weather (1940 to present), forecasts (up to 16 days),
//! and current conditions, with the same variable names across historical
//! and forecast data. No API key is required.
//!
//! Caching is two-tier: historical data accumulates on disk in one JSON
//! file per location and calendar month, so repeated requests only fetch
//! months not seen before; forecasts live in an in-memory cache with a TTL
//! and are refreshed early when their window nears its end.
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use openmeteo::{OpenMeteoClient, TimeStep};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), openmeteo::Error> {
//!     let client = OpenMeteoClient::new();
//!     let data = client
//!         .get_historical(
//!             55.75,
//!             37.62,
//!             NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
//!             NaiveDate::from_ymd_opt(2024, 1, 31).expect("valid date"),
//!             TimeStep::Hourly,
//!         )
//!         .await?;
//!     if let Some(hourly) = &data.hourly {
//!         println!("{} hourly points", hourly.time.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! With the `polars` feature enabled, [`frame::to_dataframe`] converts any
//! response into a `polars::frame::DataFrame` for analysis.

pub mod cache;
pub mod client;
pub mod data;
pub mod error;
#[cfg(feature = "polars")]
pub mod frame;

pub use client::{OpenMeteoClient, MAX_FORECAST_DAYS};
pub use data::{
    CurrentData, CurrentResponse, DailyData, HourlyData, TimeStep, WeatherResponse,
    CURRENT_VARIABLES, DAILY_VARIABLES, HOURLY_VARIABLES,
};
pub use error::Error;
