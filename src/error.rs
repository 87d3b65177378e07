//! Error types for the Open-Meteo client
//!
//! Every fallible operation in this crate returns [`Error`]. The variants are
//! kept distinguishable so callers can branch on cause: bad input is rejected
//! before any I/O, transport failures are separate from errors the upstream
//! service reported, and cache I/O failures carry the underlying error.

use thiserror::Error;

/// Errors that can occur when fetching or caching weather data
#[derive(Debug, Error)]
pub enum Error {
    /// The API was reachable but returned an error status or payload
    #[error("API error: {reason}")]
    Api {
        /// Human-readable reason reported by the API
        reason: String,
    },

    /// The HTTP request failed (DNS, timeout, TCP, TLS)
    #[error("connection error: {0}")]
    Connection(#[from] reqwest::Error),

    /// Input parameters were rejected before any network or cache I/O
    #[error("validation error: {0}")]
    Validation(String),

    /// The response body could not be decoded into the expected shape
    #[error("failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reading or writing the historical cache failed
    #[error("cache error: {0}")]
    Cache(#[from] std::io::Error),

    /// Building the DataFrame failed
    #[cfg(feature = "polars")]
    #[error("dataframe error: {0}")]
    Frame(#[from] polars::error::PolarsError),
}
