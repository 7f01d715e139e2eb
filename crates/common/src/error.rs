//! Unified error type for the trip planner.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Geocoding API error: {0}")]
    Geocoding(String),

    #[error("Weather API error: {0}")]
    Weather(String),

    #[error("Image search API error: {0}")]
    Image(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Trip already saved: {location} on {start_date}")]
    DuplicateTrip {
        location: String,
        start_date: String,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Name of the upstream provider that failed, if this is an upstream error.
    pub fn upstream_stage(&self) -> Option<&'static str> {
        match self {
            Error::Geocoding(_) => Some("geocoding"),
            Error::Weather(_) => Some("weather"),
            Error::Image(_) => Some("image"),
            _ => None,
        }
    }

    pub fn is_upstream(&self) -> bool {
        self.upstream_stage().is_some()
    }
}
