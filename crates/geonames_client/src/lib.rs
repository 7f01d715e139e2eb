//! GeoNames search client.
//!
//! Resolves a free-text location into coordinates using the `searchJSON`
//! endpoint, keeping only the best match.

use std::time::Duration;

use common::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// Latitude / longitude of a resolved place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// GeoNames API client.
#[derive(Debug, Clone)]
pub struct GeoNamesClient {
    client: reqwest::Client,
    base_url: String,
    username: String,
}

/// Response from `searchJSON`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub geonames: Vec<GeoName>,
    /// Present instead of results when GeoNames rejects the request.
    #[serde(default)]
    pub status: Option<ServiceStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoName {
    #[serde(deserialize_with = "coordinate")]
    pub lat: f64,
    #[serde(deserialize_with = "coordinate")]
    pub lng: f64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "countryName", default)]
    pub country_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub value: Option<i64>,
}

/// GeoNames sends coordinates as strings; accept numbers too.
fn coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("coordinate out of range")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid coordinate {s:?}: {e}"))),
        other => Err(serde::de::Error::custom(format!(
            "expected coordinate, got {other}"
        ))),
    }
}

impl GeoNamesClient {
    pub fn new(base_url: String, username: String, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent("trip-planner/0.1")
            .pool_max_idle_per_host(4)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(format!("failed to build GeoNames HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            username,
        })
    }

    /// Run a search limited to a single row.
    pub async fn search(&self, location: &str) -> Result<SearchResponse, Error> {
        debug!("Fetching GeoNames search: {} q={}", self.base_url, location);

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", location),
                ("maxRows", "1"),
                ("username", self.username.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::Geocoding(format!("HTTP error for {location}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Geocoding(format!(
                "GeoNames returned {} for {}: {}",
                status.as_u16(),
                location,
                body.chars().take(500).collect::<String>()
            )));
        }

        resp.json()
            .await
            .map_err(|e| Error::Geocoding(format!("JSON parse error for {location}: {e}")))
    }

    /// Coordinates of the best match for `location`.
    pub async fn locate(&self, location: &str) -> Result<Coordinates, Error> {
        let payload = self.search(location).await?;
        first_coordinates(location, &payload)
    }
}

fn first_coordinates(location: &str, payload: &SearchResponse) -> Result<Coordinates, Error> {
    if let Some(place) = payload.geonames.first() {
        return Ok(Coordinates {
            lat: place.lat,
            lng: place.lng,
        });
    }

    match &payload.status {
        Some(status) => Err(Error::Geocoding(format!(
            "GeoNames rejected {location}: {} ({})",
            status.message,
            status.value.unwrap_or_default()
        ))),
        None => Err(Error::Geocoding(format!("No results for {location}"))),
    }
}
