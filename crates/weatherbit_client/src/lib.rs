//! Weatherbit daily forecast client.
//!
//! Fetches the multi-day forecast for a coordinate pair. The payload is
//! returned whole so the trip service can hand it to the client unchanged.

use std::time::Duration;

use common::{Error, Forecast};
use serde_json::Value;
use tracing::debug;

/// Weatherbit API client.
#[derive(Debug, Clone)]
pub struct WeatherbitClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherbitClient {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent("trip-planner/0.1")
            .pool_max_idle_per_host(4)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(format!("failed to build Weatherbit HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Fetch the daily forecast for `(lat, lon)`.
    pub async fn daily_forecast(&self, lat: f64, lon: f64) -> Result<Forecast, Error> {
        debug!(
            "Fetching Weatherbit daily forecast: {} lat={} lon={}",
            self.base_url, lat, lon
        );

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| Error::Weather(format!("HTTP error for ({lat},{lon}): {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Weather(format!(
                "Weatherbit returned {} for ({lat},{lon}): {}",
                status.as_u16(),
                body.chars().take(500).collect::<String>()
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| Error::Weather(format!("Body read error for ({lat},{lon}): {e}")))?;
        let forecast = parse_forecast(&body)
            .map_err(|e| Error::Weather(format!("Invalid forecast for ({lat},{lon}): {e}")))?;

        debug!(
            "Got {} forecast days for ({},{})",
            forecast.days().len(),
            lat,
            lon
        );

        Ok(forecast)
    }
}

/// Any JSON object is accepted and kept as-is.
fn parse_forecast(body: &str) -> Result<Forecast, Error> {
    let raw: Value = serde_json::from_str(body)?;
    if !raw.is_object() {
        return Err(Error::Weather("forecast payload is not a JSON object".into()));
    }
    Ok(Forecast::new(raw))
}
