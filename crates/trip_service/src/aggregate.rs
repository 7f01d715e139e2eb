//! Sequential geocode → forecast → image pipeline.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::{Error, Forecast, PlannerConfig, TripResponse};
use geonames_client::{Coordinates, GeoNamesClient};
use pixabay_client::PixabayClient;
use tracing::{debug, info, instrument};
use weatherbit_client::WeatherbitClient;

/// Resolves a location name to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn locate(&self, location: &str) -> Result<Coordinates, Error>;
}

/// Provides the multi-day forecast for a coordinate pair.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn daily_forecast(&self, lat: f64, lon: f64) -> Result<Forecast, Error>;
}

/// Finds an image for a location. An empty search yields a placeholder URL.
#[async_trait]
pub trait ImageSearch: Send + Sync {
    async fn image_url(&self, query: &str) -> Result<String, Error>;
}

#[async_trait]
impl Geocoder for GeoNamesClient {
    async fn locate(&self, location: &str) -> Result<Coordinates, Error> {
        GeoNamesClient::locate(self, location).await
    }
}

#[async_trait]
impl ForecastSource for WeatherbitClient {
    async fn daily_forecast(&self, lat: f64, lon: f64) -> Result<Forecast, Error> {
        WeatherbitClient::daily_forecast(self, lat, lon).await
    }
}

#[async_trait]
impl ImageSearch for PixabayClient {
    async fn image_url(&self, query: &str) -> Result<String, Error> {
        PixabayClient::image_url(self, query).await
    }
}

/// Combines the three providers into one trip payload.
#[derive(Clone)]
pub struct TripAggregator {
    geocoder: Arc<dyn Geocoder>,
    forecasts: Arc<dyn ForecastSource>,
    images: Arc<dyn ImageSearch>,
}

impl TripAggregator {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        forecasts: Arc<dyn ForecastSource>,
        images: Arc<dyn ImageSearch>,
    ) -> Self {
        Self {
            geocoder,
            forecasts,
            images,
        }
    }

    /// Build an aggregator backed by the real provider clients.
    pub fn from_config(cfg: &PlannerConfig) -> Result<Self, Error> {
        let timeout = Duration::from_secs(cfg.http_timeout_secs);

        let geocoder = GeoNamesClient::new(
            cfg.endpoints.geonames_url.clone(),
            cfg.credentials.geonames_username.clone(),
            timeout,
        )?;
        let forecasts = WeatherbitClient::new(
            cfg.endpoints.weatherbit_url.clone(),
            cfg.credentials.weatherbit_key.clone(),
            timeout,
        )?;
        let images = PixabayClient::new(
            cfg.endpoints.pixabay_url.clone(),
            cfg.credentials.pixabay_key.clone(),
            timeout,
        )?;

        Ok(Self::new(
            Arc::new(geocoder),
            Arc::new(forecasts),
            Arc::new(images),
        ))
    }

    /// Run the pipeline for one trip. The start date is not used upstream;
    /// days remaining are computed by the caller.
    #[instrument(skip(self))]
    pub async fn aggregate(&self, location: &str, start_date: &str) -> Result<TripResponse, Error> {
        let coords = self.geocoder.locate(location).await?;
        debug!("Resolved {} to ({}, {})", location, coords.lat, coords.lng);

        let weather = self.forecasts.daily_forecast(coords.lat, coords.lng).await?;
        let image_url = self.images.image_url(location).await?;

        info!(
            "Aggregated trip for {}: {} forecast days",
            location,
            weather.days().len()
        );

        Ok(TripResponse { weather, image_url })
    }
}
