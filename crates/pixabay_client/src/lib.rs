//! Pixabay image search client.

use std::time::Duration;

use common::{Error, DEFAULT_IMAGE_URL};
use serde::Deserialize;
use tracing::debug;

/// Pixabay API client.
#[derive(Debug, Clone)]
pub struct PixabayClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Response from the image search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub hits: Vec<ImageHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageHit {
    #[serde(rename = "webformatURL", default)]
    pub webformat_url: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
}

impl SearchResponse {
    /// URL of the first hit, or the placeholder when there is none.
    pub fn first_image_url(&self) -> String {
        self.hits
            .first()
            .and_then(|hit| hit.webformat_url.as_deref())
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_IMAGE_URL)
            .to_string()
    }
}

impl PixabayClient {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent("trip-planner/0.1")
            .pool_max_idle_per_host(4)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(format!("failed to build Pixabay HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Search photos matching `query`.
    pub async fn search_photos(&self, query: &str) -> Result<SearchResponse, Error> {
        debug!("Fetching Pixabay search: {} q={}", self.base_url, query);

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", query),
                ("image_type", "photo"),
            ])
            .send()
            .await
            .map_err(|e| Error::Image(format!("HTTP error for {query}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Image(format!(
                "Pixabay returned {} for {}: {}",
                status.as_u16(),
                query,
                body.chars().take(500).collect::<String>()
            )));
        }

        let data: SearchResponse = resp
            .json()
            .await
            .map_err(|e| Error::Image(format!("JSON parse error for {query}: {e}")))?;

        debug!("Got {} image hits for {}", data.hits.len(), query);

        Ok(data)
    }

    /// Image URL for `query`; falls back to the placeholder when nothing matches.
    pub async fn image_url(&self, query: &str) -> Result<String, Error> {
        Ok(self.search_photos(query).await?.first_image_url())
    }
}
