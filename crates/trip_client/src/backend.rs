//! Connection from the client to the trip service.

use std::time::Duration;

use async_trait::async_trait;
use common::{Error, TripRequest, TripResponse};
use tracing::debug;

#[async_trait]
pub trait TripBackend: Send + Sync {
    async fn plan(&self, request: &TripRequest) -> Result<TripResponse, Error>;
}

/// Calls `POST {base_url}/trip` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent("trip-planner/0.1")
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(format!("failed to build trip service client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl TripBackend for HttpBackend {
    async fn plan(&self, request: &TripRequest) -> Result<TripResponse, Error> {
        let url = self.url("/trip");
        debug!("Requesting trip {} {}", url, request.location);

        let resp = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Http(format!("trip service unreachable: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http(format!(
                "trip service returned {}: {}",
                status.as_u16(),
                body.chars().take(500).collect::<String>()
            )));
        }

        resp.json()
            .await
            .map_err(|e| Error::Http(format!("invalid trip service response: {e}")))
    }
}
