//! Planner configuration types.

use serde::{Deserialize, Serialize};

/// Top-level planner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Port the trip service listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upstream provider credentials.
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Upstream provider endpoints.
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    /// Timeout applied to every outbound HTTP call (seconds).
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    /// Directory of static front-end assets served as a fallback route.
    #[serde(default)]
    pub static_dir: Option<String>,

    /// Client-side settings.
    #[serde(default)]
    pub client: ClientConfig,
}

/// API credentials for the three upstream providers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// GeoNames account name.
    #[serde(default)]
    pub geonames_username: String,

    /// Weatherbit API key.
    #[serde(default)]
    pub weatherbit_key: String,

    /// Pixabay API key.
    #[serde(default)]
    pub pixabay_key: String,
}

/// Base URLs of the upstream providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_geonames_url")]
    pub geonames_url: String,

    #[serde(default = "default_weatherbit_url")]
    pub weatherbit_url: String,

    #[serde(default = "default_pixabay_url")]
    pub pixabay_url: String,
}

/// Settings used by the terminal client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the trip service.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// File holding the saved-trips slot.
    #[serde(default = "default_store_path")]
    pub store_path: String,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_port() -> u16 {
    8081
}
fn default_http_timeout() -> u64 {
    30
}

fn default_geonames_url() -> String {
    "http://api.geonames.org/searchJSON".into()
}
fn default_weatherbit_url() -> String {
    "https://api.weatherbit.io/v2.0/forecast/daily".into()
}
fn default_pixabay_url() -> String {
    "https://pixabay.com/api/".into()
}

fn default_backend_url() -> String {
    "http://localhost:8081".into()
}
fn default_store_path() -> String {
    "saved_trips.json".into()
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            geonames_url: default_geonames_url(),
            weatherbit_url: default_weatherbit_url(),
            pixabay_url: default_pixabay_url(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            store_path: default_store_path(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            credentials: CredentialsConfig::default(),
            endpoints: EndpointsConfig::default(),
            http_timeout_secs: default_http_timeout(),
            static_dir: None,
            client: ClientConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: PlannerConfig = serde_json::from_str(
            r#"{"port": 9000, "credentials": {"pixabay_key": "abc"}}"#,
        )
        .expect("config should deserialize");

        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.credentials.pixabay_key, "abc");
        assert!(cfg.credentials.geonames_username.is_empty());
        assert_eq!(cfg.endpoints.pixabay_url, "https://pixabay.com/api/");
        assert_eq!(cfg.client.backend_url, "http://localhost:8081");
        assert_eq!(cfg.http_timeout_secs, 30);
    }
}
