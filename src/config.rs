//! Configuration loader: merges env vars, the .env file and config.toml.

use std::path::Path;

use common::{Error, PlannerConfig};
use tracing::{debug, warn};

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn parse_port(raw: &str, env_name: &str) -> Result<u16, Error> {
    raw.trim()
        .parse::<u16>()
        .map_err(|_| Error::Config(format!("{env_name} must be a port number")))
}

fn non_blank(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn validate_config(config: &PlannerConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.port == 0 {
        issues.push("port must be > 0".into());
    }
    if config.http_timeout_secs == 0 {
        issues.push("http_timeout_secs must be > 0".into());
    }

    for (name, url) in [
        ("endpoints.geonames_url", &config.endpoints.geonames_url),
        ("endpoints.weatherbit_url", &config.endpoints.weatherbit_url),
        ("endpoints.pixabay_url", &config.endpoints.pixabay_url),
        ("client.backend_url", &config.client.backend_url),
    ] {
        if !is_http_url(url) {
            issues.push(format!("{name} must be an http(s) URL, got {url:?}"));
        }
    }

    if config.client.store_path.trim().is_empty() {
        issues.push("client.store_path must not be empty".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Missing credentials are not fatal: the provider call fails instead.
fn warn_missing_credentials(config: &PlannerConfig) {
    let creds = &config.credentials;
    for (env_name, value) in [
        ("GEONAMES_USERNAME", &creds.geonames_username),
        ("WEATHERBIT_KEY", &creds.weatherbit_key),
        ("PIXABAY_KEY", &creds.pixabay_key),
    ] {
        if value.trim().is_empty() {
            warn!("{} is not set; requests to that provider will fail", env_name);
        }
    }
}

/// Apply environment overrides. `var` returns the value of an environment
/// variable, if set.
fn apply_env_overrides(
    config: &mut PlannerConfig,
    var: impl Fn(&str) -> Option<String>,
) -> Result<(), Error> {
    if let Some(raw) = var("PORT") {
        config.port = parse_port(&raw, "PORT")?;
    }
    if let Some(raw) = var("HTTP_TIMEOUT_SECS") {
        config.http_timeout_secs = parse_positive_u64(&raw, "HTTP_TIMEOUT_SECS")?;
    }

    if let Some(user) = var("GEONAMES_USERNAME") {
        config.credentials.geonames_username = user;
    }
    if let Some(key) = var("WEATHERBIT_KEY") {
        config.credentials.weatherbit_key = key;
    }
    if let Some(key) = var("PIXABAY_KEY") {
        config.credentials.pixabay_key = key;
    }

    if let Some(url) = var("GEONAMES_URL").and_then(non_blank) {
        config.endpoints.geonames_url = url;
    }
    if let Some(url) = var("WEATHERBIT_URL").and_then(non_blank) {
        config.endpoints.weatherbit_url = url;
    }
    if let Some(url) = var("PIXABAY_URL").and_then(non_blank) {
        config.endpoints.pixabay_url = url;
    }

    if let Some(dir) = var("STATIC_DIR") {
        config.static_dir = non_blank(dir);
    }
    if let Some(url) = var("TRIP_BACKEND_URL").and_then(non_blank) {
        config.client.backend_url = url;
    }
    if let Some(path) = var("TRIP_STORE_PATH").and_then(non_blank) {
        config.client.store_path = path;
    }

    Ok(())
}

/// Load planner configuration from environment and an optional config file.
///
/// `config_path` defaults to `config.toml` in the working directory; a
/// missing default file is fine, a missing explicit file is an error.
pub fn load_config(config_path: Option<&Path>) -> Result<PlannerConfig, Error> {
    // 1. Load .env file from project root or parent directories.
    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = PlannerConfig::default();

    // 3. Try loading the config file if it exists.
    let path = config_path.unwrap_or_else(|| Path::new("config.toml"));
    if path.exists() {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        config = toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
    } else if config_path.is_some() {
        return Err(Error::Config(format!(
            "Config file {} not found",
            path.display()
        )));
    }

    // 4. Override with environment variables (highest priority).
    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    // 5. Validate.
    validate_config(&config)?;

    Ok(config)
}

/// Same as [`load_config`], plus a warning for each missing provider credential.
pub fn load_server_config(config_path: Option<&Path>) -> Result<PlannerConfig, Error> {
    let config = load_config(config_path)?;
    warn_missing_credentials(&config);
    Ok(config)
}
