//! HTTP surface of the trip service: routes, CORS and JSON error bodies.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use common::{Error, TripResponse};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{error, warn};

use crate::aggregate::TripAggregator;

/// Health endpoint path.
pub const HEALTH_PATH: &str = "/health";
/// Trip aggregation endpoint path.
pub const TRIP_PATH: &str = "/trip";

const MISSING_FIELDS: &str = "Location and startDate are required";

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<TripAggregator>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    /// Any upstream failure. The response does not say which provider failed.
    #[error("An error occurred while fetching data")]
    Upstream(#[source] Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (code, body).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError::Upstream(e)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TripPayload {
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
}

fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

/// Build the service router. When `static_dir` is set, unmatched paths are
/// served from that directory.
pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let mut app = Router::new()
        .route(HEALTH_PATH, get(health))
        .route(TRIP_PATH, post(plan_trip));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(cors).with_state(state)
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn plan_trip(
    State(st): State<AppState>,
    payload: Result<Json<TripPayload>, JsonRejection>,
) -> Result<Json<TripResponse>, ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!("Rejected trip payload: {}", rejection);
        ApiError::BadRequest(MISSING_FIELDS.into())
    })?;

    let (Some(location), Some(start_date)) =
        (required(payload.location), required(payload.start_date))
    else {
        return Err(ApiError::BadRequest(MISSING_FIELDS.into()));
    };

    st.aggregator
        .aggregate(&location, &start_date)
        .await
        .map(Json)
        .map_err(|e| {
            error!(
                stage = e.upstream_stage().unwrap_or("internal"),
                "Trip aggregation failed for {}: {}", location, e
            );
            ApiError::from(e)
        })
}
