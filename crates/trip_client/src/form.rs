//! Trip form: input validation, the single in-flight request guard, and
//! turning a service response into a `TripResult`.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{Local, NaiveDate};
use common::{days_until, Error, TripRequest, TripResult, WeatherSummary, DEFAULT_IMAGE_URL};
use thiserror::Error as ThisError;
use tracing::{info, warn};

use crate::backend::TripBackend;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reasons a submission produced no trip. The display text is what the user sees.
#[derive(Debug, ThisError)]
pub enum FormError {
    #[error("Please enter both location and start date.")]
    MissingFields,

    #[error("Please enter a valid start date.")]
    InvalidDate,

    #[error("The start date must be in the future.")]
    NotInFuture,

    #[error("A trip request is already in progress.")]
    Busy,

    #[error("Error: Error fetching trip data")]
    Backend(#[source] Error),

    #[error("Error: Forecast data was empty")]
    EmptyForecast,
}

impl FormError {
    /// True when the submission was rejected before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FormError::MissingFields | FormError::InvalidDate | FormError::NotInFuture
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Loading,
}

type Clock = Box<dyn Fn() -> NaiveDate + Send + Sync>;

pub struct TripForm<B> {
    backend: B,
    today: Clock,
    in_flight: AtomicBool,
}

/// Holds the in-flight flag for the duration of one request.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<B: TripBackend> TripForm<B> {
    /// Form using the local calendar date.
    pub fn new(backend: B) -> Self {
        Self::with_clock(backend, || Local::now().date_naive())
    }

    pub fn with_clock(backend: B, today: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        Self {
            backend,
            today: Box::new(today),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> FormState {
        if self.in_flight.load(Ordering::Acquire) {
            FormState::Loading
        } else {
            FormState::Idle
        }
    }

    /// Validate the inputs and, if they pass, ask the trip service.
    pub async fn submit(&self, location: &str, start_date: &str) -> Result<TripResult, FormError> {
        let request = self.validate(location, start_date)?;

        let _guard = InFlight::acquire(&self.in_flight).ok_or_else(|| {
            warn!("Ignoring submission for {}: request in flight", request.location);
            FormError::Busy
        })?;

        let response = self
            .backend
            .plan(&request)
            .await
            .map_err(FormError::Backend)?;

        let first_day = response
            .weather
            .first_day()
            .ok_or(FormError::EmptyForecast)?;

        // Measured when the response arrives, not when the form was sent.
        let days_remaining = days_until(request.start_date, (self.today)());

        let image_url = if response.image_url.trim().is_empty() {
            DEFAULT_IMAGE_URL.to_string()
        } else {
            response.image_url.clone()
        };

        info!(
            "Trip to {} planned, {} day(s) remaining",
            request.location, days_remaining
        );

        Ok(TripResult {
            location: request.location,
            start_date: request.start_date.format(DATE_FORMAT).to_string(),
            weather: WeatherSummary::from(first_day),
            image_url,
            days_remaining,
        })
    }

    fn validate(&self, location: &str, start_date: &str) -> Result<TripRequest, FormError> {
        let location = location.trim();
        let start_date = start_date.trim();
        if location.is_empty() || start_date.is_empty() {
            return Err(FormError::MissingFields);
        }

        let start_date =
            NaiveDate::parse_from_str(start_date, DATE_FORMAT).map_err(|_| FormError::InvalidDate)?;
        if start_date <= (self.today)() {
            return Err(FormError::NotInFuture);
        }

        Ok(TripRequest {
            location: location.to_string(),
            start_date,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use common::{Forecast, TripResponse};
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use tokio::sync::Notify;

    pub(crate) fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 4, 26).unwrap()
    }

    pub(crate) fn forecast() -> Forecast {
        Forecast::from_days(vec![json!({
            "valid_date": "2030-05-01",
            "weather": { "description": "Few clouds" },
            "high_temp": 19.0,
            "low_temp": 9.5
        })])
    }

    /// Backend answering from a canned response and counting calls.
    #[derive(Clone)]
    pub(crate) struct StubBackend {
        pub calls: Arc<AtomicUsize>,
        pub response: Option<TripResponse>,
        pub gate: Option<Arc<Notify>>,
    }

    impl StubBackend {
        pub fn ok(image_url: &str) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                response: Some(TripResponse {
                    weather: forecast(),
                    image_url: image_url.into(),
                }),
                gate: None,
            }
        }

        pub fn failing() -> Self {
            Self {
                response: None,
                ..Self::ok("")
            }
        }
    }

    #[async_trait]
    impl TripBackend for StubBackend {
        async fn plan(&self, _request: &TripRequest) -> Result<TripResponse, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.response
                .clone()
                .ok_or_else(|| Error::Http("trip service returned 500".into()))
        }
    }

    fn form(backend: StubBackend) -> TripForm<StubBackend> {
        TripForm::with_clock(backend, today)
    }

    #[tokio::test]
    async fn test_missing_fields_never_reach_backend() {
        let backend = StubBackend::ok("u");
        let form = form(backend.clone());

        for (location, date) in [("", "2030-05-01"), ("   ", "2030-05-01"), ("Oslo", "")] {
            let err = form.submit(location, date).await.expect_err("missing field");
            assert!(matches!(err, FormError::MissingFields));
            assert!(err.is_validation());
        }
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_today_is_not_in_the_future() {
        let backend = StubBackend::ok("u");
        let form = form(backend.clone());

        let err = form.submit("Oslo", "2030-04-26").await.expect_err("today");
        assert_eq!(err.to_string(), "The start date must be in the future.");

        let err = form.submit("Oslo", "2030-04-01").await.expect_err("past");
        assert!(matches!(err, FormError::NotInFuture));

        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unparseable_date_is_rejected() {
        let err = form(StubBackend::ok("u"))
            .submit("Oslo", "next tuesday")
            .await
            .expect_err("bad date");
        assert!(matches!(err, FormError::InvalidDate));
    }

    #[tokio::test]
    async fn test_five_days_ahead() {
        let trip = form(StubBackend::ok("https://img.example/oslo.jpg"))
            .submit("  Oslo ", "2030-05-01")
            .await
            .expect("trip should be planned");

        assert_eq!(trip.location, "Oslo");
        assert_eq!(trip.start_date, "2030-05-01");
        assert_eq!(trip.days_remaining, 5);
        assert_eq!(trip.image_url, "https://img.example/oslo.jpg");
        assert_eq!(trip.weather.description.as_deref(), Some("Few clouds"));
        assert_eq!(trip.weather.low_temp, Some(9.5));
    }

    #[tokio::test]
    async fn test_empty_image_url_uses_placeholder() {
        let trip = form(StubBackend::ok(""))
            .submit("Oslo", "2030-05-01")
            .await
            .expect("trip should be planned");

        assert_eq!(trip.image_url, DEFAULT_IMAGE_URL);
    }

    #[tokio::test]
    async fn test_backend_failure_message() {
        let form = form(StubBackend::failing());
        let err = form.submit("Oslo", "2030-05-01").await.expect_err("backend down");

        assert_eq!(err.to_string(), "Error: Error fetching trip data");
        assert!(!err.is_validation());
        assert_eq!(form.state(), FormState::Idle);
    }

    #[tokio::test]
    async fn test_empty_forecast_is_an_error() {
        let mut backend = StubBackend::ok("u");
        if let Some(resp) = backend.response.as_mut() {
            resp.weather = Forecast::from_days(Vec::new());
        }

        let err = form(backend)
            .submit("Oslo", "2030-05-01")
            .await
            .expect_err("no forecast days");
        assert!(matches!(err, FormError::EmptyForecast));
    }

    #[tokio::test]
    async fn test_second_submission_while_in_flight_is_rejected() {
        let gate = Arc::new(Notify::new());
        let backend = StubBackend {
            gate: Some(gate.clone()),
            ..StubBackend::ok("u")
        };
        let form = form(backend.clone());

        let first = form.submit("Oslo", "2030-05-01");
        let second = async {
            let result = form.submit("Rome", "2030-05-02").await;
            assert_eq!(form.state(), FormState::Loading);
            gate.notify_one();
            result
        };

        let (first, second) = tokio::join!(first, second);

        assert!(first.is_ok());
        assert!(matches!(second, Err(FormError::Busy)));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(form.state(), FormState::Idle);
    }
}
