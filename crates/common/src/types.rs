//! Domain types shared by the trip service and the client.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Placeholder image used when the image search has no hits.
pub const DEFAULT_IMAGE_URL: &str = "../img/default-image.png";

// ── Requests / responses ──────────────────────────────────────────────

/// Body of `POST /trip`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub location: String,
    pub start_date: NaiveDate,
}

/// Successful body of `POST /trip`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    /// Full multi-day forecast as returned by the weather provider.
    pub weather: Forecast,
    #[serde(default)]
    pub image_url: String,
}

// ── Forecast ──────────────────────────────────────────────────────────

/// Multi-day forecast exactly as the weather provider sent it.
///
/// Nothing is re-encoded on the way through; accessors read the fields the
/// client needs and ignore anything they cannot interpret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forecast(Value);

impl Forecast {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// `{"data": days}`.
    pub fn from_days(days: Vec<Value>) -> Self {
        let mut raw = Map::new();
        raw.insert("data".into(), Value::Array(days));
        Self(Value::Object(raw))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Daily entries; empty when `data` is absent or not an array.
    pub fn days(&self) -> &[Value] {
        self.0
            .get("data")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn first_day(&self) -> Option<ForecastDay<'_>> {
        self.days().first().map(ForecastDay)
    }
}

/// Read-only view of one forecast entry.
#[derive(Debug, Clone, Copy)]
pub struct ForecastDay<'a>(&'a Value);

impl<'a> ForecastDay<'a> {
    pub fn valid_date(&self) -> Option<&'a str> {
        self.0.get("valid_date").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&'a str> {
        self.0
            .get("weather")
            .and_then(|w| w.get("description"))
            .and_then(Value::as_str)
    }

    pub fn high_temp(&self) -> Option<f64> {
        self.0.get("high_temp").and_then(Value::as_f64)
    }

    pub fn low_temp(&self) -> Option<f64> {
        self.0.get("low_temp").and_then(Value::as_f64)
    }
}

// ── Lenient decoding ──────────────────────────────────────────────────

/// `null` or a value of the wrong type decodes as `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = lenient(deserializer)?;
    Ok(value.unwrap_or_default())
}

// ── Trips ─────────────────────────────────────────────────────────────

/// Condensed weather for a single day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSummary {
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub high_temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub low_temp: Option<f64>,
}

impl From<ForecastDay<'_>> for WeatherSummary {
    fn from(day: ForecastDay<'_>) -> Self {
        Self {
            description: day.description().map(str::to_string),
            high_temp: day.high_temp(),
            low_temp: day.low_temp(),
        }
    }
}

/// A successful aggregation as seen by the client, before it is saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResult {
    pub location: String,
    pub start_date: String,
    pub weather: WeatherSummary,
    pub image_url: String,
    pub days_remaining: i64,
}

/// A trip persisted in the saved-trips slot.
///
/// Every field tolerates absence, `null` and wrong types so that one damaged
/// record never hides the others; the view substitutes defaults for whatever
/// is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTrip {
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_date: String,
    /// Snapshot taken at save time, never recomputed.
    #[serde(default, deserialize_with = "lenient")]
    pub days_remaining: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub weather: Option<WeatherSummary>,
    #[serde(default, deserialize_with = "lenient")]
    pub image_url: Option<String>,
}

impl SavedTrip {
    /// Identity key comparison: exact, case-sensitive.
    pub fn same_trip(&self, location: &str, start_date: &str) -> bool {
        self.location == location && self.start_date == start_date
    }

    pub fn is_expired(&self) -> bool {
        self.days_remaining.is_some_and(|days| days <= 0)
    }
}

impl From<TripResult> for SavedTrip {
    fn from(trip: TripResult) -> Self {
        Self {
            location: trip.location,
            start_date: trip.start_date,
            days_remaining: Some(trip.days_remaining),
            weather: Some(trip.weather),
            image_url: Some(trip.image_url),
        }
    }
}

/// Whole days from `today` until `start`. Negative once the date has passed.
pub fn days_until(start: NaiveDate, today: NaiveDate) -> i64 {
    (start - today).num_days()
}
