//! View model for the result panel and the saved-trips panel.
//!
//! Render functions return plain data plus the element bindings a front end
//! has to wire up; they never touch storage.

use common::{SavedTrip, TripResult, WeatherSummary, DEFAULT_IMAGE_URL};

pub const SAVED_TRIPS_HEADING: &str = "Saved Trips";
pub const NO_SAVED_TRIPS: &str = "No saved trips";
pub const UNKNOWN_LOCATION: &str = "Unknown Location";
pub const NO_WEATHER_DATA: &str = "No weather data";
pub const NOT_AVAILABLE: &str = "N/A";
pub const LOADING: &str = "Loading...";
pub const SAVE_TRIP_ID: &str = "save-trip";

/// What a bound element does when activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    /// Commit the trip currently shown in the result panel.
    SaveTrip,
    /// Delete the saved trip at this insertion index.
    DeleteTrip(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub element_id: String,
    pub action: ViewAction,
}

impl Binding {
    fn new(element_id: impl Into<String>, action: ViewAction) -> Self {
        Self {
            element_id: element_id.into(),
            action,
        }
    }
}

// ── Result panel ──────────────────────────────────────────────────────

/// A freshly aggregated trip, ready to display.
#[derive(Debug, Clone, PartialEq)]
pub struct TripCard {
    pub location: String,
    pub description: String,
    pub high_temp: String,
    pub low_temp: String,
    pub start_date: String,
    pub days_remaining: i64,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultPanel {
    Loading,
    Message(String),
    Trip(TripCard),
}

impl ResultPanel {
    pub fn bindings(&self) -> Vec<Binding> {
        match self {
            ResultPanel::Trip(_) => vec![Binding::new(SAVE_TRIP_ID, ViewAction::SaveTrip)],
            ResultPanel::Loading | ResultPanel::Message(_) => Vec::new(),
        }
    }
}

pub fn render_result(trip: &TripResult) -> ResultPanel {
    let (description, high_temp, low_temp) = weather_fields(Some(&trip.weather));
    ResultPanel::Trip(TripCard {
        location: trip.location.clone(),
        description,
        high_temp,
        low_temp,
        start_date: trip.start_date.clone(),
        days_remaining: trip.days_remaining,
        image_url: non_empty_or(&trip.image_url, DEFAULT_IMAGE_URL),
    })
}

// ── Saved trips panel ─────────────────────────────────────────────────

/// One saved trip as displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRow {
    /// Position in the persisted (unsorted) collection.
    pub index: usize,
    pub location: String,
    pub description: String,
    pub high_temp: String,
    pub low_temp: String,
    pub start_date: String,
    pub days_remaining: String,
    pub image_url: String,
    pub expired: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedTripsView {
    /// `Some` when there is at least one row.
    pub heading: Option<&'static str>,
    /// `Some` when there are no rows.
    pub empty_message: Option<&'static str>,
    pub rows: Vec<TripRow>,
    pub bindings: Vec<Binding>,
}

pub fn delete_button_id(index: usize) -> String {
    format!("delete-trip-{index}")
}

/// Rows sorted ascending by days remaining. Trips without a snapshot sort
/// last; ties keep insertion order. Each row keeps its insertion index.
pub fn render_saved_trips(trips: &[SavedTrip]) -> SavedTripsView {
    if trips.is_empty() {
        return SavedTripsView {
            heading: None,
            empty_message: Some(NO_SAVED_TRIPS),
            rows: Vec::new(),
            bindings: Vec::new(),
        };
    }

    let mut ordered: Vec<(usize, &SavedTrip)> = trips.iter().enumerate().collect();
    ordered.sort_by_key(|(_, trip)| (trip.days_remaining.is_none(), trip.days_remaining));

    let rows: Vec<TripRow> = ordered
        .into_iter()
        .map(|(index, trip)| trip_row(index, trip))
        .collect();
    let bindings = rows
        .iter()
        .map(|row| Binding::new(delete_button_id(row.index), ViewAction::DeleteTrip(row.index)))
        .collect();

    SavedTripsView {
        heading: Some(SAVED_TRIPS_HEADING),
        empty_message: None,
        rows,
        bindings,
    }
}

fn trip_row(index: usize, trip: &SavedTrip) -> TripRow {
    let (description, high_temp, low_temp) = weather_fields(trip.weather.as_ref());
    TripRow {
        index,
        location: non_empty_or(&trip.location, UNKNOWN_LOCATION),
        description,
        high_temp,
        low_temp,
        start_date: non_empty_or(&trip.start_date, NOT_AVAILABLE),
        days_remaining: trip
            .days_remaining
            .map(|days| days.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        image_url: non_empty_or(trip.image_url.as_deref().unwrap_or_default(), DEFAULT_IMAGE_URL),
        expired: trip.is_expired(),
    }
}

fn weather_fields(weather: Option<&WeatherSummary>) -> (String, String, String) {
    let description = weather
        .and_then(|w| w.description.as_deref())
        .filter(|d| !d.is_empty())
        .unwrap_or(NO_WEATHER_DATA)
        .to_string();
    let high = format_temp(weather.and_then(|w| w.high_temp));
    let low = format_temp(weather.and_then(|w| w.low_temp));
    (description, high, low)
}

pub fn format_temp(temp: Option<f64>) -> String {
    match temp {
        Some(t) if t.is_finite() => format!("{t}°C"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(location: &str, days_remaining: Option<i64>) -> SavedTrip {
        SavedTrip {
            location: location.into(),
            start_date: "2030-05-01".into(),
            days_remaining,
            weather: Some(WeatherSummary {
                description: Some("Clear Sky".into()),
                high_temp: Some(25.0),
                low_temp: Some(12.5),
            }),
            image_url: Some("https://img.example/x.jpg".into()),
        }
    }

    #[test]
    fn test_empty_collection_renders_message() {
        let view = render_saved_trips(&[]);
        assert_eq!(view.heading, None);
        assert_eq!(view.empty_message, Some(NO_SAVED_TRIPS));
        assert!(view.bindings.is_empty());
    }

    #[test]
    fn test_rows_sorted_ascending_keep_insertion_index() {
        let trips = vec![
            saved("Rome", Some(30)),
            saved("Oslo", Some(5)),
            saved("Lima", Some(12)),
            saved("Kyiv", Some(-2)),
        ];

        let view = render_saved_trips(&trips);

        let order: Vec<(&str, usize)> = view
            .rows
            .iter()
            .map(|r| (r.location.as_str(), r.index))
            .collect();
        assert_eq!(
            order,
            vec![("Kyiv", 3), ("Oslo", 1), ("Lima", 2), ("Rome", 0)]
        );
        assert_eq!(view.heading, Some(SAVED_TRIPS_HEADING));
    }

    #[test]
    fn test_bindings_point_at_insertion_index() {
        let trips = vec![saved("Rome", Some(30)), saved("Oslo", Some(5))];
        let view = render_saved_trips(&trips);

        assert_eq!(
            view.bindings,
            vec![
                Binding::new("delete-trip-1", ViewAction::DeleteTrip(1)),
                Binding::new("delete-trip-0", ViewAction::DeleteTrip(0)),
            ]
        );
    }

    #[test]
    fn test_missing_snapshot_sorts_last_and_ties_are_stable() {
        let trips = vec![
            saved("NoDays", None),
            saved("A", Some(7)),
            saved("B", Some(7)),
        ];
        let view = render_saved_trips(&trips);

        let order: Vec<&str> = view.rows.iter().map(|r| r.location.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "NoDays"]);
        assert_eq!(view.rows[2].days_remaining, NOT_AVAILABLE);
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let view = render_saved_trips(&[SavedTrip::default()]);
        let row = &view.rows[0];

        assert_eq!(row.location, UNKNOWN_LOCATION);
        assert_eq!(row.description, NO_WEATHER_DATA);
        assert_eq!(row.high_temp, NOT_AVAILABLE);
        assert_eq!(row.low_temp, NOT_AVAILABLE);
        assert_eq!(row.start_date, NOT_AVAILABLE);
        assert_eq!(row.days_remaining, NOT_AVAILABLE);
        assert_eq!(row.image_url, DEFAULT_IMAGE_URL);
        assert!(!row.expired);
    }

    #[test]
    fn test_expired_flag_and_temperatures() {
        let view = render_saved_trips(&[saved("Kyiv", Some(0))]);
        let row = &view.rows[0];

        assert!(row.expired);
        assert_eq!(row.high_temp, "25°C");
        assert_eq!(row.low_temp, "12.5°C");
    }

    #[test]
    fn test_zero_degrees_is_a_temperature() {
        assert_eq!(format_temp(Some(0.0)), "0°C");
        assert_eq!(format_temp(None), NOT_AVAILABLE);
    }

    #[test]
    fn test_result_panel_binds_save_button() {
        let trip = TripResult {
            location: "Oslo".into(),
            start_date: "2030-05-01".into(),
            weather: WeatherSummary::default(),
            image_url: String::new(),
            days_remaining: 5,
        };

        let panel = render_result(&trip);

        let ResultPanel::Trip(card) = &panel else {
            panic!("expected a trip card");
        };
        assert_eq!(card.image_url, DEFAULT_IMAGE_URL);
        assert_eq!(card.description, NO_WEATHER_DATA);
        assert_eq!(
            panel.bindings(),
            vec![Binding::new(SAVE_TRIP_ID, ViewAction::SaveTrip)]
        );
        assert!(ResultPanel::Loading.bindings().is_empty());
    }
}
