//! Plain-text presentation of the view model.

use std::fmt::Write;

use trip_client::view::LOADING;
use trip_client::{ResultPanel, SavedTripsView};

pub fn format_result(panel: &ResultPanel) -> String {
    match panel {
        ResultPanel::Loading => LOADING.to_string(),
        ResultPanel::Message(message) => message.clone(),
        ResultPanel::Trip(card) => {
            let mut out = String::new();
            let _ = writeln!(out, "{}", card.location);
            let _ = writeln!(out, "{}", card.description);
            let _ = writeln!(out, "High: {}, Low: {}", card.high_temp, card.low_temp);
            let _ = writeln!(out, "Start Date: {}", card.start_date);
            let _ = writeln!(out, "Days Remaining: {} day(s)", card.days_remaining);
            let _ = write!(out, "Image: {}", card.image_url);
            out
        }
    }
}

pub fn format_saved_trips(view: &SavedTripsView) -> String {
    if let Some(message) = view.empty_message {
        return message.to_string();
    }

    let mut out = String::new();
    if let Some(heading) = view.heading {
        let _ = writeln!(out, "{heading}");
    }

    for row in &view.rows {
        let marker = if row.expired { " (expired)" } else { "" };
        let _ = writeln!(out);
        let _ = writeln!(out, "[{}] {}{}", row.index, row.location, marker);
        let _ = writeln!(out, "    {}", row.description);
        let _ = writeln!(out, "    High: {}, Low: {}", row.high_temp, row.low_temp);
        let _ = writeln!(out, "    Start Date: {}", row.start_date);
        let _ = writeln!(out, "    Days Remaining: {} day(s)", row.days_remaining);
        let _ = writeln!(out, "    Image: {}", row.image_url);
    }

    out.trim_end().to_string()
}
