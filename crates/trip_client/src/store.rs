//! Saved-trip store.
//!
//! The slot is the only source of truth: every operation loads the whole
//! collection, changes it, and writes the whole collection back.

use common::{Error, SavedTrip, TripResult};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::slot::KvSlot;
use crate::view::{render_saved_trips, SavedTripsView};

pub struct SavedTripStore<S> {
    slot: S,
}

impl<S: KvSlot> SavedTripStore<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Load the persisted collection in insertion order. A missing or
    /// unreadable slot is an empty collection; entries that are not records
    /// are skipped.
    pub fn load(&self) -> Vec<SavedTrip> {
        let raw = match self.slot.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Saved trips unreadable, treating as empty: {}", e);
                return Vec::new();
            }
        };

        let records = match serde_json::from_str::<Option<Vec<Value>>>(&raw) {
            Ok(records) => records.unwrap_or_default(),
            Err(e) => {
                warn!("Saved trips unparseable, treating as empty: {}", e);
                return Vec::new();
            }
        };

        // Decoded one by one so a damaged entry only costs itself.
        records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value(record) {
                Ok(trip) => Some(trip),
                Err(e) => {
                    warn!("Skipping saved trip {}: {}", index, e);
                    None
                }
            })
            .collect()
    }

    /// Replace the persisted collection.
    pub fn store_all(&self, trips: &[SavedTrip]) -> Result<(), Error> {
        let encoded = serde_json::to_string(trips)?;
        self.slot.write(&encoded)
    }

    pub fn list(&self) -> Vec<SavedTrip> {
        self.load()
    }

    /// Append `trip` unless one with the same location and start date exists.
    pub fn save(&self, trip: TripResult) -> Result<(), Error> {
        let mut trips = self.load();

        if trips
            .iter()
            .any(|saved| saved.same_trip(&trip.location, &trip.start_date))
        {
            return Err(Error::DuplicateTrip {
                location: trip.location,
                start_date: trip.start_date,
            });
        }

        info!("Saving trip to {} on {}", trip.location, trip.start_date);
        trips.push(SavedTrip::from(trip));
        self.store_all(&trips)
    }

    /// Remove the trip at `index` in insertion order. Out of range is a no-op.
    pub fn delete_at(&self, index: usize) -> Result<Option<SavedTrip>, Error> {
        let mut trips = self.load();

        if index >= trips.len() {
            debug!(
                "Delete index {} out of range for {} saved trips",
                index,
                trips.len()
            );
            return Ok(None);
        }

        let removed = trips.remove(index);
        self.store_all(&trips)?;
        Ok(Some(removed))
    }

    pub fn clear(&self) -> Result<(), Error> {
        self.slot.remove()
    }

    /// Display rows, sorted by days remaining.
    pub fn render(&self) -> SavedTripsView {
        render_saved_trips(&self.load())
    }
}
