//! Ties the form, the saved-trip store and the view model together.

use std::sync::{Mutex, MutexGuard, PoisonError};

use common::{Error, TripResult};
use tracing::warn;

use crate::backend::TripBackend;
use crate::form::{FormError, FormState, TripForm};
use crate::slot::KvSlot;
use crate::store::SavedTripStore;
use crate::view::{render_result, ResultPanel, SavedTripsView, ViewAction};

pub const ALREADY_SAVED: &str = "This trip is already saved!";
pub const NOTHING_TO_SAVE: &str = "There is no trip to save.";

/// Outcome of a bound action: an optional notice for the user and the
/// re-rendered saved-trips panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    pub notice: Option<String>,
    pub saved_trips: SavedTripsView,
}

pub struct TripPlanner<B, S> {
    form: TripForm<B>,
    store: SavedTripStore<S>,
    pending: Mutex<Option<TripResult>>,
}

impl<B: TripBackend, S: KvSlot> TripPlanner<B, S> {
    pub fn new(form: TripForm<B>, store: SavedTripStore<S>) -> Self {
        Self {
            form,
            store,
            pending: Mutex::new(None),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Option<TripResult>> {
        // The guarded value is replaced whole, so a poisoned lock still holds
        // a consistent trip.
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn store(&self) -> &SavedTripStore<S> {
        &self.store
    }

    /// What the result panel shows right now.
    pub fn result_panel(&self) -> ResultPanel {
        match (&*self.pending(), self.form.state()) {
            (_, FormState::Loading) => ResultPanel::Loading,
            (Some(trip), FormState::Idle) => render_result(trip),
            (None, FormState::Idle) => ResultPanel::Message(String::new()),
        }
    }

    /// Submit the form. The returned panel replaces whatever was shown, so a
    /// failed submission also drops the previously pending trip. A submission
    /// rejected as busy leaves the request in flight and its result alone.
    pub async fn submit(&self, location: &str, start_date: &str) -> ResultPanel {
        match self.form.submit(location, start_date).await {
            Ok(trip) => {
                let panel = render_result(&trip);
                *self.pending() = Some(trip);
                panel
            }
            Err(FormError::Busy) => ResultPanel::Message(FormError::Busy.to_string()),
            Err(e) => {
                if !e.is_validation() {
                    warn!("Trip submission failed: {:?}", e);
                }
                *self.pending() = None;
                ResultPanel::Message(e.to_string())
            }
        }
    }

    pub fn saved_trips(&self) -> SavedTripsView {
        self.store.render()
    }

    /// Run the action behind a bound element and re-render the saved trips.
    pub fn dispatch(&self, action: ViewAction) -> Dispatched {
        let notice = match action {
            ViewAction::SaveTrip => self.save_pending(),
            ViewAction::DeleteTrip(index) => match self.store.delete_at(index) {
                Ok(_) => None,
                Err(e) => Some(e.to_string()),
            },
        };

        Dispatched {
            notice,
            saved_trips: self.store.render(),
        }
    }

    fn save_pending(&self) -> Option<String> {
        let Some(trip) = self.pending().clone() else {
            return Some(NOTHING_TO_SAVE.to_string());
        };

        match self.store.save(trip) {
            Ok(()) => None,
            Err(Error::DuplicateTrip { .. }) => Some(ALREADY_SAVED.to_string()),
            Err(e) => Some(e.to_string()),
        }
    }

    pub fn clear_saved_trips(&self) -> Result<SavedTripsView, Error> {
        self.store.clear()?;
        Ok(self.store.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::tests::{today, StubBackend};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use tokio::sync::Notify;
    use crate::slot::MemorySlot;
    use crate::view::{Binding, NO_SAVED_TRIPS, SAVE_TRIP_ID};

    fn planner(backend: StubBackend) -> TripPlanner<StubBackend, MemorySlot> {
        TripPlanner::new(
            TripForm::with_clock(backend, today),
            SavedTripStore::new(MemorySlot::new()),
        )
    }

    #[tokio::test]
    async fn test_submit_then_save() {
        let planner = planner(StubBackend::ok("https://img.example/oslo.jpg"));

        let panel = planner.submit("Oslo", "2030-05-01").await;
        assert_eq!(
            panel.bindings(),
            vec![Binding {
                element_id: SAVE_TRIP_ID.into(),
                action: ViewAction::SaveTrip,
            }]
        );
        assert_eq!(planner.result_panel(), panel);

        let outcome = planner.dispatch(ViewAction::SaveTrip);
        assert_eq!(outcome.notice, None);
        assert_eq!(outcome.saved_trips.rows.len(), 1);
        assert_eq!(outcome.saved_trips.rows[0].days_remaining, "5");
    }

    #[tokio::test]
    async fn test_saving_twice_notifies_duplicate() {
        let planner = planner(StubBackend::ok("u"));
        planner.submit("Oslo", "2030-05-01").await;

        planner.dispatch(ViewAction::SaveTrip);
        let outcome = planner.dispatch(ViewAction::SaveTrip);

        assert_eq!(outcome.notice.as_deref(), Some(ALREADY_SAVED));
        assert_eq!(planner.store().list().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_submit_drops_pending_trip() {
        let planner = planner(StubBackend::ok("u"));
        planner.submit("Oslo", "2030-05-01").await;

        let panel = planner.submit("", "").await;
        assert_eq!(
            panel,
            ResultPanel::Message("Please enter both location and start date.".into())
        );

        let outcome = planner.dispatch(ViewAction::SaveTrip);
        assert_eq!(outcome.notice.as_deref(), Some(NOTHING_TO_SAVE));
        assert_eq!(outcome.saved_trips.empty_message, Some(NO_SAVED_TRIPS));
    }

    #[tokio::test]
    async fn test_delete_through_sorted_row_binding() {
        let planner = planner(StubBackend::ok("u"));

        planner.submit("Rome", "2030-06-15").await;
        planner.dispatch(ViewAction::SaveTrip);
        planner.submit("Oslo", "2030-05-01").await;
        planner.dispatch(ViewAction::SaveTrip);

        // Oslo is displayed first but was inserted second.
        let view = planner.saved_trips();
        assert_eq!(view.rows[0].location, "Oslo");
        let action = view.bindings[0].action;
        assert_eq!(action, ViewAction::DeleteTrip(1));

        let outcome = planner.dispatch(action);
        assert_eq!(outcome.saved_trips.rows.len(), 1);
        assert_eq!(outcome.saved_trips.rows[0].location, "Rome");
    }

    #[tokio::test]
    async fn test_clear_saved_trips() {
        let planner = planner(StubBackend::ok("u"));
        planner.submit("Oslo", "2030-05-01").await;
        planner.dispatch(ViewAction::SaveTrip);

        let view = planner.clear_saved_trips().unwrap();
        assert_eq!(view.empty_message, Some(NO_SAVED_TRIPS));
    }

    #[tokio::test]
    async fn test_loading_while_request_in_flight() {
        let gate = Arc::new(Notify::new());
        let backend = StubBackend {
            gate: Some(gate.clone()),
            ..StubBackend::ok("https://img.example/oslo.jpg")
        };
        let planner = planner(backend.clone());
        assert_eq!(planner.result_panel(), ResultPanel::Message(String::new()));

        let first = planner.submit("Oslo", "2030-05-01");
        let observer = async {
            assert_eq!(planner.result_panel(), ResultPanel::Loading);
            assert!(planner.result_panel().bindings().is_empty());

            let busy = planner.submit("Rome", "2030-05-02").await;
            assert_eq!(
                busy,
                ResultPanel::Message("A trip request is already in progress.".into())
            );
            gate.notify_one();
        };

        let (first, ()) = tokio::join!(first, observer);

        assert!(matches!(first, ResultPanel::Trip(_)));
        assert_eq!(planner.result_panel(), first);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert_eq!(planner.dispatch(ViewAction::SaveTrip).notice, None);
    }
}
