//! Client side of the trip planner: form handling, the saved-trip store and
//! the view model that presents both.

pub mod backend;
pub mod form;
pub mod planner;
pub mod slot;
pub mod store;
pub mod view;

pub use backend::{HttpBackend, TripBackend};
pub use form::{FormError, FormState, TripForm};
pub use planner::{Dispatched, TripPlanner};
pub use slot::{FileSlot, KvSlot, MemorySlot};
pub use store::SavedTripStore;
pub use view::{Binding, ResultPanel, SavedTripsView, TripCard, TripRow, ViewAction};
