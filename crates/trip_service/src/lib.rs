//! Trip aggregation service.
//!
//! `POST /trip` resolves a location with GeoNames, fetches the Weatherbit
//! daily forecast for the coordinates, then looks up a Pixabay photo, and
//! answers with `{ weather, imageUrl }`. The three calls run one after the
//! other and any failure aborts the request.

pub mod aggregate;
pub mod http;
pub mod server;

pub use aggregate::{ForecastSource, Geocoder, ImageSearch, TripAggregator};
pub use http::{router, ApiError, AppState};
pub use server::serve;
