//! Venue discovery: remote search, response flattening and classification.

pub mod classify;
pub mod collect;
pub mod fetch;

pub use classify::{classify_categories, CategoryMatch};
pub use collect::{collect_venues, count_by_neighborhood, CollectedVenue, SurveyParams, VenueCollection};
pub use fetch::{FetchError, VenueClient};
