//! Caviste - neighborhood venue survey for wine bar site selection
//!
//! This library provides the pipeline stages shared by the survey binary.

pub mod boundaries;
pub mod config;
pub mod geocode;
pub mod models;
pub mod venues;

pub use models::{Category, GeoPoint, Neighborhood, Venue};
