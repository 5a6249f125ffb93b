//! Neighborhood records and the geographic point type.

use geo::{Distance, Geodesic};
use serde::{Deserialize, Serialize};

/// Geographic point (lat/lon, WGS84)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Geodesic distance to another point, in meters.
    pub fn distance_m(&self, other: GeoPoint) -> f64 {
        Geodesic.distance(
            geo::Point::new(self.lon, self.lat),
            geo::Point::new(other.lon, other.lat),
        )
    }
}

/// A neighborhood with its centroid and distance to the reference point.
///
/// Built from a loaded boundary once the reference coordinate is known;
/// not mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neighborhood {
    /// District code from the boundary dataset (e.g. arrondissement number)
    pub code: String,
    pub name: String,
    /// Boundary centroid
    pub location: GeoPoint,
    /// Geodesic distance from the centroid to the reference point
    pub center_distance_m: f64,
}
