//! Venue records flattened from the search API response.

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// One entry of a venue's category list, in API order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// External taxonomy identifier
    pub id: String,
}

/// A venue returned by one neighborhood query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venue {
    /// Unique venue identifier from the API
    pub id: String,
    pub name: String,
    /// Ordered category list; may be empty
    pub categories: Vec<Category>,
    pub location: GeoPoint,
    /// Joined formatted-address lines, if the API provided any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Distance from the query point as reported by the API, in meters
    pub distance_m: u32,
}
