//! Venue search client for the category-scoped explore endpoint.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::ApiConfig;
use crate::models::{Category, GeoPoint, Venue};

/// Failure modes of one venue search.
///
/// An `Ok` result with no venues means the area is genuinely empty; these
/// errors mean the answer is unknown and the caller may retry or report.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("venue request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("venue endpoint returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed venue response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Client for the venue search API
pub struct VenueClient {
    client: Client,
    endpoint: String,
    client_id: String,
    client_secret: String,
    version: String,
}

#[derive(Debug, Deserialize)]
struct ExploreResponse {
    response: ExploreBody,
}

#[derive(Debug, Deserialize)]
struct ExploreBody {
    #[serde(default)]
    groups: Vec<ExploreGroup>,
}

#[derive(Debug, Deserialize)]
struct ExploreGroup {
    #[serde(default)]
    items: Vec<ExploreItem>,
}

#[derive(Debug, Deserialize)]
struct ExploreItem {
    venue: RawVenue,
}

#[derive(Debug, Deserialize)]
struct RawVenue {
    id: String,
    name: String,
    #[serde(default)]
    categories: Vec<RawCategory>,
    location: RawLocation,
}

#[derive(Debug, Deserialize)]
struct RawCategory {
    name: String,
    id: String,
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    lat: f64,
    lng: f64,
    #[serde(default, rename = "formattedAddress")]
    formatted_address: Vec<String>,
    #[serde(default)]
    distance: u32,
}

impl VenueClient {
    pub fn new(api: &ApiConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent("caviste/0.1 (venue survey)")
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            endpoint: api.endpoint.clone(),
            client_id: api.client_id.clone(),
            client_secret: api.client_secret.clone(),
            version: api.version.clone(),
        }
    }

    /// Search venues of one category around a coordinate.
    ///
    /// Returns the flattened venue list; an empty list means the search
    /// succeeded and found nothing within the radius.
    pub async fn explore(
        &self,
        at: GeoPoint,
        category_id: &str,
        radius_m: u32,
        limit: usize,
    ) -> Result<Vec<Venue>, FetchError> {
        let ll = format!("{},{}", at.lat, at.lon);
        let radius = radius_m.to_string();
        let limit = limit.to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("v", self.version.as_str()),
                ("ll", ll.as_str()),
                ("categoryId", category_id),
                ("radius", radius.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body: ExploreResponse = response.json().await.map_err(FetchError::Decode)?;

        let venues: Vec<Venue> = body
            .response
            .groups
            .into_iter()
            .flat_map(|group| group.items)
            .map(|item| flatten_venue(item.venue))
            .collect();

        debug!("{} venues within {}m of {}", venues.len(), radius_m, ll);

        Ok(venues)
    }
}

/// Flatten one raw API venue into the survey record.
fn flatten_venue(raw: RawVenue) -> Venue {
    let address = if raw.location.formatted_address.is_empty() {
        None
    } else {
        Some(raw.location.formatted_address.join(", "))
    };

    Venue {
        id: raw.id,
        name: raw.name,
        categories: raw
            .categories
            .into_iter()
            .map(|c| Category { name: c.name, id: c.id })
            .collect(),
        location: GeoPoint {
            lat: raw.location.lat,
            lon: raw.location.lng,
        },
        address,
        distance_m: raw.location.distance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_BODY: &str = r#"{
        "response": {
            "groups": [
                {
                    "items": [
                        {
                            "venue": {
                                "id": "4adcda10f964a520af3521e3",
                                "name": "Le Baron Rouge",
                                "categories": [
                                    {"name": "Wine Bar", "id": "4bf58dd8d48988d123941735"}
                                ],
                                "location": {
                                    "lat": 48.8496,
                                    "lng": 2.3785,
                                    "formattedAddress": ["1 rue Théophile Roussel", "75012 Paris"],
                                    "distance": 132
                                }
                            }
                        }
                    ]
                }
            ]
        }
    }"#;

    #[test]
    fn test_flatten_preserves_venue_fields() {
        let body: ExploreResponse = serde_json::from_str(SAMPLE_BODY).unwrap();
        let venues: Vec<Venue> = body
            .response
            .groups
            .into_iter()
            .flat_map(|g| g.items)
            .map(|i| flatten_venue(i.venue))
            .collect();

        assert_eq!(venues.len(), 1);
        let venue = &venues[0];
        assert_eq!(venue.id, "4adcda10f964a520af3521e3");
        assert_eq!(venue.name, "Le Baron Rouge");
        assert_eq!(venue.categories[0].name, "Wine Bar");
        assert!((venue.location.lat - 48.8496).abs() < 1e-9);
        assert!((venue.location.lon - 2.3785).abs() < 1e-9);
        assert_eq!(venue.distance_m, 132);
        assert_eq!(
            venue.address.as_deref(),
            Some("1 rue Théophile Roussel, 75012 Paris")
        );
    }

    #[test]
    fn test_decode_tolerates_missing_groups() {
        let body: ExploreResponse = serde_json::from_str(r#"{"response": {}}"#).unwrap();
        assert!(body.response.groups.is_empty());
    }

    #[test]
    fn test_flatten_empty_address_becomes_none() {
        let raw = RawVenue {
            id: "v1".into(),
            name: "Nameless".into(),
            categories: Vec::new(),
            location: RawLocation {
                lat: 48.0,
                lng: 2.0,
                formatted_address: Vec::new(),
                distance: 10,
            },
        };
        let venue = flatten_venue(raw);
        assert!(venue.address.is_none());
        assert!(venue.categories.is_empty());
    }
}
