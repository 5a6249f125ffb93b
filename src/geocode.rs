//! Reference address geocoding against a Nominatim-compatible endpoint.

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use crate::models::GeoPoint;

const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

/// Resolves free-form addresses to coordinates
pub struct Geocoder {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    /// Nominatim returns coordinates as strings
    lat: String,
    lon: String,
    display_name: String,
}

impl Geocoder {
    pub fn new() -> Self {
        Self::with_endpoint(NOMINATIM_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            client: Client::builder()
                .user_agent("caviste/0.1 (venue survey)")
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            endpoint: endpoint.to_string(),
        }
    }

    /// Resolve an address to a single coordinate.
    pub async fn resolve(&self, address: &str) -> Result<GeoPoint> {
        let mut attempts = 0;
        let max_attempts = 2;

        loop {
            attempts += 1;

            let response = match self
                .client
                .get(&self.endpoint)
                .query(&[("q", address), ("format", "jsonv2"), ("limit", "1")])
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    warn!(
                        "Geocoding request failed (attempt {}/{}): {}",
                        attempts, max_attempts, e
                    );
                    if attempts < max_attempts {
                        tokio::time::sleep(std::time::Duration::from_secs(2)).await;
                        continue;
                    }
                    return Err(e).context("Geocoding request failed");
                }
            };

            if !response.status().is_success() {
                warn!(
                    "Geocoding returned status {} (attempt {}/{})",
                    response.status(),
                    attempts,
                    max_attempts
                );
                if attempts < max_attempts {
                    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
                    continue;
                }
                bail!("Geocoding failed with status {}", response.status());
            }

            let results: Vec<GeocodeResult> = response
                .json()
                .await
                .context("Failed to parse geocoding response")?;

            let Some(hit) = results.into_iter().next() else {
                bail!("No geocoding result for '{}'", address);
            };

            let lat: f64 = hit.lat.parse().context("Invalid latitude in geocoding result")?;
            let lon: f64 = hit.lon.parse().context("Invalid longitude in geocoding result")?;

            info!("Resolved '{}' to {}, {} ({})", address, lat, lon, hit.display_name);

            return Ok(GeoPoint { lat, lon });
        }
    }
}

impl Default for Geocoder {
    fn default() -> Self {
        Self::new()
    }
}
