//! Per-neighborhood venue collection sweep.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn};

use crate::models::{Neighborhood, Venue};

use super::classify::classify_categories;
use super::fetch::{FetchError, VenueClient};

/// Search settings for one survey run.
#[derive(Debug, Clone)]
pub struct SurveyParams {
    /// Category to scope every query to
    pub category_id: String,
    /// Category ids counted as existing target venues
    pub target_category_ids: HashSet<String>,
    pub radius_m: u32,
    pub limit: usize,
    /// Pause between consecutive neighborhood queries
    pub query_delay: Duration,
}

/// A qualifying venue tagged with the neighborhood whose query found it.
#[derive(Debug, Clone, Serialize)]
pub struct CollectedVenue {
    pub neighborhood_code: String,
    #[serde(flatten)]
    pub venue: Venue,
}

/// Everything one sweep produced.
#[derive(Debug, Default)]
pub struct VenueCollection {
    /// Bar-like venues keyed by venue id; re-discoveries overwrite
    pub bars: HashMap<String, CollectedVenue>,
    /// Venues whose category ids hit the target set, keyed by venue id
    pub target_matches: HashMap<String, CollectedVenue>,
    /// Neighborhoods whose query failed, with the error
    pub failed: Vec<(String, FetchError)>,
}

/// Query each neighborhood once and classify the results.
///
/// A failed query contributes an empty venue list and is recorded in
/// `failed`; it never aborts the rest of the sweep.
pub async fn collect_venues(
    client: &VenueClient,
    neighborhoods: &[Neighborhood],
    params: &SurveyParams,
) -> VenueCollection {
    let mut collection = VenueCollection::default();
    let targets =
        (!params.target_category_ids.is_empty()).then_some(&params.target_category_ids);

    let pb = ProgressBar::new(neighborhoods.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    for (i, neighborhood) in neighborhoods.iter().enumerate() {
        pb.set_message(neighborhood.name.clone());

        let venues = match client
            .explore(
                neighborhood.location,
                &params.category_id,
                params.radius_m,
                params.limit,
            )
            .await
        {
            Ok(venues) => venues,
            Err(e) => {
                warn!(
                    "Venue query failed for {} ({}): {}",
                    neighborhood.name, neighborhood.code, e
                );
                collection.failed.push((neighborhood.code.clone(), e));
                Vec::new()
            }
        };

        for venue in venues {
            let matched = classify_categories(&venue.categories, targets);
            if !matched.bar {
                continue;
            }

            let entry = CollectedVenue {
                neighborhood_code: neighborhood.code.clone(),
                venue,
            };
            if matched.specific {
                collection
                    .target_matches
                    .insert(entry.venue.id.clone(), entry.clone());
            }
            collection.bars.insert(entry.venue.id.clone(), entry);
        }

        pb.inc(1);

        if i + 1 < neighborhoods.len() && !params.query_delay.is_zero() {
            tokio::time::sleep(params.query_delay).await;
        }
    }

    pb.finish_and_clear();

    info!(
        "Collected {} bar-like venues ({} target matches, {} failed queries)",
        collection.bars.len(),
        collection.target_matches.len(),
        collection.failed.len()
    );

    collection
}

/// Deduplicated bar-like venues per neighborhood code.
pub fn count_by_neighborhood(venues: &HashMap<String, CollectedVenue>) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for entry in venues.values() {
        *counts.entry(entry.neighborhood_code.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, GeoPoint};

    fn collected(id: &str, code: &str) -> CollectedVenue {
        CollectedVenue {
            neighborhood_code: code.to_string(),
            venue: Venue {
                id: id.to_string(),
                name: format!("venue {}", id),
                categories: vec![Category {
                    name: "Wine Bar".into(),
                    id: "wb".into(),
                }],
                location: GeoPoint { lat: 48.85, lon: 2.35 },
                address: None,
                distance_m: 50,
            },
        }
    }

    #[test]
    fn test_count_by_neighborhood() {
        let mut bars = HashMap::new();
        for (id, code) in [("a", "1"), ("b", "1"), ("c", "2")] {
            bars.insert(id.to_string(), collected(id, code));
        }
        let counts = count_by_neighborhood(&bars);
        assert_eq!(counts.get("1"), Some(&2));
        assert_eq!(counts.get("2"), Some(&1));
        assert_eq!(counts.get("3"), None);
    }
}
