//! Ranking and report output for a survey run.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use caviste::models::{GeoPoint, Neighborhood};
use caviste::venues::{count_by_neighborhood, CollectedVenue, VenueCollection};

/// One neighborhood's standing in the final ranking.
#[derive(Debug, Serialize)]
pub struct RankingRow {
    pub rank: usize,
    pub code: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub center_distance_m: f64,
    /// Deduplicated bar-like venues found by this neighborhood's query
    pub bar_count: usize,
    /// Venues matching the target category ids (existing wine bars)
    pub target_count: usize,
    /// Bar-like activity not yet served by a target venue
    pub score: i64,
}

#[derive(Debug, Serialize)]
pub struct SurveyReport {
    pub address: String,
    pub center: GeoPoint,
    pub surveyed_at: DateTime<Utc>,
    /// Codes of neighborhoods whose query failed
    pub failed_queries: Vec<String>,
    pub rankings: Vec<RankingRow>,
    pub bars: Vec<CollectedVenue>,
    pub target_matches: Vec<CollectedVenue>,
}

impl SurveyReport {
    pub fn build(
        address: &str,
        center: GeoPoint,
        neighborhoods: &[Neighborhood],
        collection: &VenueCollection,
    ) -> Self {
        let bar_counts = count_by_neighborhood(&collection.bars);
        let target_counts = count_by_neighborhood(&collection.target_matches);

        let mut rankings: Vec<RankingRow> = neighborhoods
            .iter()
            .map(|n| {
                let bar_count = bar_counts.get(&n.code).copied().unwrap_or(0);
                let target_count = target_counts.get(&n.code).copied().unwrap_or(0);
                RankingRow {
                    rank: 0,
                    code: n.code.clone(),
                    name: n.name.clone(),
                    latitude: n.location.lat,
                    longitude: n.location.lon,
                    center_distance_m: n.center_distance_m,
                    bar_count,
                    target_count,
                    score: bar_count as i64 - target_count as i64,
                }
            })
            .collect();

        rankings.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.code.cmp(&b.code)));
        for (i, row) in rankings.iter_mut().enumerate() {
            row.rank = i + 1;
        }

        let mut bars: Vec<CollectedVenue> = collection.bars.values().cloned().collect();
        bars.sort_by(|a, b| a.venue.id.cmp(&b.venue.id));
        let mut target_matches: Vec<CollectedVenue> =
            collection.target_matches.values().cloned().collect();
        target_matches.sort_by(|a, b| a.venue.id.cmp(&b.venue.id));

        SurveyReport {
            address: address.to_string(),
            center,
            surveyed_at: Utc::now(),
            failed_queries: collection.failed.iter().map(|(code, _)| code.clone()).collect(),
            rankings,
            bars,
            target_matches,
        }
    }
}

pub fn write_ranking_csv(path: &Path, report: &SurveyReport) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("Failed to create ranking CSV")?;
    for row in &report.rankings {
        writer.serialize(row)?;
    }
    writer.flush().context("Failed to flush ranking CSV")?;
    Ok(())
}

pub fn write_venues_json(path: &Path, report: &SurveyReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use caviste::models::{Category, Venue};
    use std::collections::HashMap;

    fn neighborhood(code: &str, name: &str) -> Neighborhood {
        Neighborhood {
            code: code.to_string(),
            name: name.to_string(),
            location: GeoPoint { lat: 48.85, lon: 2.35 },
            center_distance_m: 1000.0,
        }
    }

    fn collected(id: &str, code: &str, category: &str) -> CollectedVenue {
        CollectedVenue {
            neighborhood_code: code.to_string(),
            venue: Venue {
                id: id.to_string(),
                name: format!("venue {}", id),
                categories: vec![Category {
                    name: category.to_string(),
                    id: format!("{}-cat", id),
                }],
                location: GeoPoint { lat: 48.85, lon: 2.35 },
                address: None,
                distance_m: 100,
            },
        }
    }

    fn collection(entries: &[(&str, &str)], targets: &[(&str, &str)]) -> VenueCollection {
        let mut bars = HashMap::new();
        for (id, code) in entries {
            bars.insert(id.to_string(), collected(id, code, "Bar"));
        }
        let mut target_matches = HashMap::new();
        for (id, code) in targets {
            target_matches.insert(id.to_string(), collected(id, code, "Wine Bar"));
        }
        VenueCollection {
            bars,
            target_matches,
            failed: Vec::new(),
        }
    }

    #[test]
    fn test_ranking_prefers_unserved_density() {
        let neighborhoods = vec![neighborhood("1", "Louvre"), neighborhood("2", "Bourse")];
        // District 1: three bars, two already wine bars. District 2: two bars, none served.
        let collection = collection(
            &[("a", "1"), ("b", "1"), ("c", "1"), ("d", "2"), ("e", "2")],
            &[("a", "1"), ("b", "1")],
        );

        let report = SurveyReport::build("Paris, France", GeoPoint { lat: 48.85, lon: 2.35 }, &neighborhoods, &collection);

        assert_eq!(report.rankings.len(), 2);
        assert_eq!(report.rankings[0].code, "2");
        assert_eq!(report.rankings[0].rank, 1);
        assert_eq!(report.rankings[0].score, 2);
        assert_eq!(report.rankings[1].code, "1");
        assert_eq!(report.rankings[1].score, 1);
    }

    #[test]
    fn test_ranking_tiebreak_is_deterministic() {
        let neighborhoods = vec![neighborhood("2", "Bourse"), neighborhood("1", "Louvre")];
        let collection = collection(&[("a", "1"), ("b", "2")], &[]);

        let report = SurveyReport::build("Paris, France", GeoPoint { lat: 48.85, lon: 2.35 }, &neighborhoods, &collection);

        // Equal scores resolve by code
        assert_eq!(report.rankings[0].code, "1");
        assert_eq!(report.rankings[1].code, "2");
    }

    #[test]
    fn test_neighborhood_without_venues_scores_zero() {
        let neighborhoods = vec![neighborhood("1", "Louvre")];
        let report = SurveyReport::build(
            "Paris, France",
            GeoPoint { lat: 48.85, lon: 2.35 },
            &neighborhoods,
            &VenueCollection::default(),
        );
        assert_eq!(report.rankings[0].bar_count, 0);
        assert_eq!(report.rankings[0].score, 0);
    }
}
