//! Neighborhood venue survey pipeline.
//!
//! Loads neighborhood boundaries, geocodes the reference address,
//! queries the venue API around each centroid and writes ranked results.

mod report;

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use caviste::boundaries::load_boundaries;
use caviste::config::Config;
use caviste::geocode::Geocoder;
use caviste::models::Neighborhood;
use caviste::venues::{collect_venues, SurveyParams, VenueClient};

use crate::report::{write_ranking_csv, write_venues_json, SurveyReport};

#[derive(Parser, Debug)]
#[command(name = "survey")]
#[command(about = "Survey neighborhoods for wine bar candidate locations")]
struct Args {
    /// GeoJSON file with neighborhood boundaries
    #[arg(short, long)]
    boundaries: PathBuf,

    /// Config file with API credentials and search settings
    #[arg(short, long, default_value = "survey.toml")]
    config: PathBuf,

    /// Reference address to geocode
    #[arg(long, default_value = "Paris, France")]
    address: String,

    /// Output directory for report files
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,

    /// Override the configured search radius (meters)
    #[arg(long)]
    radius: Option<u32>,

    /// Override the configured result limit per query
    #[arg(long)]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Caviste venue survey");
    info!("Boundaries: {}", args.boundaries.display());

    let config = Config::load_from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let boundaries = load_boundaries(&args.boundaries)?;
    if boundaries.is_empty() {
        anyhow::bail!("No usable neighborhoods in {}", args.boundaries.display());
    }

    let geocoder = Geocoder::new();
    let center = geocoder
        .resolve(&args.address)
        .await
        .context("Failed to geocode reference address")?;

    let neighborhoods: Vec<Neighborhood> = boundaries
        .into_iter()
        .map(|b| b.into_neighborhood(center))
        .collect();
    for n in &neighborhoods {
        info!(
            "{} ({}): {:.0}m from center",
            n.name, n.code, n.center_distance_m
        );
    }

    let params = SurveyParams {
        category_id: config.search.category_id.clone(),
        target_category_ids: config
            .search
            .target_category_ids
            .iter()
            .cloned()
            .collect::<HashSet<_>>(),
        radius_m: args.radius.unwrap_or(config.search.radius_m),
        limit: args.limit.unwrap_or(config.search.limit),
        query_delay: Duration::from_millis(config.search.query_delay_ms),
    };

    info!(
        "Querying {} neighborhoods (radius {}m, limit {})",
        neighborhoods.len(),
        params.radius_m,
        params.limit
    );

    let client = VenueClient::new(&config.api);
    let collection = collect_venues(&client, &neighborhoods, &params).await;

    if !collection.failed.is_empty() {
        warn!(
            "{} neighborhood queries failed; their venue lists are empty",
            collection.failed.len()
        );
    }

    let report = SurveyReport::build(&args.address, center, &neighborhoods, &collection);

    std::fs::create_dir_all(&args.out_dir).context("Failed to create output directory")?;
    let csv_path = args.out_dir.join("ranking.csv");
    let json_path = args.out_dir.join("venues.json");
    write_ranking_csv(&csv_path, &report)?;
    write_venues_json(&json_path, &report)?;

    for row in report.rankings.iter().take(5) {
        info!(
            "#{} {} ({}): {} bars, {} existing wine bars, score {}",
            row.rank, row.name, row.code, row.bar_count, row.target_count, row.score
        );
    }
    info!("Wrote {} and {}", csv_path.display(), json_path.display());

    Ok(())
}
