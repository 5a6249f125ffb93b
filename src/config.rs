use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub search: SearchConfig,
}

/// Venue API credentials and endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    /// Category to scope every neighborhood query to
    pub category_id: String,
    /// Category ids counted as existing target venues (e.g. wine bars)
    #[serde(default)]
    pub target_category_ids: Vec<String>,
    #[serde(default = "default_radius")]
    pub radius_m: u32,
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Pause between neighborhood queries, in milliseconds
    #[serde(default = "default_query_delay_ms")]
    pub query_delay_ms: u64,
}

fn default_version() -> String {
    "20180724".to_string()
}

fn default_endpoint() -> String {
    "https://api.foursquare.com/v2/venues/explore".to_string()
}

fn default_radius() -> u32 {
    500
}

fn default_limit() -> usize {
    100
}

fn default_query_delay_ms() -> u64 {
    100
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}
