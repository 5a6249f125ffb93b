//! Neighborhood boundary loading from a GeoJSON file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geo::Centroid;
use geojson::{Feature, FeatureCollection, GeoJson};
use serde_json::Value;
use tracing::{debug, info};

use crate::models::{GeoPoint, Neighborhood};

/// Property holding the precomputed centroid as `[lat, lon]`
const PROP_CENTROID: &str = "geom_x_y";
/// Property holding the district code
const PROP_CODE: &str = "c_ar";
/// Property holding the neighborhood name
const PROP_NAME: &str = "l_aroff";

/// A boundary entry before the reference distance is known.
#[derive(Debug, Clone)]
pub struct Boundary {
    pub code: String,
    pub name: String,
    pub centroid: GeoPoint,
}

impl Boundary {
    /// Attach the distance to the reference point, producing the
    /// final neighborhood record.
    pub fn into_neighborhood(self, center: GeoPoint) -> Neighborhood {
        let center_distance_m = self.centroid.distance_m(center);
        Neighborhood {
            code: self.code,
            name: self.name,
            location: self.centroid,
            center_distance_m,
        }
    }
}

/// Load neighborhood boundaries from a GeoJSON FeatureCollection.
///
/// Each feature is expected to carry a centroid property (`[lat, lon]`),
/// a district code and a name. Features without the centroid property fall
/// back to the centroid of their geometry; features without a code or name
/// are skipped.
pub fn load_boundaries(path: &Path) -> Result<Vec<Boundary>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read boundary file {}", path.display()))?;
    let geojson: GeoJson = content
        .parse()
        .with_context(|| format!("Failed to parse GeoJSON in {}", path.display()))?;
    let collection = FeatureCollection::try_from(geojson)
        .context("Boundary file is not a GeoJSON FeatureCollection")?;

    let mut boundaries = Vec::new();

    for feature in &collection.features {
        let code = match string_property(feature, PROP_CODE) {
            Some(c) => c,
            None => {
                debug!("Skipping feature without a district code");
                continue;
            }
        };
        let name = match string_property(feature, PROP_NAME) {
            Some(n) => n,
            None => {
                debug!("Skipping feature {} without a name", code);
                continue;
            }
        };
        let centroid = match centroid_of(feature) {
            Some(c) => c,
            None => {
                debug!("Skipping feature {} without a usable centroid", code);
                continue;
            }
        };

        boundaries.push(Boundary {
            code,
            name,
            centroid,
        });
    }

    info!("Loaded {} neighborhood boundaries", boundaries.len());

    // District codes are usually numeric; fall back to lexicographic
    boundaries.sort_by(|a, b| match (a.code.parse::<u32>(), b.code.parse::<u32>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.code.cmp(&b.code),
    });

    Ok(boundaries)
}

/// Centroid from the dedicated property, else from the feature geometry.
fn centroid_of(feature: &Feature) -> Option<GeoPoint> {
    if let Some(values) = feature.property(PROP_CENTROID).and_then(Value::as_array) {
        let lat = values.first().and_then(Value::as_f64)?;
        let lon = values.get(1).and_then(Value::as_f64)?;
        return Some(GeoPoint { lat, lon });
    }

    let geometry = feature.geometry.as_ref()?;
    let geometry: geo_types::Geometry<f64> = geometry.clone().try_into().ok()?;
    geometry
        .centroid()
        .map(|p| GeoPoint { lat: p.y(), lon: p.x() })
}

fn string_property(feature: &Feature, key: &str) -> Option<String> {
    match feature.property(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
