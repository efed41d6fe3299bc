use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::normalize::normalize_name;

// ---------------------------------------------------------------------------
// Map boundaries (GeoJSON)
// ---------------------------------------------------------------------------

/// Property carrying each feature's display name in the boundary file.
const NAME_PROPERTY: &str = "gouv_fr";

#[derive(Debug, Deserialize)]
struct RawCollection {
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: serde_json::Map<String, JsonValue>,
    geometry: JsonValue,
}

/// One map region: display name, normalized join key, untouched geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    pub name: String,
    pub key: String,
    /// Raw GeoJSON geometry, handed to the renderer uninterpreted.
    pub geometry: JsonValue,
}

/// The region polygons of the country map. Starts empty; the choropleth
/// simply has nothing to join against until a boundary file is loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoBoundaries {
    pub features: Vec<GeoFeature>,
}

impl GeoBoundaries {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading boundary file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing boundary file {}", path.display()))
    }

    /// Parse a GeoJSON FeatureCollection, computing each feature's join key
    /// with the same fold applied to the survey's region column.
    pub fn parse(text: &str) -> Result<Self> {
        let raw: RawCollection =
            serde_json::from_str(text).context("not a GeoJSON feature collection")?;

        let mut features = Vec::with_capacity(raw.features.len());
        for (i, feature) in raw.features.into_iter().enumerate() {
            let name = feature
                .properties
                .get(NAME_PROPERTY)
                .and_then(JsonValue::as_str)
                .with_context(|| format!("feature {i} has no `{NAME_PROPERTY}` name property"))?
                .to_string();
            let key = normalize_name(&name);
            features.push(GeoFeature {
                name,
                key,
                geometry: feature.geometry,
            });
        }
        Ok(GeoBoundaries { features })
    }

    /// Find a region by its normalized join key.
    pub fn get(&self, key: &str) -> Option<&GeoFeature> {
        self.features.iter().find(|f| f.key == key)
    }

    /// Number of regions in the collection.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection has no regions.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
