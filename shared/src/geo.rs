//! Static province reference tables and boundary path generation.

use std::collections::HashMap;
use std::fmt::Write;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::projection::{GeoPoint, MercatorProjection, ProjectionError};

/// Key of the sentinel entity collecting counts without a known province.
pub const UNKNOWN_PROVINCE: &str = "-Unknown-";
/// Turkish display name of [`UNKNOWN_PROVINCE`].
pub const UNKNOWN_PROVINCE_TR: &str = "-Bilinmiyor-";

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("failed to parse reference table: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("feature `{0}` contains a position with fewer than two coordinates")]
    MalformedPosition(String),
    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Polygon(Vec<Vec<Vec<f64>>>),
    MultiPolygon(Vec<Vec<Vec<Vec<f64>>>>),
}

impl Geometry {
    fn polygons(&self) -> Vec<&Vec<Vec<Vec<f64>>>> {
        match self {
            Self::Polygon(rings) => vec![rings],
            Self::MultiPolygon(polygons) => polygons.iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvinceFeature {
    pub properties: FeatureProperties,
    pub geometry: Geometry,
}

impl ProvinceFeature {
    pub fn name(&self) -> &str {
        &self.properties.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FeatureCollection {
    features: Vec<ProvinceFeature>,
}

/// Province centroids, populations and boundaries. Supplied once per render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProvinceTables {
    pub coordinates: HashMap<String, GeoPoint>,
    /// Insertion order drives marker and aggregate ordering.
    pub populations: IndexMap<String, u64>,
    pub boundaries: Vec<ProvinceFeature>,
}

impl ProvinceTables {
    /// Parse the three reference files: `{name: {lat, lon}}`, `{name: population}`
    /// and a GeoJSON-like feature collection whose features carry a `name` property.
    pub fn from_json(
        coordinates: &str,
        populations: &str,
        boundaries: &str,
    ) -> Result<Self, GeoError> {
        let coordinates: HashMap<String, GeoPoint> = serde_json::from_str(coordinates)?;
        let populations: IndexMap<String, u64> = serde_json::from_str(populations)?;
        let collection: FeatureCollection = serde_json::from_str(boundaries)?;
        Ok(Self {
            coordinates,
            populations,
            boundaries: collection.features,
        })
    }

    pub fn population(&self, province: &str) -> u64 {
        self.populations.get(province).copied().unwrap_or(0)
    }

    pub fn total_population(&self) -> u64 {
        self.populations.values().sum()
    }
}

/// SVG path data for a feature's rings, projected to the drawing surface.
pub fn boundary_path(
    feature: &ProvinceFeature,
    projection: &MercatorProjection,
) -> Result<String, GeoError> {
    let mut d = String::new();
    for polygon in feature.geometry.polygons() {
        for ring in polygon {
            for (i, position) in ring.iter().enumerate() {
                // Extra ordinates (altitude) are ignored.
                let (Some(&lon), Some(&lat)) = (position.first(), position.get(1)) else {
                    return Err(GeoError::MalformedPosition(feature.name().to_string()));
                };
                write_vertex(&mut d, i, projection.project(lon, lat)?);
            }
            if !ring.is_empty() {
                d.push('Z');
            }
        }
    }
    Ok(d)
}

fn write_vertex(d: &mut String, i: usize, (x, y): (f64, f64)) {
    let cmd = if i == 0 { 'M' } else { 'L' };
    let _ = write!(d, "{cmd}{x:.2},{y:.2}");
}

#[cfg(test)]
mod tests {
    use super::*;

    const COORDS: &str = r#"{"34": {"lat": 41.0, "lon": 29.0}, "-Unknown-": {"lat": 42.5, "lon": 33.0}}"#;
    const POPULATIONS: &str = r#"{"34": 1000000, "06": 500000}"#;
    const BOUNDARIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "34"},
             "geometry": {"type": "Polygon", "coordinates": [[[28.0, 41.0], [30.0, 41.0], [29.0, 42.0]]]}},
            {"type": "Feature", "properties": {"name": "06"},
             "geometry": {"type": "MultiPolygon", "coordinates": [[[[32.0, 39.0], [33.0, 39.0], [32.5, 40.0, 120.0]]], [[[31.0, 38.0], [31.5, 38.0], [31.2, 38.5]]]]}}
        ]
    }"#;

    fn projection() -> MercatorProjection {
        MercatorProjection::new(GeoPoint { lon: 35.3, lat: 39.0 }, 4200.0, (720.0, 325.0))
            .expect("valid projection")
    }

    #[test]
    fn parses_reference_tables_in_order() {
        let tables = ProvinceTables::from_json(COORDS, POPULATIONS, BOUNDARIES).expect("parse");
        assert_eq!(
            tables.populations.keys().collect::<Vec<_>>(),
            vec!["34", "06"]
        );
        assert_eq!(tables.population("06"), 500_000);
        assert_eq!(tables.population(UNKNOWN_PROVINCE), 0);
        assert_eq!(tables.total_population(), 1_500_000);
        assert_eq!(tables.boundaries.len(), 2);
        assert_eq!(tables.boundaries[1].name(), "06");
        assert_eq!(tables.coordinates["34"], GeoPoint { lon: 29.0, lat: 41.0 });
    }

    #[test]
    fn polygon_path_has_one_closed_ring() {
        let tables = ProvinceTables::from_json(COORDS, POPULATIONS, BOUNDARIES).expect("parse");
        let d = boundary_path(&tables.boundaries[0], &projection()).expect("path");
        assert!(d.starts_with('M'));
        assert_eq!(d.matches('M').count(), 1);
        assert_eq!(d.matches('L').count(), 2);
        assert!(d.ends_with('Z'));
    }

    #[test]
    fn multipolygon_path_ignores_altitude_and_closes_each_ring() {
        let tables = ProvinceTables::from_json(COORDS, POPULATIONS, BOUNDARIES).expect("parse");
        let d = boundary_path(&tables.boundaries[1], &projection()).expect("path");
        assert_eq!(d.matches('M').count(), 2);
        assert_eq!(d.matches('Z').count(), 2);
    }

    #[test]
    fn short_positions_are_rejected() {
        let feature = ProvinceFeature {
            properties: FeatureProperties { name: "bad".into() },
            geometry: Geometry::Polygon(vec![vec![vec![1.0]]]),
        };
        assert!(matches!(
            boundary_path(&feature, &projection()),
            Err(GeoError::MalformedPosition(name)) if name == "bad"
        ));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(
            ProvinceTables::from_json("{", POPULATIONS, BOUNDARIES),
            Err(GeoError::Parse(_))
        ));
    }
}
