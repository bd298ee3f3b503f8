//! GeoJSON `FeatureCollection` of two-point `LineString`s.
use crate::error::ExportError;
use crate::segments::SegmentId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    LineString { coordinates: Vec<[f64; 2]> },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineProperties {
    pub layer: String,
    pub angle_deg: f64,
    /// Length in output coordinates.
    pub length: f64,
    pub sources: Vec<SegmentId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    pub properties: LineProperties,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, ExportError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl Feature {
    pub fn line(p0: [f64; 2], p1: [f64; 2], properties: LineProperties) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry: Geometry::LineString {
                coordinates: vec![p0, p1],
            },
            properties,
        }
    }

    pub fn endpoints(&self) -> Option<([f64; 2], [f64; 2])> {
        match &self.geometry {
            Geometry::LineString { coordinates } if coordinates.len() == 2 => {
                Some((coordinates[0], coordinates[1]))
            }
            Geometry::LineString { .. } => None,
        }
    }
}

pub fn render_geojson(collection: &FeatureCollection) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec_pretty(collection)?)
}
