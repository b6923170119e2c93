//! Detected ocean features and their GeoJSON form.
//!
//! Each feature serializes as a GeoJSON `Feature` object:
//!
//! ```json
//! {
//!   "type": "Feature",
//!   "properties": { "feature_type": "thermal_front", "strength": 1.2, "threshold": 0.5, "id": "front_0" },
//!   "geometry": { "type": "LineString", "coordinates": [[-74.0, 38.0], ...] }
//! }
//! ```
//!
//! Coordinates are always `[lon, lat]`.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::coords::GeoPoint;

/// Open polyline along a band of rapid temperature change.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalFront {
    /// Index of the contour this front was traced from.
    pub id: usize,
    /// At least three points.
    pub geometry: Vec<GeoPoint>,
    /// Mean gradient magnitude along the line (field units per km).
    pub strength: f64,
    /// Threshold the front was detected with.
    pub threshold: f64,
}

/// Closed ring around a productivity boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ChlorophyllEdge {
    pub id: usize,
    /// Closed ring, `first == last`, at least four points.
    pub ring: Vec<GeoPoint>,
    /// Enclosed area in square pixels (before simplification).
    pub area_px: f64,
    /// Ring length in pixels (before simplification).
    pub perimeter_px: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EddyType {
    WarmCore,
    ColdCore,
}

impl fmt::Display for EddyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WarmCore => f.write_str("warm_core"),
            Self::ColdCore => f.write_str("cold_core"),
        }
    }
}

/// Circular approximation of a rotation-dominated region.
#[derive(Debug, Clone, PartialEq)]
pub struct Eddy {
    /// Label of the region the eddy was derived from.
    pub id: u32,
    /// 32 circle vertices plus the closing vertex.
    pub ring: Vec<GeoPoint>,
    pub eddy_type: EddyType,
    pub radius_km: f64,
    pub centroid_lon: f64,
    pub centroid_lat: f64,
    /// Mean smoothed Okubo-Weiss value inside the region.
    pub okubo_weiss: f64,
    /// Region mean minus the field mean.
    pub anomaly: f64,
}

/// Any detected feature.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    ThermalFront(ThermalFront),
    ChlorophyllEdge(ChlorophyllEdge),
    Eddy(Eddy),
}

impl Feature {
    /// Value of the `feature_type` property.
    pub fn feature_type(&self) -> &'static str {
        match self {
            Self::ThermalFront(_) => "thermal_front",
            Self::ChlorophyllEdge(_) => "chlorophyll_edge",
            Self::Eddy(_) => "eddy",
        }
    }

    /// String id, unique per feature type within one detection call.
    pub fn id(&self) -> String {
        match self {
            Self::ThermalFront(f) => format!("front_{}", f.id),
            Self::ChlorophyllEdge(e) => format!("edge_{}", e.id),
            Self::Eddy(e) => format!("eddy_{}", e.id),
        }
    }

    /// Vertices of the feature geometry.
    pub fn coordinates(&self) -> &[GeoPoint] {
        match self {
            Self::ThermalFront(f) => &f.geometry,
            Self::ChlorophyllEdge(e) => &e.ring,
            Self::Eddy(e) => &e.ring,
        }
    }
}

impl From<ThermalFront> for Feature {
    fn from(front: ThermalFront) -> Self {
        Self::ThermalFront(front)
    }
}

impl From<ChlorophyllEdge> for Feature {
    fn from(edge: ChlorophyllEdge) -> Self {
        Self::ChlorophyllEdge(edge)
    }
}

impl From<Eddy> for Feature {
    fn from(eddy: Eddy) -> Self {
        Self::Eddy(eddy)
    }
}

// ============================================================================
// GeoJSON serialization
// ============================================================================

#[derive(Serialize)]
#[serde(tag = "type", content = "coordinates")]
enum Geometry<'a> {
    LineString(&'a [GeoPoint]),
    Polygon([&'a [GeoPoint]; 1]),
}

#[derive(Serialize)]
struct FrontProperties {
    feature_type: &'static str,
    strength: f64,
    threshold: f64,
    id: String,
}

#[derive(Serialize)]
struct EdgeProperties {
    feature_type: &'static str,
    area_pixels: f64,
    perimeter_pixels: f64,
    id: String,
}

#[derive(Serialize)]
struct EddyProperties {
    feature_type: &'static str,
    eddy_type: EddyType,
    radius_km: f64,
    centroid_lat: f64,
    centroid_lon: f64,
    okubo_weiss: f64,
    sst_anomaly: f64,
    id: String,
}

impl Serialize for Feature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("type", "Feature")?;
        let feature_type = self.feature_type();
        let id = self.id();
        match self {
            Self::ThermalFront(front) => {
                map.serialize_entry(
                    "properties",
                    &FrontProperties {
                        feature_type,
                        strength: front.strength,
                        threshold: front.threshold,
                        id,
                    },
                )?;
                map.serialize_entry("geometry", &Geometry::LineString(&front.geometry))?;
            }
            Self::ChlorophyllEdge(edge) => {
                map.serialize_entry(
                    "properties",
                    &EdgeProperties {
                        feature_type,
                        area_pixels: edge.area_px,
                        perimeter_pixels: edge.perimeter_px,
                        id,
                    },
                )?;
                map.serialize_entry("geometry", &Geometry::Polygon([&edge.ring]))?;
            }
            Self::Eddy(eddy) => {
                map.serialize_entry(
                    "properties",
                    &EddyProperties {
                        feature_type,
                        eddy_type: eddy.eddy_type,
                        radius_km: eddy.radius_km,
                        centroid_lat: eddy.centroid_lat,
                        centroid_lon: eddy.centroid_lon,
                        okubo_weiss: eddy.okubo_weiss,
                        sst_anomaly: eddy.anomaly,
                        id,
                    },
                )?;
                map.serialize_entry("geometry", &Geometry::Polygon([&eddy.ring]))?;
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn square() -> Vec<GeoPoint> {
        vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 0.0),
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(0.0, 0.0),
        ]
    }

    #[test]
    fn test_front_serializes_as_line_string() {
        let feature = Feature::from(ThermalFront {
            id: 3,
            geometry: vec![
                GeoPoint::new(-74.0, 38.0),
                GeoPoint::new(-74.0, 38.1),
                GeoPoint::new(-74.1, 38.2),
            ],
            strength: 1.25,
            threshold: 0.5,
        });

        let value = serde_json::to_value(&feature).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "Feature",
                "properties": {
                    "feature_type": "thermal_front",
                    "strength": 1.25,
                    "threshold": 0.5,
                    "id": "front_3"
                },
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[-74.0, 38.0], [-74.0, 38.1], [-74.1, 38.2]]
                }
            })
        );
    }

    #[test]
    fn test_edge_serializes_as_polygon() {
        let feature = Feature::from(ChlorophyllEdge {
            id: 0,
            ring: square(),
            area_px: 42.0,
            perimeter_px: 30.5,
        });

        let value = serde_json::to_value(&feature).unwrap();
        assert_eq!(value["properties"]["feature_type"], "chlorophyll_edge");
        assert_eq!(value["properties"]["area_pixels"], 42.0);
        assert_eq!(value["properties"]["perimeter_pixels"], 30.5);
        assert_eq!(value["properties"]["id"], "edge_0");
        assert_eq!(value["geometry"]["type"], "Polygon");
        let rings = value["geometry"]["coordinates"].as_array().unwrap();
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_eddy_properties() {
        let feature = Feature::from(Eddy {
            id: 7,
            ring: square(),
            eddy_type: EddyType::WarmCore,
            radius_km: 25.0,
            centroid_lon: -70.5,
            centroid_lat: 36.0,
            okubo_weiss: -1.5e-9,
            anomaly: 0.8,
        });

        let value: Value = serde_json::to_value(&feature).unwrap();
        let props = &value["properties"];
        assert_eq!(props["feature_type"], "eddy");
        assert_eq!(props["eddy_type"], "warm_core");
        assert_eq!(props["sst_anomaly"], 0.8);
        assert_eq!(props["id"], "eddy_7");
        assert_eq!(feature.coordinates().len(), 4);
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let feature = Feature::from(ChlorophyllEdge {
            id: 1,
            ring: square(),
            area_px: 1.0,
            perimeter_px: 4.0,
        });
        let a = serde_json::to_string(&feature).unwrap();
        let b = serde_json::to_string(&feature.clone()).unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with(r#"{"type":"Feature","properties":{"feature_type""#));
    }

    #[test]
    fn test_eddy_type_display_matches_serde() {
        for t in [EddyType::WarmCore, EddyType::ColdCore] {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{t}\""));
        }
    }
}
