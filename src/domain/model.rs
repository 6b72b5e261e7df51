use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `[longitude, latitude, (altitude)]`
pub type Position = Vec<f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

fn feature_kind() -> String {
    "Feature".to_string()
}

fn collection_kind() -> String {
    "FeatureCollection".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default)]
    pub properties: Value,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "collection_kind")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// 地震資料中實際會用到的欄位，缺漏時為 None
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuakeProperties {
    pub mag: Option<f64>,
    pub place: Option<String>,
    pub time: Option<i64>,
}

impl Feature {
    pub fn new(properties: Value, geometry: Option<Geometry>) -> Self {
        Self {
            kind: feature_kind(),
            id: None,
            properties,
            geometry,
        }
    }

    pub fn quake_properties(&self) -> QuakeProperties {
        let props = &self.properties;
        QuakeProperties {
            mag: props.get("mag").and_then(Value::as_f64),
            place: props
                .get("place")
                .and_then(Value::as_str)
                .map(str::to_string),
            time: props
                .get("time")
                .and_then(|t| t.as_i64().or_else(|| t.as_f64().map(|ms| ms as i64))),
        }
    }

    /// Marker position for point features.
    pub fn point(&self) -> Option<LatLng> {
        match &self.geometry {
            Some(Geometry::Point { coordinates }) if coordinates.len() >= 2 => Some(LatLng {
                lat: coordinates[1],
                lng: coordinates[0],
            }),
            _ => None,
        }
    }
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: collection_kind(),
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// The two fetched documents, as handed from extract to transform.
#[derive(Debug, Clone)]
pub struct SourceData {
    pub quakes: FeatureCollection,
    pub boundaries: FeatureCollection,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub title: String,
    pub center: LatLng,
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            title: "Earthquakes & Tectonic Plates".to_string(),
            center: LatLng { lat: 0.0, lng: 0.0 },
            zoom: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleMarker {
    pub position: LatLng,
    pub radius: f64,
    pub fill_color: String,
    pub fill_opacity: f64,
    pub stroke: bool,
    /// Full popup with the time printed in UTC.
    pub popup: String,
    /// Popup without the time paragraph; the page appends the viewer's local time.
    pub popup_heading: String,
    pub magnitude: Option<f64>,
    pub place: Option<String>,
    pub time: Option<DateTime<Utc>>,
    /// Raw epoch millis from the feed, handed to `new Date(...)` in the page.
    pub time_ms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathStyle {
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuakeLayer {
    pub markers: Vec<CircleMarker>,
}

/// Every feature is drawn with the one shared `style`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryLayer {
    pub style: PathStyle,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayContent {
    Quakes(QuakeLayer),
    Boundaries(BoundaryLayer),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub name: String,
    pub visible: bool,
    pub layer: OverlayContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub name: String,
    pub tile_id: String,
    pub url_template: String,
    pub attribution: String,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub access_token: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerControl {
    pub collapsed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub position: String,
    pub class_name: String,
    pub html: String,
}

/// Everything the page script needs to draw the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapDocument {
    pub title: String,
    pub mount_id: String,
    pub center: LatLng,
    pub zoom: u8,
    pub base_layers: Vec<TileLayer>,
    pub overlays: Vec<Overlay>,
    pub control: LayerControl,
    pub legend: Option<Legend>,
}

impl MapDocument {
    pub fn overlay(&self, name: &str) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.name == name)
    }

    pub fn quake_layer(&self) -> Option<&QuakeLayer> {
        self.overlays.iter().find_map(|o| match &o.layer {
            OverlayContent::Quakes(layer) => Some(layer),
            _ => None,
        })
    }

    pub fn boundary_layer(&self) -> Option<&BoundaryLayer> {
        self.overlays.iter().find_map(|o| match &o.layer {
            OverlayContent::Boundaries(layer) => Some(layer),
            _ => None,
        })
    }

    pub fn quake_marker_count(&self) -> usize {
        self.quake_layer().map(|l| l.markers.len()).unwrap_or(0)
    }

    pub fn boundary_feature_count(&self) -> usize {
        self.boundary_layer().map(|l| l.features.len()).unwrap_or(0)
    }

    /// Names of the layers shown when the page loads.
    pub fn initial_layers(&self) -> Vec<&str> {
        self.base_layers
            .iter()
            .filter(|b| b.visible)
            .map(|b| b.name.as_str())
            .chain(
                self.overlays
                    .iter()
                    .filter(|o| o.visible)
                    .map(|o| o.name.as_str()),
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_usgs_feature() {
        let raw = json!({
            "type": "Feature",
            "properties": {"mag": 4.6, "place": "10 km SW of Somewhere", "time": 1700000000000i64},
            "geometry": {"type": "Point", "coordinates": [-117.5, 35.7, 8.2]},
            "id": "ci12345"
        });

        let feature: Feature = serde_json::from_value(raw).unwrap();
        let props = feature.quake_properties();
        assert_eq!(props.mag, Some(4.6));
        assert_eq!(props.place.as_deref(), Some("10 km SW of Somewhere"));
        assert_eq!(props.time, Some(1_700_000_000_000));
        assert_eq!(
            feature.point(),
            Some(LatLng {
                lat: 35.7,
                lng: -117.5
            })
        );
    }

    #[test]
    fn test_missing_fields_are_none() {
        let raw = json!({
            "type": "Feature",
            "properties": {"mag": null},
            "geometry": null
        });

        let feature: Feature = serde_json::from_value(raw).unwrap();
        assert_eq!(feature.quake_properties(), QuakeProperties::default());
        assert!(feature.point().is_none());
    }

    #[test]
    fn test_collection_without_features_is_empty() {
        let collection: FeatureCollection =
            serde_json::from_value(json!({"type": "FeatureCollection"})).unwrap();
        assert!(collection.is_empty());
    }

    #[test]
    fn test_boundary_geometry_round_trips_as_geojson() {
        let raw = json!({
            "type": "Feature",
            "properties": {"Name": "AF-AN"},
            "geometry": {"type": "LineString", "coordinates": [[-0.4, -54.8], [0.1, -54.4]]}
        });

        let feature: Feature = serde_json::from_value(raw.clone()).unwrap();
        assert!(matches!(feature.geometry, Some(Geometry::LineString { .. })));
        assert_eq!(serde_json::to_value(&feature).unwrap(), raw);
    }
}
