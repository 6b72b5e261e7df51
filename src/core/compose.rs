use crate::domain::model::{
    BoundaryLayer, LayerControl, MapDocument, MapView, Overlay, OverlayContent, QuakeLayer,
    TileLayer,
};

pub const MOUNT_ID: &str = "map-id";
pub const QUAKES_OVERLAY: &str = "Earthquakes";
pub const BOUNDARIES_OVERLAY: &str = "Boundaries";

pub const TILE_URL_TEMPLATE: &str =
    "https://api.tiles.mapbox.com/v4/{id}/{z}/{x}/{y}.png?access_token={accessToken}";
pub const TILE_ATTRIBUTION: &str = "Map data &copy; <a href=\"https://www.openstreetmap.org/\">OpenStreetMap</a> contributors, <a href=\"https://creativecommons.org/licenses/by-sa/2.0/\">CC-BY-SA</a>, Imagery © <a href=\"https://www.mapbox.com/\">Mapbox</a>";
pub const TILE_MIN_ZOOM: u8 = 3;
pub const TILE_MAX_ZOOM: u8 = 10;

/// (name, tile id); the first entry is shown on load.
pub const BASE_LAYERS: [(&str, &str); 3] = [
    ("Satellite", "mapbox.satellite"),
    ("Grayscale", "mapbox.light"),
    ("Outdoors", "mapbox.outdoors"),
];

/// Assembles the map: base tiles, overlays and the layer control.
#[derive(Debug, Clone)]
pub struct MapComposer {
    view: MapView,
    access_token: String,
}

impl MapComposer {
    pub fn new(view: MapView, access_token: impl Into<String>) -> Self {
        Self {
            view,
            access_token: access_token.into(),
        }
    }

    fn base_layers(&self) -> Vec<TileLayer> {
        BASE_LAYERS
            .iter()
            .enumerate()
            .map(|(i, (name, tile_id))| TileLayer {
                name: name.to_string(),
                tile_id: tile_id.to_string(),
                url_template: TILE_URL_TEMPLATE.to_string(),
                attribution: TILE_ATTRIBUTION.to_string(),
                min_zoom: TILE_MIN_ZOOM,
                max_zoom: TILE_MAX_ZOOM,
                access_token: self.access_token.clone(),
                visible: i == 0,
            })
            .collect()
    }

    pub fn compose(&self, quakes: QuakeLayer, boundaries: BoundaryLayer) -> MapDocument {
        let overlays = vec![
            Overlay {
                name: QUAKES_OVERLAY.to_string(),
                visible: true,
                layer: OverlayContent::Quakes(quakes),
            },
            Overlay {
                name: BOUNDARIES_OVERLAY.to_string(),
                visible: true,
                layer: OverlayContent::Boundaries(boundaries),
            },
        ];

        MapDocument {
            title: self.view.title.clone(),
            mount_id: MOUNT_ID.to_string(),
            center: self.view.center,
            zoom: self.view.zoom,
            base_layers: self.base_layers(),
            overlays,
            control: LayerControl { collapsed: false },
            legend: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layers::FeatureLayerBuilder;
    use crate::domain::model::{FeatureCollection, LatLng};

    fn empty_document() -> MapDocument {
        let builder = FeatureLayerBuilder::new();
        let quakes = builder.build_quake_layer(&FeatureCollection::new(vec![]));
        let boundaries = builder.build_boundary_layer(FeatureCollection::new(vec![]));
        MapComposer::new(MapView::default(), "pk.test-token").compose(quakes, boundaries)
    }

    #[test]
    fn test_default_view() {
        let doc = empty_document();
        assert_eq!(doc.mount_id, "map-id");
        assert_eq!(doc.center, LatLng { lat: 0.0, lng: 0.0 });
        assert_eq!(doc.zoom, 3);
        assert!(!doc.control.collapsed);
        assert!(doc.legend.is_none());
    }

    #[test]
    fn test_three_base_layers_share_the_token() {
        let doc = empty_document();
        let ids: Vec<&str> = doc.base_layers.iter().map(|b| b.tile_id.as_str()).collect();
        assert_eq!(ids, ["mapbox.satellite", "mapbox.light", "mapbox.outdoors"]);
        assert!(doc
            .base_layers
            .iter()
            .all(|b| b.access_token == "pk.test-token" && b.min_zoom == 3 && b.max_zoom == 10));
        // 底圖互斥，只有一個預設顯示
        assert_eq!(doc.base_layers.iter().filter(|b| b.visible).count(), 1);
    }

    #[test]
    fn test_initial_layers() {
        let doc = empty_document();
        assert_eq!(doc.overlays.len(), 2);
        assert_eq!(
            doc.initial_layers(),
            vec!["Satellite", "Earthquakes", "Boundaries"]
        );
        assert!(doc.overlay("Earthquakes").is_some());
        assert!(doc.overlay("Boundaries").is_some());
    }
}
