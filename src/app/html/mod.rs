//! Standalone HTML page for a composed map.
//!
//! The page pulls Leaflet from a CDN and draws the embedded map document as
//! is; all styling and popup text is decided before it gets here.

use crate::core::layers::escape_html;
use crate::domain::model::MapDocument;
use crate::utils::error::{MapError, Result};
use regex::{Captures, Regex};

pub const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">

<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" crossorigin="" />
  <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js" crossorigin=""></script>
  <style>
    html, body { height: 100%; margin: 0; padding: 0; }
    #{{MOUNT_ID}} { height: 100%; width: 100%; }
    .legend { background: white; padding: 6px 10px; border-radius: 4px; line-height: 18px; }
    .legend-labels { margin: 0; padding: 0; list-style: none; }
    .legend-labels li { font-size: 80%; margin-bottom: 2px; }
    .legend-labels li span { display: inline-block; height: 14px; width: 28px; margin-right: 6px; vertical-align: middle; }
  </style>
</head>

<body>
  <div id="{{MOUNT_ID}}"></div>

  <script id="map-document" type="application/json">{{MAP_DOCUMENT}}</script>
  <script>
    (function () {
      const doc = JSON.parse(document.getElementById("map-document").textContent);

      const baseMaps = {};
      const initial = [];
      doc.base_layers.forEach(function (b) {
        const layer = L.tileLayer(b.url_template, {
          attribution: b.attribution,
          maxZoom: b.max_zoom,
          minZoom: b.min_zoom,
          id: b.tile_id,
          accessToken: b.access_token
        });
        baseMaps[b.name] = layer;
        if (b.visible) initial.push(layer);
      });

      const overlayMaps = {};
      const visibleOverlays = [];
      doc.overlays.forEach(function (o) {
        let layer;
        if (o.layer.kind === "quakes") {
          layer = L.layerGroup(o.layer.markers.map(function (m) {
            return L.circleMarker([m.position.lat, m.position.lng], {
              stroke: m.stroke,
              radius: m.radius,
              fillColor: m.fill_color,
              fillOpacity: m.fill_opacity
            }).bindPopup(m.time_ms === null
              ? m.popup
              : m.popup_heading + "<p>" + new Date(m.time_ms) + "</p>");
          }));
        } else {
          layer = L.geoJSON({ type: "FeatureCollection", features: o.layer.features }, {
            style: o.layer.style
          });
        }
        overlayMaps[o.name] = layer;
        if (o.visible) visibleOverlays.push(layer);
      });

      // Markers go on top of the plate lines.
      const map = L.map(doc.mount_id, {
        center: [doc.center.lat, doc.center.lng],
        zoom: doc.zoom,
        layers: initial.concat(visibleOverlays.reverse())
      });

      L.control.layers(baseMaps, overlayMaps, {
        collapsed: doc.control.collapsed
      }).addTo(map);

      if (doc.legend) {
        const legend = L.control({ position: doc.legend.position });
        legend.onAdd = function () {
          return L.DomUtil.create("div", doc.legend.class_name);
        };
        legend.addTo(map);
        document.querySelector("." + doc.legend.class_name).innerHTML = doc.legend.html;
      }
    })();
  </script>
</body>

</html>
"##;

fn is_valid_mount_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub fn render_page(document: &MapDocument) -> Result<String> {
    if !is_valid_mount_id(&document.mount_id) {
        return Err(MapError::RenderError {
            message: format!("invalid mount point id '{}'", document.mount_id),
        });
    }

    let json = escape_json_for_script(&serde_json::to_string(document)?);
    let title = escape_html(&document.title);

    // 單次替換，填入的內容不會再被當成佔位符
    let placeholder = Regex::new(r"\{\{(TITLE|MOUNT_ID|MAP_DOCUMENT)\}\}").map_err(|e| {
        MapError::RenderError {
            message: format!("placeholder pattern: {}", e),
        }
    })?;

    let page = placeholder.replace_all(PAGE_TEMPLATE, |caps: &Captures| match &caps[1] {
        "TITLE" => title.clone(),
        "MOUNT_ID" => document.mount_id.clone(),
        _ => json.clone(),
    });

    Ok(page.into_owned())
}

/// `<`, `>` and `&` only occur inside JSON strings, so their `\uXXXX` forms
/// parse back to the same document while keeping the script block closed.
fn escape_json_for_script(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compose::MapComposer;
    use crate::core::layers::FeatureLayerBuilder;
    use crate::core::legend::LegendRenderer;
    use crate::domain::model::{Feature, FeatureCollection, Geometry, MapView};
    use serde_json::json;

    fn document_with_place(place: &str) -> MapDocument {
        let builder = FeatureLayerBuilder::new();
        let quakes = builder.build_quake_layer(&FeatureCollection::new(vec![Feature::new(
            json!({"mag": 2.0, "place": place, "time": 0}),
            Some(Geometry::Point {
                coordinates: vec![1.0, 2.0],
            }),
        )]));
        let boundaries = builder.build_boundary_layer(FeatureCollection::new(vec![]));
        let mut doc = MapComposer::new(MapView::default(), "token").compose(quakes, boundaries);
        LegendRenderer::attach(&mut doc);
        doc
    }

    fn embedded_document(page: &str) -> serde_json::Value {
        let start = page.find(r#"type="application/json">"#).unwrap() + 24;
        let end = start + page[start..].find("</script>").unwrap();
        serde_json::from_str(&page[start..end]).unwrap()
    }

    #[test]
    fn test_page_has_mount_point_and_document() {
        let page = render_page(&document_with_place("Crete")).unwrap();
        assert!(page.contains(r#"<div id="map-id"></div>"#));
        assert!(!page.contains("{{"));

        let doc = embedded_document(&page);
        assert_eq!(doc["overlays"].as_array().unwrap().len(), 2);
        assert_eq!(doc["legend"]["class_name"], "legend");
        assert_eq!(doc["overlays"][0]["layer"]["kind"], "quakes");
        assert_eq!(doc["overlays"][1]["layer"]["kind"], "boundaries");
    }

    #[test]
    fn test_script_close_in_data_cannot_break_out() {
        let mut doc = document_with_place("x");
        doc.title = "</script><b>".to_string();
        if let Some(legend) = doc.legend.as_mut() {
            legend.html.push_str("</script>");
        }

        let page = render_page(&doc).unwrap();
        // 只剩範本自己的兩個 </script>，加上 Leaflet 載入的那一個
        assert_eq!(page.matches("</script>").count(), 3);
        assert!(page.contains("<title>&lt;/script&gt;&lt;b&gt;</title>"));
        assert!(embedded_document(&page)["legend"]["html"]
            .as_str()
            .unwrap()
            .ends_with("</script>"));
    }

    #[test]
    fn test_comment_open_in_data_cannot_swallow_the_page() {
        let page = render_page(&document_with_place("<!--<script>")).unwrap();

        let start = page.find(r#"type="application/json">"#).unwrap();
        let end = start + page[start..].find("</script>").unwrap();
        let block = &page[start..end];
        assert!(!block.contains("<!--"));
        assert!(!block.contains("<script"));
        assert!(block.contains("\\u003c!--\\u003cscript\\u003e"));

        let doc = embedded_document(&page);
        let marker = &doc["overlays"][0]["layer"]["markers"][0];
        assert_eq!(marker["place"], "<!--<script>");
        assert!(marker["popup"]
            .as_str()
            .unwrap()
            .contains("&lt;!--&lt;script&gt;"));
        assert_eq!(page.matches("</script>").count(), 3);
    }

    #[test]
    fn test_placeholder_text_in_title_is_not_expanded() {
        let mut doc = document_with_place("x");
        doc.title = "{{MAP_DOCUMENT}} & {{MOUNT_ID}}".to_string();

        let page = render_page(&doc).unwrap();
        assert!(page.contains("<title>{{MAP_DOCUMENT}} &amp; {{MOUNT_ID}}</title>"));
        assert_eq!(page.matches(r#""overlays""#).count(), 1);
        assert_eq!(embedded_document(&page)["title"], "{{MAP_DOCUMENT}} & {{MOUNT_ID}}");
    }

    #[test]
    fn test_popup_time_is_formatted_by_the_browser() {
        assert!(PAGE_TEMPLATE.contains("new Date(m.time_ms)"));

        let page = render_page(&document_with_place("Crete")).unwrap();
        let marker = &embedded_document(&page)["overlays"][0]["layer"]["markers"][0];
        assert_eq!(marker["time_ms"], 0);
        assert_eq!(
            marker["popup_heading"],
            "<h3>2 Magnitude Quake<br>Crete</h3><hr>"
        );
    }

    #[test]
    fn test_bad_mount_id_is_rejected() {
        let mut doc = document_with_place("x");
        doc.mount_id = "map id\"".to_string();
        assert!(matches!(render_page(&doc), Err(MapError::RenderError { .. })));
    }
}
