use crate::domain::model::MapDocument;
use crate::utils::error::{MapError, Result};

/// One row per quake marker, in overlay order.
pub fn quake_table_csv(document: &MapDocument) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "magnitude",
        "place",
        "time",
        "latitude",
        "longitude",
        "radius",
        "color",
    ])?;

    let markers = document
        .quake_layer()
        .map(|layer| layer.markers.as_slice())
        .unwrap_or_default();

    for marker in markers {
        writer.write_record([
            marker.magnitude.map(|m| m.to_string()).unwrap_or_default(),
            marker.place.clone().unwrap_or_default(),
            marker.time.map(|t| t.to_rfc3339()).unwrap_or_default(),
            marker.position.lat.to_string(),
            marker.position.lng.to_string(),
            marker.radius.to_string(),
            marker.fill_color.clone(),
        ])?;
    }

    writer.into_inner().map_err(|e| MapError::ProcessingError {
        message: format!("Failed to flush CSV output: {}", e),
    })
}
