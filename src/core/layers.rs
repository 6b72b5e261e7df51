use crate::domain::model::{
    BoundaryLayer, CircleMarker, Feature, FeatureCollection, PathStyle, QuakeLayer,
    QuakeProperties,
};
use crate::domain::style::{marker_style, MARKER_FILL_OPACITY};
use chrono::{DateTime, Utc};

pub const BOUNDARY_COLOR: &str = "#0000FF";
pub const BOUNDARY_WEIGHT: f64 = 2.0;
pub const BOUNDARY_OPACITY: f64 = 1.0;

const POPUP_TIME_FORMAT: &str = "%a %b %d %Y %H:%M:%S UTC";

/// Turns raw GeoJSON features into styled overlay primitives.
#[derive(Debug, Clone)]
pub struct FeatureLayerBuilder {
    boundary_style: PathStyle,
}

impl Default for FeatureLayerBuilder {
    fn default() -> Self {
        Self {
            boundary_style: PathStyle {
                color: BOUNDARY_COLOR.to_string(),
                weight: BOUNDARY_WEIGHT,
                opacity: BOUNDARY_OPACITY,
            },
        }
    }
}

impl FeatureLayerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when the feature has no point to anchor the marker on.
    pub fn quake_marker(&self, feature: &Feature) -> Option<CircleMarker> {
        let position = feature.point()?;
        let props = feature.quake_properties();
        // 缺少規模時沿用 NaN，半徑跟著變成 NaN，顏色落在最低區間
        let style = marker_style(props.mag.unwrap_or(f64::NAN));

        Some(CircleMarker {
            position,
            radius: style.radius,
            fill_color: style.fill_color,
            fill_opacity: MARKER_FILL_OPACITY,
            stroke: false,
            popup: quake_popup(&props),
            popup_heading: popup_heading(&props),
            magnitude: props.mag,
            time: props.time.and_then(DateTime::<Utc>::from_timestamp_millis),
            time_ms: props.time,
            place: props.place,
        })
    }

    pub fn build_quake_layer(&self, collection: &FeatureCollection) -> QuakeLayer {
        let mut markers = Vec::with_capacity(collection.len());
        let mut skipped = 0usize;

        for feature in &collection.features {
            match self.quake_marker(feature) {
                Some(marker) => markers.push(marker),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!(
                "⚠️ Skipped {} quake features without a point geometry",
                skipped
            );
        }
        tracing::debug!("Built {} quake markers", markers.len());

        QuakeLayer { markers }
    }

    pub fn build_boundary_layer(&self, collection: FeatureCollection) -> BoundaryLayer {
        tracing::debug!("Built boundary layer with {} features", collection.len());
        BoundaryLayer {
            style: self.boundary_style.clone(),
            features: collection.features,
        }
    }
}

/// Magnitude and place part of the popup, ending with the `<hr>`.
pub fn popup_heading(props: &QuakeProperties) -> String {
    let mag = props.mag.map(js_number).unwrap_or_else(|| "NaN".to_string());
    let place = props
        .place
        .as_deref()
        .map(escape_html)
        .unwrap_or_else(|| "undefined".to_string());

    format!("<h3>{} Magnitude Quake<br>{}</h3><hr>", mag, place)
}

pub fn quake_popup(props: &QuakeProperties) -> String {
    // 頁面會以瀏覽器當地時間覆寫這段，這裡只是 UTC 的備援
    let time = props
        .time
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.format(POPUP_TIME_FORMAT).to_string())
        .unwrap_or_else(|| "Invalid Date".to_string());

    format!("{}<p>{}</p>", popup_heading(props), time)
}

/// Prints a number the way a browser would (`6`, `3.2`, `NaN`, `1e-7`, `1.5e+21`).
fn js_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        return format!("{}Infinity", sign);
    }
    if value == 0.0 {
        // -0 也印成 0
        return "0".to_string();
    }

    let abs = value.abs();
    if (1e-6..1e21).contains(&abs) {
        return value.to_string();
    }

    // JS 的指數表示法：正指數要帶 "+"
    let exp = format!("{:e}", value);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
