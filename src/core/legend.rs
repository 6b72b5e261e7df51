use crate::domain::model::{Legend, MapDocument};
use crate::domain::style::MagnitudeBucket;

pub const LEGEND_CLASS: &str = "legend";
pub const LEGEND_POSITION: &str = "bottomright";

/// Renders the magnitude legend from the same bucket table the markers use.
pub struct LegendRenderer;

impl LegendRenderer {
    pub fn render() -> String {
        let items: String = MagnitudeBucket::ALL
            .iter()
            .map(|bucket| {
                format!(
                    "<li><span style='background:{};'></span>{}</li>",
                    bucket.color(),
                    bucket.label()
                )
            })
            .collect();

        [
            "<div class='my-legend'>",
            "<div class='legend-scale'>",
            "<ul class='legend-labels'>",
            items.as_str(),
            "</ul>",
            "</div>",
            "</div>",
        ]
        .concat()
    }

    /// Fills the legend panel of an already composed map.
    pub fn attach(document: &mut MapDocument) {
        document.legend = Some(Legend {
            position: LEGEND_POSITION.to_string(),
            class_name: LEGEND_CLASS.to_string(),
            html: Self::render(),
        });
    }
}
