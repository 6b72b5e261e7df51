use crate::app::export::quake_table_csv;
use crate::app::html::render_page;
use crate::core::compose::MapComposer;
use crate::core::fetch::GeoJsonFetcher;
use crate::core::layers::FeatureLayerBuilder;
use crate::core::legend::LegendRenderer;
use crate::core::{ConfigProvider, MapDocument, Pipeline, SourceData, Storage};
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const HTML_FILENAME: &str = "quake_map.html";
pub const JSON_FILENAME: &str = "quake_map.json";
pub const CSV_FILENAME: &str = "quakes.csv";

pub struct QuakeMapPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) fetcher: GeoJsonFetcher,
    pub(crate) builder: FeatureLayerBuilder,
}

impl<S: Storage, C: ConfigProvider> QuakeMapPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let fetcher = GeoJsonFetcher::with_timeout(config.request_timeout())?;
        Ok(Self {
            storage,
            config,
            fetcher,
            builder: FeatureLayerBuilder::new(),
        })
    }

    /// 依設定的格式產生輸出檔案 (檔名, 內容)
    fn render_artifacts(&self, document: &MapDocument) -> Result<Vec<(&'static str, Vec<u8>)>> {
        let formats = self.config.output_formats();
        let mut artifacts = Vec::with_capacity(formats.len() + 1);

        // HTML 一律輸出
        artifacts.push((HTML_FILENAME, render_page(document)?.into_bytes()));

        if formats.iter().any(|f| f == "json") {
            artifacts.push((JSON_FILENAME, serde_json::to_vec_pretty(document)?));
        }
        if formats.iter().any(|f| f == "csv") {
            artifacts.push((CSV_FILENAME, quake_table_csv(document)?));
        }

        Ok(artifacts)
    }
}

fn bundle(artifacts: &[(&str, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for (name, data) in artifacts {
        zip.start_file(*name, SimpleFileOptions::default())?;
        zip.write_all(data)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for QuakeMapPipeline<S, C> {
    async fn extract(&self) -> Result<SourceData> {
        tracing::debug!(
            "Fetching quakes from {} and boundaries from {}",
            self.config.quakes_url(),
            self.config.boundaries_url()
        );
        self.fetcher
            .fetch_sources(self.config.quakes_url(), self.config.boundaries_url())
            .await
    }

    async fn transform(&self, data: SourceData) -> Result<MapDocument> {
        let quakes = self.builder.build_quake_layer(&data.quakes);
        let boundaries = self.builder.build_boundary_layer(data.boundaries);

        let composer = MapComposer::new(self.config.map_view(), self.config.access_token());
        let mut document = composer.compose(quakes, boundaries);
        LegendRenderer::attach(&mut document);

        Ok(document)
    }

    async fn load(&self, document: MapDocument) -> Result<String> {
        let artifacts = self.render_artifacts(&document)?;

        for (name, data) in &artifacts {
            tracing::debug!("Writing {} ({} bytes)", name, data.len());
            self.storage.write_file(name, data).await?;
        }

        let primary = match self.config.bundle_filename() {
            Some(bundle_name) => {
                let zip_data = bundle(&artifacts)?;
                tracing::debug!("Writing bundle {} ({} bytes)", bundle_name, zip_data.len());
                self.storage.write_file(bundle_name, &zip_data).await?;
                bundle_name
            }
            None => HTML_FILENAME,
        };

        Ok(format!("{}/{}", self.config.output_path(), primary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Feature, FeatureCollection, Geometry, MapView};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                crate::utils::error::MapError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct TestConfig {
        formats: Vec<String>,
        bundle: Option<String>,
    }

    impl ConfigProvider for TestConfig {
        fn quakes_url(&self) -> &str {
            "http://127.0.0.1:1/quakes"
        }

        fn boundaries_url(&self) -> &str {
            "http://127.0.0.1:1/boundaries"
        }

        fn access_token(&self) -> &str {
            "pk.test"
        }

        fn output_path(&self) -> &str {
            "./out"
        }

        fn output_formats(&self) -> &[String] {
            &self.formats
        }

        fn bundle_filename(&self) -> Option<&str> {
            self.bundle.as_deref()
        }

        fn map_view(&self) -> MapView {
            MapView {
                title: "Test map".to_string(),
                ..MapView::default()
            }
        }
    }

    fn sources() -> SourceData {
        SourceData {
            quakes: FeatureCollection::new(vec![Feature::new(
                serde_json::json!({"mag": 5.5, "place": "Peru", "time": 0}),
                Some(Geometry::Point {
                    coordinates: vec![-75.0, -10.0],
                }),
            )]),
            boundaries: FeatureCollection::new(vec![Feature::new(
                serde_json::json!({"Name": "NZ-SA"}),
                Some(Geometry::LineString {
                    coordinates: vec![vec![-80.0, -10.0], vec![-81.0, -12.0]],
                }),
            )]),
        }
    }

    #[tokio::test]
    async fn test_transform_attaches_legend() {
        let storage = MockStorage::default();
        let config = TestConfig {
            formats: vec!["html".to_string()],
            bundle: None,
        };
        let pipeline = QuakeMapPipeline::new(storage, config).unwrap();

        let doc = pipeline.transform(sources()).await.unwrap();
        assert_eq!(doc.title, "Test map");
        assert_eq!(doc.quake_marker_count(), 1);
        assert_eq!(doc.boundary_feature_count(), 1);
        assert!(doc.legend.is_some());
        assert!(doc.base_layers.iter().all(|b| b.access_token == "pk.test"));
    }

    #[tokio::test]
    async fn test_load_writes_requested_formats_and_bundle() {
        let storage = MockStorage::default();
        let config = TestConfig {
            formats: vec!["html".to_string(), "json".to_string(), "csv".to_string()],
            bundle: Some("quake_map.zip".to_string()),
        };
        let pipeline = QuakeMapPipeline::new(storage.clone(), config).unwrap();

        let doc = pipeline.transform(sources()).await.unwrap();
        let output = pipeline.load(doc).await.unwrap();
        assert_eq!(output, "./out/quake_map.zip");

        let files = storage.files.lock().await;
        for name in [HTML_FILENAME, JSON_FILENAME, CSV_FILENAME, "quake_map.zip"] {
            assert!(files.contains_key(name), "missing {}", name);
        }

        let archive = zip::ZipArchive::new(std::io::Cursor::new(files["quake_map.zip"].clone()))
            .unwrap();
        assert_eq!(archive.len(), 3);
    }

    #[tokio::test]
    async fn test_load_html_only() {
        let storage = MockStorage::default();
        let config = TestConfig {
            formats: vec!["html".to_string()],
            bundle: None,
        };
        let pipeline = QuakeMapPipeline::new(storage.clone(), config).unwrap();

        let doc = pipeline.transform(sources()).await.unwrap();
        let output = pipeline.load(doc).await.unwrap();
        assert_eq!(output, "./out/quake_map.html");

        let files = storage.files.lock().await;
        assert_eq!(files.len(), 1);
        drop(files);

        let page = String::from_utf8(storage.read_file(HTML_FILENAME).await.unwrap()).unwrap();
        assert!(page.contains("Peru"));
        assert!(storage.read_file(JSON_FILENAME).await.is_err());
    }
}
