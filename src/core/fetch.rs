use crate::domain::model::{FeatureCollection, SourceData};
use crate::utils::error::{MapError, Result};
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_QUAKES_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";
pub const DEFAULT_BOUNDARIES_URL: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_boundaries.json";

/// Downloads GeoJSON FeatureCollections. No retry; the first failure wins.
#[derive(Debug, Clone, Default)]
pub struct GeoJsonFetcher {
    client: Client,
}

impl GeoJsonFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub async fn fetch(&self, url: &str) -> Result<FeatureCollection> {
        tracing::debug!("Requesting GeoJSON from: {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        tracing::debug!("Response status for {}: {}", url, status);

        if !status.is_success() {
            return Err(MapError::HttpStatusError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // 自行解析，讓格式錯誤歸類為資料錯誤而非網路錯誤
        let body = response.bytes().await?;
        let collection: FeatureCollection = serde_json::from_slice(&body)?;

        tracing::info!("📥 Fetched {} features from {}", collection.len(), url);
        Ok(collection)
    }

    /// Issues both requests at once and resolves when both have arrived.
    pub async fn fetch_sources(&self, quakes_url: &str, boundaries_url: &str) -> Result<SourceData> {
        let (quakes, boundaries) =
            tokio::try_join!(self.fetch(quakes_url), self.fetch(boundaries_url))?;

        Ok(SourceData { quakes, boundaries })
    }
}
