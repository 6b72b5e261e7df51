use crate::domain::model::{MapDocument, MapView, SourceData};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn quakes_url(&self) -> &str;
    fn boundaries_url(&self) -> &str;
    fn access_token(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];

    /// 若有值，額外輸出 zip 打包檔
    fn bundle_filename(&self) -> Option<&str> {
        None
    }

    fn request_timeout(&self) -> Option<Duration> {
        None
    }

    fn map_view(&self) -> MapView {
        MapView::default()
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SourceData>;
    async fn transform(&self, data: SourceData) -> Result<MapDocument>;
    async fn load(&self, document: MapDocument) -> Result<String>;
}
