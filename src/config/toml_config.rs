use super::{DEFAULT_BUNDLE_FILENAME, DEFAULT_OUTPUT_PATH};
use crate::core::fetch::{DEFAULT_BOUNDARIES_URL, DEFAULT_QUAKES_URL};
use crate::core::ConfigProvider;
use crate::domain::model::{LatLng, MapView};
use crate::utils::error::{MapError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub map: MapConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub tiles: TilesConfig,
    #[serde(default)]
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub name: String,
    pub title: Option<String>,
    /// `[lat, lng]`
    pub center: Option<[f64; 2]>,
    pub zoom: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_quakes_url")]
    pub quakes: String,
    #[serde(default = "default_boundaries_url")]
    pub boundaries: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TilesConfig {
    #[serde(default)]
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    #[serde(default = "default_bundle_filename")]
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn default_quakes_url() -> String {
    DEFAULT_QUAKES_URL.to_string()
}

fn default_boundaries_url() -> String {
    DEFAULT_BOUNDARIES_URL.to_string()
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

fn default_output_formats() -> Vec<String> {
    vec!["html".to_string()]
}

fn default_bundle_filename() -> String {
    DEFAULT_BUNDLE_FILENAME.to_string()
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            quakes: default_quakes_url(),
            boundaries: default_boundaries_url(),
            timeout_seconds: None,
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            output_formats: default_output_formats(),
            compression: None,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MapError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MAPBOX_ACCESS_TOKEN})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MapError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn bundle_enabled(&self) -> bool {
        self.load
            .compression
            .as_ref()
            .map(|c| c.enabled)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn quakes_url(&self) -> &str {
        &self.sources.quakes
    }

    fn boundaries_url(&self) -> &str {
        &self.sources.boundaries
    }

    fn access_token(&self) -> &str {
        &self.tiles.access_token
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn bundle_filename(&self) -> Option<&str> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.sources.timeout_seconds.map(Duration::from_secs)
    }

    fn map_view(&self) -> MapView {
        let defaults = MapView::default();
        MapView {
            title: self.map.title.clone().unwrap_or(defaults.title),
            center: self
                .map
                .center
                .map(|[lat, lng]| LatLng { lat, lng })
                .unwrap_or(defaults.center),
            zoom: self.map.zoom.unwrap_or(defaults.zoom),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("sources.quakes", &self.sources.quakes)?;
        validation::validate_url("sources.boundaries", &self.sources.boundaries)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_output_formats("load.output_formats", &self.load.output_formats)?;

        if let Some(timeout) = self.sources.timeout_seconds {
            validation::validate_range("sources.timeout_seconds", timeout, 1, u64::MAX)?;
        }
        if let Some(zoom) = self.map.zoom {
            validation::validate_range("map.zoom", zoom, 0, 18)?;
        }
        if let Some([lat, lng]) = self.map.center {
            validation::validate_range("map.center.lat", lat, -90.0, 90.0)?;
            validation::validate_range("map.center.lng", lng, -180.0, 180.0)?;
        }
        if let Some(compression) = self.load.compression.as_ref().filter(|c| c.enabled) {
            validation::validate_path("load.compression.filename", &compression.filename)?;
        }

        if self.tiles.access_token.contains("${") {
            tracing::warn!("⚠️ tiles.access_token references an unset environment variable");
        }
        validation::warn_if_blank_token("tiles.access_token", &self.tiles.access_token);
        Ok(())
    }
}
