use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Request to {url} returned HTTP {status}")]
    HttpStatusError { url: String, status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Render error: {message}")]
    RenderError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl MapError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MapError::ApiError(_) | MapError::HttpStatusError { .. } => ErrorCategory::Network,
            MapError::ConfigError { .. }
            | MapError::ConfigValidationError { .. }
            | MapError::InvalidConfigValueError { .. }
            | MapError::MissingConfigError { .. } => ErrorCategory::Configuration,
            MapError::SerializationError(_) | MapError::ProcessingError { .. } => {
                ErrorCategory::Data
            }
            MapError::ZipError(_)
            | MapError::CsvError(_)
            | MapError::IoError(_)
            | MapError::RenderError { .. } => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 遠端服務暫時不可用，重跑即可
            MapError::ApiError(_) | MapError::HttpStatusError { .. } => ErrorSeverity::Medium,
            MapError::ConfigError { .. }
            | MapError::ConfigValidationError { .. }
            | MapError::InvalidConfigValueError { .. }
            | MapError::MissingConfigError { .. }
            | MapError::SerializationError(_)
            | MapError::ProcessingError { .. } => ErrorSeverity::High,
            MapError::IoError(_)
            | MapError::ZipError(_)
            | MapError::CsvError(_)
            | MapError::RenderError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            MapError::ApiError(_) => {
                "Check the network connection and that both data feed URLs are reachable".to_string()
            }
            MapError::HttpStatusError { url, status } if *status >= 500 => {
                format!("The server behind {} is failing; try again later", url)
            }
            MapError::HttpStatusError { url, .. } => {
                format!("Verify the data feed URL is correct: {}", url)
            }
            MapError::SerializationError(_) => {
                "The feed did not return a GeoJSON FeatureCollection; check the URL points at a .geojson document".to_string()
            }
            MapError::ConfigError { .. } | MapError::ConfigValidationError { .. } => {
                "Review the configuration file syntax and values".to_string()
            }
            MapError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' and run again", field)
            }
            MapError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
            MapError::ProcessingError { .. } => {
                "Inspect the input datasets for unexpected structure".to_string()
            }
            MapError::IoError(_) | MapError::ZipError(_) | MapError::CsvError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            MapError::RenderError { .. } => {
                "The page template is broken; this is a bug in quake-map".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not download map data: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Map data could not be processed: {}", self),
            ErrorCategory::Output => format!("Could not write the map: {}", self),
        }
    }

    /// 依嚴重程度決定程式結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
