pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::app::pipelines::QuakeMapPipeline;
pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::engine::MapEngine;
pub use crate::utils::error::{MapError, Result};
