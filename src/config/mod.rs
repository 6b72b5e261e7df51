pub mod cli;
pub mod toml_config;

pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_BUNDLE_FILENAME: &str = "quake_map.zip";

#[cfg(feature = "cli")]
pub use args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use super::{DEFAULT_BUNDLE_FILENAME, DEFAULT_OUTPUT_PATH};
    use crate::core::fetch::{DEFAULT_BOUNDARIES_URL, DEFAULT_QUAKES_URL};
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use std::time::Duration;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "quake-map")]
    #[command(about = "Build an interactive earthquake and tectonic plate map")]
    pub struct CliConfig {
        #[arg(long, default_value = DEFAULT_QUAKES_URL)]
        pub quakes_url: String,

        #[arg(long, default_value = DEFAULT_BOUNDARIES_URL)]
        pub boundaries_url: String,

        #[arg(
            long,
            env = "MAPBOX_ACCESS_TOKEN",
            default_value = "",
            hide_env_values = true,
            help = "Tile service access token"
        )]
        pub access_token: String,

        #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
        pub output_path: String,

        #[arg(long, value_delimiter = ',', default_value = "html")]
        pub output_formats: Vec<String>,

        #[arg(long, help = "Also write a zip bundle of every output file")]
        pub bundle: bool,

        #[arg(long, help = "Per-request timeout; unset means wait indefinitely")]
        pub timeout_seconds: Option<u64>,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log per-phase timing and memory usage")]
        pub monitor: bool,
    }

    impl ConfigProvider for CliConfig {
        fn quakes_url(&self) -> &str {
            &self.quakes_url
        }

        fn boundaries_url(&self) -> &str {
            &self.boundaries_url
        }

        fn access_token(&self) -> &str {
            &self.access_token
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn bundle_filename(&self) -> Option<&str> {
            self.bundle.then_some(DEFAULT_BUNDLE_FILENAME)
        }

        fn request_timeout(&self) -> Option<Duration> {
            self.timeout_seconds.map(Duration::from_secs)
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_url("quakes_url", &self.quakes_url)?;
            validation::validate_url("boundaries_url", &self.boundaries_url)?;
            validation::validate_path("output_path", &self.output_path)?;
            validation::validate_output_formats("output_formats", &self.output_formats)?;
            if let Some(timeout) = self.timeout_seconds {
                validation::validate_range("timeout_seconds", timeout, 1, u64::MAX)?;
            }
            validation::warn_if_blank_token("access_token", &self.access_token);
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = CliConfig::parse_from(["quake-map", "--access-token", "pk.abc"]);
            assert_eq!(config.quakes_url, DEFAULT_QUAKES_URL);
            assert_eq!(config.boundaries_url, DEFAULT_BOUNDARIES_URL);
            assert_eq!(config.output_formats, vec!["html".to_string()]);
            assert!(config.bundle_filename().is_none());
            assert!(config.request_timeout().is_none());
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_formats_and_bundle() {
            let config = CliConfig::parse_from([
                "quake-map",
                "--output-formats",
                "html,json,csv",
                "--bundle",
                "--timeout-seconds",
                "30",
            ]);
            assert_eq!(config.output_formats.len(), 3);
            assert_eq!(config.bundle_filename(), Some("quake_map.zip"));
            assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        }

        #[test]
        fn test_rejects_bad_values() {
            let config = CliConfig::parse_from(["quake-map", "--output-formats", "html,pdf"]);
            assert!(config.validate().is_err());

            let config = CliConfig::parse_from(["quake-map", "--quakes-url", "file:///tmp/q.json"]);
            assert!(config.validate().is_err());

            let config = CliConfig::parse_from(["quake-map", "--timeout-seconds", "0"]);
            assert!(config.validate().is_err());
        }
    }
}
