//! Configuration Builder
//!
//! Builds Configuration instances from defaults, an optional configuration
//! file, and CLI arguments, in that precedence order (CLI wins).

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::{Configuration, DetectionConfig, IngestConfig, MalformedLinePolicy, OutputConfig};
use crate::cli::Cli;
use crate::errors::LoghoundError;

/// On-disk shape: every field optional so a file can override just the
/// knobs it cares about.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    login_threshold: Option<usize>,
    window_secs: Option<u64>,
    size_floor_mb: Option<u64>,
    min_transfer_count: Option<usize>,
    on_malformed: Option<MalformedLinePolicy>,
}

#[derive(Debug, Default)]
pub struct ConfigurationBuilder {
    detection: DetectionConfig,
    ingest: IngestConfig,
    output: OutputConfig,
}

impl ConfigurationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load overrides from a YAML, JSON, or TOML file, auto-detected by
    /// extension with a content sniff as fallback.
    pub fn from_config_file<P: AsRef<Path>>(self, path: P) -> Result<Self, LoghoundError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| LoghoundError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => self.from_json_str(&content),
            Some("toml") => self.from_toml_str(&content),
            Some("yaml") | Some("yml") => self.from_yaml_str(&content),
            _ if content.trim_start().starts_with('{') => self.from_json_str(&content),
            _ => self.from_yaml_str(&content),
        }
    }

    pub fn from_yaml_str(mut self, yaml: &str) -> Result<Self, LoghoundError> {
        let file: FileConfig =
            serde_yaml::from_str(yaml).map_err(|e| LoghoundError::ConfigError {
                message: format!("Failed to parse YAML config: {}", e),
            })?;
        self.apply_file(file);
        Ok(self)
    }

    pub fn from_json_str(mut self, json: &str) -> Result<Self, LoghoundError> {
        let file: FileConfig =
            serde_json::from_str(json).map_err(|e| LoghoundError::ConfigError {
                message: format!("Failed to parse JSON config: {}", e),
            })?;
        self.apply_file(file);
        Ok(self)
    }

    pub fn from_toml_str(mut self, toml_str: &str) -> Result<Self, LoghoundError> {
        let file: FileConfig = toml::from_str(toml_str).map_err(|e| LoghoundError::ConfigError {
            message: format!("Failed to parse TOML config: {}", e),
        })?;
        self.apply_file(file);
        Ok(self)
    }

    /// Apply CLI arguments on top of whatever is configured so far.
    pub fn from_cli(mut self, cli: &Cli) -> Self {
        if let Some(threshold) = cli.threshold {
            self.detection.login_threshold = threshold;
        }
        if let Some(window) = cli.window_secs {
            self.detection.window_secs = window;
        }
        if let Some(floor) = cli.size_floor_mb {
            self.detection.size_floor_mb = floor;
        }
        if let Some(min) = cli.min_transfers {
            self.detection.min_transfer_count = min;
        }
        if cli.strict {
            self.ingest.on_malformed = MalformedLinePolicy::Abort;
        }
        self.output.verbose = cli.verbose;
        self.output.quiet = cli.quiet;
        self.output.format = cli.format;
        self
    }

    pub fn build(self) -> Result<Configuration, LoghoundError> {
        let config = Configuration {
            detection: self.detection,
            ingest: self.ingest,
            output: self.output,
        };

        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(threshold) = file.login_threshold {
            self.detection.login_threshold = threshold;
        }
        if let Some(window) = file.window_secs {
            self.detection.window_secs = window;
        }
        if let Some(floor) = file.size_floor_mb {
            self.detection.size_floor_mb = floor;
        }
        if let Some(min) = file.min_transfer_count {
            self.detection.min_transfer_count = min;
        }
        if let Some(policy) = file.on_malformed {
            self.ingest.on_malformed = policy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod file_formats {
        use super::*;

        #[test]
        fn should_apply_yaml_overrides() {
            let config = ConfigurationBuilder::new()
                .from_yaml_str("login_threshold: 5\nwindow_secs: 120\n")
                .unwrap()
                .build()
                .unwrap();

            assert_eq!(config.detection.login_threshold, 5);
            assert_eq!(config.detection.window_secs, 120);
            // Untouched knobs keep their defaults.
            assert_eq!(config.detection.size_floor_mb, 1024);
        }

        #[test]
        fn should_apply_json_overrides() {
            let config = ConfigurationBuilder::new()
                .from_json_str(r#"{"size_floor_mb": 512, "on_malformed": "abort"}"#)
                .unwrap()
                .build()
                .unwrap();

            assert_eq!(config.detection.size_floor_mb, 512);
            assert_eq!(config.ingest.on_malformed, MalformedLinePolicy::Abort);
        }

        #[test]
        fn should_apply_toml_overrides() {
            let config = ConfigurationBuilder::new()
                .from_toml_str("min_transfer_count = 4\n")
                .unwrap()
                .build()
                .unwrap();

            assert_eq!(config.detection.min_transfer_count, 4);
        }

        #[test]
        fn should_reject_unparseable_yaml() {
            let result = ConfigurationBuilder::new().from_yaml_str("login_threshold: [not a number");

            assert!(result.is_err());
        }
    }

    mod defaults {
        use super::*;

        #[test]
        fn should_build_documented_defaults() {
            let config = ConfigurationBuilder::new().build().unwrap();

            assert_eq!(config.detection.login_threshold, 3);
            assert_eq!(config.detection.window_secs, 600);
            assert_eq!(config.detection.size_floor_mb, 1024);
            assert_eq!(config.detection.min_transfer_count, 2);
            assert_eq!(config.ingest.on_malformed, MalformedLinePolicy::Skip);
        }
    }
}
