//! Unified Configuration System
//!
//! Combines settings from defaults, an optional configuration file
//! (YAML/JSON/TOML), and CLI arguments into a single validated object.
//! CLI values take precedence over file values over defaults.
//!
//! ```rust
//! use loghound::configuration::Configuration;
//!
//! let config = Configuration::builder()
//!     .from_yaml_str("window_secs: 300\n")
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.detection.window_secs, 300);
//! assert_eq!(config.detection.login_threshold, 3);
//! ```

pub mod builder;
pub mod types;
mod validation;

pub use builder::ConfigurationBuilder;
pub use types::*;

use crate::errors::LoghoundError;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Configuration {
    pub detection: DetectionConfig,
    pub ingest: IngestConfig,
    pub output: OutputConfig,
}

impl Configuration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// Validate the configuration for consistency and correctness.
    pub fn validate(&self) -> Result<(), LoghoundError> {
        self.validate_detection()?;
        self.validate_output()?;
        Ok(())
    }

    pub fn is_verbose(&self) -> bool {
        self.output.verbose
    }

    pub fn is_quiet(&self) -> bool {
        self.output.quiet
    }
}
