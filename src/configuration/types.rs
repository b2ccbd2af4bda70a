//! Configuration type definitions
//!
//! Defines the policy and runtime structures used throughout the system.
//! Defaults mirror the documented detection policy: three failed logins,
//! a ten-minute window, a 1 GiB transfer floor, two transfers minimum.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Detection policy constants. Externally settable via CLI flags or a
/// configuration file; hard-coding these is exactly what the config layer
/// exists to avoid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum failed-login count before cluster testing is attempted.
    pub login_threshold: usize,
    /// Maximum span, in seconds, for two events to count as clustered.
    pub window_secs: u64,
    /// Minimum transfer size, in megabytes, to be eligible for clustering.
    pub size_floor_mb: u64,
    /// Minimum transfer count before cluster testing is attempted.
    pub min_transfer_count: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            login_threshold: 3,
            window_secs: 600,
            size_floor_mb: 1024,
            min_transfer_count: 2,
        }
    }
}

/// What to do when a log line does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedLinePolicy {
    /// Log a warning, count the line, keep going.
    Skip,
    /// Fail the whole run on the first bad line.
    Abort,
}

impl Default for MalformedLinePolicy {
    fn default() -> Self {
        MalformedLinePolicy::Skip
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IngestConfig {
    pub on_malformed: MalformedLinePolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
}

impl Default for ReportFormat {
    fn default() -> Self {
        ReportFormat::Text
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Also dump each user's raw series (every failed login, every transfer).
    pub verbose: bool,
    /// Suppress console findings; only warnings and errors are printed.
    pub quiet: bool,
    pub format: ReportFormat,
}
