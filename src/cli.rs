use std::path::PathBuf;

use clap::Parser;

use crate::configuration::ReportFormat;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "loghound",
    version,
    about = "Access-log analyzer that flags clustered failed logins and large data transfers",
    long_about = "loghound reads a sequential access log, accumulates failed logins and data \
                  transfers per user, and flags users whose events cluster inside a time window."
)]
pub struct Cli {
    /// Path to the access log file
    #[arg(value_name = "LOG_FILE", default_value = "Log.txt")]
    pub log_file: PathBuf,

    /// Failed-login count required before cluster testing (default 3)
    #[arg(short = 't', long, value_name = "COUNT")]
    pub threshold: Option<usize>,

    /// Cluster window in seconds (default 600)
    #[arg(short = 'w', long, value_name = "SECONDS")]
    pub window_secs: Option<u64>,

    /// Minimum transfer size in MB to be eligible for clustering (default 1024)
    #[arg(long, value_name = "MB")]
    pub size_floor_mb: Option<u64>,

    /// Minimum transfer count before cluster testing (default 2)
    #[arg(long, value_name = "COUNT")]
    pub min_transfers: Option<usize>,

    /// Configuration file path (YAML, JSON, or TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the report to a file instead of only printing it
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Abort on the first malformed log line instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Also dump each user's raw event series
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress console findings (useful when saving to a file)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_default_arguments() {
        let cli = Cli::try_parse_from(["loghound"]).unwrap();

        assert_eq!(cli.log_file, PathBuf::from("Log.txt"));
        assert_eq!(cli.threshold, None);
        assert_eq!(cli.window_secs, None);
        assert_eq!(cli.format, ReportFormat::Text);
        assert!(!cli.strict);
        assert!(!cli.verbose);
    }

    #[test]
    fn should_parse_policy_knobs() {
        let cli = Cli::try_parse_from([
            "loghound",
            "access.log",
            "-t",
            "5",
            "-w",
            "300",
            "--size-floor-mb",
            "2048",
            "--min-transfers",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.log_file, PathBuf::from("access.log"));
        assert_eq!(cli.threshold, Some(5));
        assert_eq!(cli.window_secs, Some(300));
        assert_eq!(cli.size_floor_mb, Some(2048));
        assert_eq!(cli.min_transfers, Some(3));
    }

    #[test]
    fn should_parse_output_and_format() {
        let cli =
            Cli::try_parse_from(["loghound", "-o", "report.json", "-f", "json"]).unwrap();

        assert_eq!(cli.output, Some(PathBuf::from("report.json")));
        assert_eq!(cli.format, ReportFormat::Json);
    }

    #[test]
    fn should_reject_verbose_with_quiet() {
        let result = Cli::try_parse_from(["loghound", "--verbose", "--quiet"]);

        assert!(result.is_err());
    }

    #[test]
    fn should_reject_unknown_format() {
        let result = Cli::try_parse_from(["loghound", "-f", "xml"]);

        assert!(result.is_err());
    }

    #[test]
    fn should_fail_on_non_numeric_window() {
        let result = Cli::try_parse_from(["loghound", "-w", "soon"]);

        assert!(result.is_err());
    }
}
