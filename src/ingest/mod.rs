//! Log ingestion
//!
//! Reads the access log line by line, parses each line into a typed event,
//! and feeds it to the store. Malformed lines never reach the core: the
//! configured policy decides between skip-and-continue (with a warning) and
//! aborting the run.

pub mod parser;

pub use parser::LineParser;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};

use crate::configuration::MalformedLinePolicy;
use crate::errors::Result;
use crate::store::ActivityStore;

/// Counters for one ingestion run, reported alongside the findings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Non-blank lines read.
    pub lines: usize,
    /// Lines that parsed into an event.
    pub events: usize,
    /// Lines skipped as malformed (always 0 under the abort policy).
    pub skipped: usize,
}

pub struct LogIngestor {
    policy: MalformedLinePolicy,
}

impl LogIngestor {
    pub fn new(policy: MalformedLinePolicy) -> Self {
        Self { policy }
    }

    pub fn ingest_file<P: AsRef<Path>>(
        &self,
        path: P,
        store: &mut ActivityStore,
    ) -> Result<IngestStats> {
        let file = File::open(path.as_ref())?;
        self.ingest_reader(BufReader::new(file), store)
    }

    /// Ingestion must complete before any evaluation: a cluster can involve
    /// events anywhere in a user's history.
    pub fn ingest_reader<R: BufRead>(
        &self,
        reader: R,
        store: &mut ActivityStore,
    ) -> Result<IngestStats> {
        let mut stats = IngestStats::default();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            stats.lines += 1;

            match LineParser::parse_line(&line, idx + 1) {
                Ok(event) => {
                    store.observe(&event);
                    stats.events += 1;
                }
                Err(err) if err.is_record_error() => match self.policy {
                    MalformedLinePolicy::Skip => {
                        warn!("skipping bad record: {}", err);
                        stats.skipped += 1;
                    }
                    MalformedLinePolicy::Abort => return Err(err),
                },
                Err(err) => return Err(err),
            }
        }

        debug!(
            "ingested {} events from {} lines ({} skipped)",
            stats.events, stats.lines, stats.skipped
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const GOOD_LOG: &str = "\
2024-03-01 09:00:00 User: alice Login: Failed IP: 10.0.0.1
2024-03-01 09:01:00 User: alice Login: Failed IP: 10.0.0.1
2024-03-01 09:02:00 User: bob Data Transfer: 2048MB IP: 10.0.0.2
";

    #[test]
    fn should_ingest_all_well_formed_lines() {
        let ingestor = LogIngestor::new(MalformedLinePolicy::Skip);
        let mut store = ActivityStore::new();

        let stats = ingestor
            .ingest_reader(Cursor::new(GOOD_LOG), &mut store)
            .unwrap();

        assert_eq!(stats.lines, 3);
        assert_eq!(stats.events, 3);
        assert_eq!(stats.skipped, 0);
        assert_eq!(store.failed_logins_for("alice").len(), 2);
        assert_eq!(store.transfers_for("bob").len(), 1);
    }

    #[test]
    fn should_skip_blank_lines_without_counting_them() {
        let ingestor = LogIngestor::new(MalformedLinePolicy::Skip);
        let mut store = ActivityStore::new();
        let log = "\n2024-03-01 09:00:00 User: alice Login: Failed IP: 10.0.0.1\n\n";

        let stats = ingestor.ingest_reader(Cursor::new(log), &mut store).unwrap();

        assert_eq!(stats.lines, 1);
        assert_eq!(stats.events, 1);
    }

    #[test]
    fn should_skip_malformed_lines_under_skip_policy() {
        let ingestor = LogIngestor::new(MalformedLinePolicy::Skip);
        let mut store = ActivityStore::new();
        let log = "\
2024-03-01 09:00:00 User: alice Login: Failed IP: 10.0.0.1
this is not a log line at all
2024-03-01 09:02:00 User: alice Login: Failed IP: 10.0.0.1
";

        let stats = ingestor.ingest_reader(Cursor::new(log), &mut store).unwrap();

        assert_eq!(stats.events, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(store.failed_logins_for("alice").len(), 2);
    }

    #[test]
    fn should_abort_on_first_malformed_line_under_abort_policy() {
        let ingestor = LogIngestor::new(MalformedLinePolicy::Abort);
        let mut store = ActivityStore::new();
        let log = "\
2024-03-01 09:00:00 User: alice Login: Failed IP: 10.0.0.1
garbage
2024-03-01 09:02:00 User: alice Login: Failed IP: 10.0.0.1
";

        let result = ingestor.ingest_reader(Cursor::new(log), &mut store);

        assert!(result.is_err());
        // The first line was already stored before the abort.
        assert_eq!(store.failed_logins_for("alice").len(), 1);
    }

    #[test]
    fn should_fail_on_missing_file() {
        let ingestor = LogIngestor::new(MalformedLinePolicy::Skip);
        let mut store = ActivityStore::new();

        let result = ingestor.ingest_file("/no/such/file.log", &mut store);

        assert!(result.is_err());
    }
}
