//! Report emission
//!
//! Consumes verdicts and renders findings. The emitter walks the user set
//! in stable order twice, all failed-login verdicts first and then all
//! transfer verdicts, and holds no state across users. Evaluation stays in
//! the correlator; this module only turns verdicts into output.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::configuration::DetectionConfig;
use crate::correlator::{ClusterEvent, SeriesCorrelator, Verdict};
use crate::store::ActivityStore;
use crate::{AnalysisReport, ClusterTrigger, Finding, TIMESTAMP_FORMAT};

pub struct ReportEmitter<'a, C: SeriesCorrelator> {
    correlator: &'a C,
    policy: DetectionConfig,
}

impl<'a, C: SeriesCorrelator> ReportEmitter<'a, C> {
    pub fn new(correlator: &'a C, policy: DetectionConfig) -> Self {
        Self { correlator, policy }
    }

    /// Run both correlations for every user and collect the findings.
    /// Two passes: the login section is complete before the transfer
    /// section starts.
    pub fn evaluate(&self, store: &ActivityStore, source: &str) -> AnalysisReport {
        let mut report = AnalysisReport::new(source.to_string());
        report.metadata.users = store.user_count() as u64;

        for user in store.users_seen() {
            let verdict = self.correlator.evaluate_logins(store.failed_logins_for(user));
            report.add_finding(self.login_finding(user, &verdict));
        }

        for user in store.users_seen() {
            let verdict = self.correlator.evaluate_transfers(store.transfers_for(user));
            report.add_finding(self.transfer_finding(user, &verdict));
        }

        report
    }

    fn login_finding(&self, user: &str, verdict: &Verdict) -> Finding {
        let (status, count, message, trigger) = match verdict {
            Verdict::NotEnoughEvents { count: 0, .. } => (
                "not_enough_events",
                0,
                "no failed logins found".to_string(),
                None,
            ),
            Verdict::NotEnoughEvents { count, required } => (
                "not_enough_events",
                *count,
                format!(
                    "{} failed login attempt(s), below the threshold of {}",
                    count, required
                ),
                None,
            ),
            Verdict::SuspiciousClusterFound {
                first,
                second,
                count,
            } => (
                "suspicious_cluster",
                *count,
                format!(
                    "{} failed logins with at least two within {}",
                    count,
                    window_display(self.policy.window_secs)
                ),
                Some(trigger_from(first, second)),
            ),
            Verdict::EventsPresentNoCluster { count } => (
                "no_cluster",
                *count,
                format!(
                    "{} failed logins exceed the threshold of {}, but none fall within {} of each other",
                    count,
                    self.policy.login_threshold,
                    window_display(self.policy.window_secs)
                ),
                None,
            ),
            // Login series have no size floor; this verdict only arises for
            // transfers.
            Verdict::EventsBelowThresholdButPresent { count, .. } => (
                "below_size_floor",
                *count,
                format!("{} events present but below threshold", count),
                None,
            ),
        };

        Finding {
            user: user.to_string(),
            category: "failed_login".to_string(),
            status: status.to_string(),
            count,
            message,
            trigger,
        }
    }

    fn transfer_finding(&self, user: &str, verdict: &Verdict) -> Finding {
        let (status, count, message, trigger) = match verdict {
            Verdict::NotEnoughEvents { count: 0, .. } => (
                "not_enough_events",
                0,
                "no data transfers found".to_string(),
                None,
            ),
            Verdict::NotEnoughEvents { count, required } => (
                "not_enough_events",
                *count,
                format!(
                    "{} data transfer(s), below the minimum of {}",
                    count, required
                ),
                None,
            ),
            Verdict::EventsBelowThresholdButPresent { count, floor_mb } => (
                "below_size_floor",
                *count,
                format!(
                    "{} data transfers, none at or above {}MB",
                    count, floor_mb
                ),
                None,
            ),
            Verdict::SuspiciousClusterFound {
                first,
                second,
                count,
            } => (
                "suspicious_cluster",
                *count,
                format!(
                    "multiple transfers of at least {}MB within {}",
                    self.policy.size_floor_mb,
                    window_display(self.policy.window_secs)
                ),
                Some(trigger_from(first, second)),
            ),
            Verdict::EventsPresentNoCluster { count } => (
                "no_cluster",
                *count,
                format!(
                    "{} data transfers, but no two of at least {}MB within {}",
                    count,
                    self.policy.size_floor_mb,
                    window_display(self.policy.window_secs)
                ),
                None,
            ),
        };

        Finding {
            user: user.to_string(),
            category: "data_transfer".to_string(),
            status: status.to_string(),
            count,
            message,
            trigger,
        }
    }

    /// Console rendering: login section, then transfer section, then a
    /// short summary.
    pub fn format_text(&self, report: &AnalysisReport) -> String {
        let mut out = String::new();

        out.push_str("Login checks:\n");
        for finding in report.findings.iter().filter(|f| f.category == "failed_login") {
            Self::push_finding(&mut out, finding);
        }

        out.push_str("\nData transfer checks:\n");
        for finding in report.findings.iter().filter(|f| f.category == "data_transfer") {
            Self::push_finding(&mut out, finding);
        }

        out.push_str("\n📊 Summary\n");
        out.push_str(&format!(
            "Users: {}  Events: {}  Malformed lines: {}\n",
            report.metadata.users, report.metadata.total_events, report.metadata.malformed_lines
        ));
        if report.summary.users_flagged > 0 {
            out.push_str(&format!(
                "⚠️  Suspicious findings: {} ({} login, {} transfer)\n",
                report.summary.users_flagged,
                report.summary.login_clusters,
                report.summary.transfer_clusters
            ));
        } else {
            out.push_str("✅ No suspicious activity detected\n");
        }

        out
    }

    fn push_finding(out: &mut String, finding: &Finding) {
        let marker = if finding.trigger.is_some() { "⚠️ " } else { "  " };
        out.push_str(&format!("{} {}: {}\n", marker, finding.user, finding.message));

        if let Some(trigger) = &finding.trigger {
            let first = annotate(&trigger.first_at, trigger.first_size_mb);
            let second = annotate(&trigger.second_at, trigger.second_size_mb);
            out.push_str(&format!("      triggered by {} and {}\n", first, second));
        }
    }

    /// Verbose dump of each user's raw series, in log order.
    pub fn format_series_dump(&self, store: &ActivityStore) -> String {
        let mut out = String::new();

        for user in store.users_seen() {
            let logins = store.failed_logins_for(user);
            if !logins.is_empty() {
                out.push_str(&format!("User: {} failed login attempts:\n", user));
                for at in logins {
                    out.push_str(&format!("  Failed at: {}\n", at.format(TIMESTAMP_FORMAT)));
                }
            }

            let transfers = store.transfers_for(user);
            if !transfers.is_empty() {
                out.push_str(&format!("User: {} data transfers:\n", user));
                for t in transfers {
                    out.push_str(&format!(
                        "  Transfer of {}MB at: {}\n",
                        t.size_mb,
                        t.at.format(TIMESTAMP_FORMAT)
                    ));
                }
            }
        }

        out
    }

    pub fn save_json(&self, report: &AnalysisReport, path: &Path) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(report.to_json()?.as_bytes())?;
        Ok(())
    }

    pub fn save_markdown(&self, report: &AnalysisReport, path: &Path) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(report.to_markdown().as_bytes())?;
        Ok(())
    }

    pub fn save_text(&self, report: &AnalysisReport, path: &Path) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.format_text(report).as_bytes())?;
        Ok(())
    }
}

fn trigger_from(first: &ClusterEvent, second: &ClusterEvent) -> ClusterTrigger {
    ClusterTrigger {
        first_at: first.at.format(TIMESTAMP_FORMAT).to_string(),
        second_at: second.at.format(TIMESTAMP_FORMAT).to_string(),
        first_size_mb: first.size_mb,
        second_size_mb: second.size_mb,
    }
}

fn annotate(at: &str, size_mb: Option<u64>) -> String {
    match size_mb {
        Some(size) => format!("{} ({}MB)", at, size),
        None => at.to_string(),
    }
}

fn window_display(window_secs: u64) -> String {
    if window_secs % 60 == 0 {
        format!("{} minutes", window_secs / 60)
    } else {
        format!("{} seconds", window_secs)
    }
}
