use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub mod cli;
pub mod configuration;
pub mod correlator;
pub mod errors;
pub mod ingest;
pub mod report;
pub mod store;

/// Display format for timestamps, matching the log's own date+time fields.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    LoginFailure,
    LoginSuccess,
    DataTransfer,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::LoginFailure => "login_failure",
            EventCategory::LoginSuccess => "login_success",
            EventCategory::DataTransfer => "data_transfer",
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One parsed log record. Immutable once constructed; the store copies out
/// the fields it needs and the event is discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    timestamp: NaiveDateTime,
    user: String,
    category: EventCategory,
    size_mb: Option<u64>,
    ip: Option<String>,
}

impl LogEvent {
    pub fn login(timestamp: NaiveDateTime, user: String, success: bool, ip: Option<String>) -> Self {
        Self {
            timestamp,
            user,
            category: if success {
                EventCategory::LoginSuccess
            } else {
                EventCategory::LoginFailure
            },
            size_mb: None,
            ip,
        }
    }

    pub fn transfer(
        timestamp: NaiveDateTime,
        user: String,
        size_mb: u64,
        ip: Option<String>,
    ) -> Self {
        Self {
            timestamp,
            user,
            category: EventCategory::DataTransfer,
            size_mb: Some(size_mb),
            ip,
        }
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn category(&self) -> EventCategory {
        self.category
    }

    /// Transfer size in megabytes. `None` for login events.
    pub fn size_mb(&self) -> Option<u64> {
        self.size_mb
    }

    pub fn ip(&self) -> Option<&str> {
        self.ip.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub summary: ReportSummary,
    pub findings: Vec<Finding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: String,
    pub source: String,
    pub total_events: u64,
    pub malformed_lines: u64,
    pub users: u64,
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub login_findings: u64,
    pub transfer_findings: u64,
    pub login_clusters: u64,
    pub transfer_clusters: u64,
    pub users_flagged: u64,
}

/// The rendered outcome of evaluating one (user, category) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub user: String,
    pub category: String,
    pub status: String,
    pub count: usize,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<ClusterTrigger>,
}

/// The pair of events that tripped a cluster verdict, rendered for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterTrigger {
    pub first_at: String,
    pub second_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_size_mb: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second_size_mb: Option<u64>,
}

impl AnalysisReport {
    pub fn new(source: String) -> Self {
        Self {
            metadata: ReportMetadata {
                generated_at: chrono::Utc::now().to_rfc3339(),
                source,
                total_events: 0,
                malformed_lines: 0,
                users: 0,
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            summary: ReportSummary::default(),
            findings: Vec::new(),
        }
    }

    pub fn add_finding(&mut self, finding: Finding) {
        match finding.category.as_str() {
            "failed_login" => {
                self.summary.login_findings += 1;
                if finding.trigger.is_some() {
                    self.summary.login_clusters += 1;
                }
            }
            "data_transfer" => {
                self.summary.transfer_findings += 1;
                if finding.trigger.is_some() {
                    self.summary.transfer_clusters += 1;
                }
            }
            _ => {}
        }

        if finding.trigger.is_some() {
            self.summary.users_flagged += 1;
        }

        self.findings.push(finding);
    }

    pub fn suspicious_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.trigger.is_some())
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("# Access Log Analysis Report\n\n");

        md.push_str("## Metadata\n\n");
        md.push_str(&format!(
            "- **Generated**: {}\n",
            self.metadata.generated_at
        ));
        md.push_str(&format!("- **Source**: {}\n", self.metadata.source));
        md.push_str(&format!(
            "- **Total Events**: {}\n",
            self.metadata.total_events
        ));
        md.push_str(&format!(
            "- **Malformed Lines**: {}\n",
            self.metadata.malformed_lines
        ));
        md.push_str(&format!("- **Users**: {}\n", self.metadata.users));
        md.push_str(&format!("- **Version**: {}\n\n", self.metadata.version));

        md.push_str("## Summary\n\n");
        md.push_str("| Check | Findings | Clusters |\n");
        md.push_str("|-------|----------|----------|\n");
        md.push_str(&format!(
            "| Failed Logins | {} | {} |\n",
            self.summary.login_findings, self.summary.login_clusters
        ));
        md.push_str(&format!(
            "| Data Transfers | {} | {} |\n\n",
            self.summary.transfer_findings, self.summary.transfer_clusters
        ));

        if self.summary.users_flagged > 0 {
            md.push_str(&format!(
                "⚠️  **{} suspicious finding(s) detected.**\n\n",
                self.summary.users_flagged
            ));

            md.push_str("## Suspicious Activity\n\n");
            for finding in self.suspicious_findings() {
                md.push_str(&format!(
                    "- **{}** [{}] {}\n",
                    finding.user, finding.category, finding.message
                ));
                if let Some(trigger) = &finding.trigger {
                    md.push_str(&format!(
                        "  - triggering pair: {} and {}\n",
                        trigger.first_at, trigger.second_at
                    ));
                }
            }
            md.push('\n');
        } else {
            md.push_str("✅ No suspicious activity detected.\n\n");
        }

        md.push_str("## All Findings\n\n");
        for finding in &self.findings {
            md.push_str(&format!(
                "- **{}** [{}] {} — {}\n",
                finding.user, finding.category, finding.status, finding.message
            ));
        }

        md.push_str("\n---\n");
        md.push_str("*Generated by loghound*\n");

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    mod event_model {
        use super::*;

        #[test]
        fn should_build_failed_login_event() {
            let event = LogEvent::login(
                ts(9, 0, 0),
                "alice".to_string(),
                false,
                Some("10.0.0.1".to_string()),
            );

            assert_eq!(event.category(), EventCategory::LoginFailure);
            assert_eq!(event.user(), "alice");
            assert_eq!(event.size_mb(), None);
            assert_eq!(event.ip(), Some("10.0.0.1"));
        }

        #[test]
        fn should_build_successful_login_event() {
            let event = LogEvent::login(ts(9, 0, 0), "alice".to_string(), true, None);

            assert_eq!(event.category(), EventCategory::LoginSuccess);
        }

        #[test]
        fn should_carry_transfer_size() {
            let event = LogEvent::transfer(ts(10, 0, 0), "bob".to_string(), 2048, None);

            assert_eq!(event.category(), EventCategory::DataTransfer);
            assert_eq!(event.size_mb(), Some(2048));
        }

        #[test]
        fn should_format_category_names() {
            assert_eq!(EventCategory::LoginFailure.as_str(), "login_failure");
            assert_eq!(EventCategory::LoginSuccess.as_str(), "login_success");
            assert_eq!(EventCategory::DataTransfer.as_str(), "data_transfer");
        }
    }

    mod report_accounting {
        use super::*;

        fn cluster_finding(user: &str, category: &str) -> Finding {
            Finding {
                user: user.to_string(),
                category: category.to_string(),
                status: "suspicious_cluster".to_string(),
                count: 3,
                message: "clustered events".to_string(),
                trigger: Some(ClusterTrigger {
                    first_at: "2024-03-01 09:00:00".to_string(),
                    second_at: "2024-03-01 09:01:00".to_string(),
                    first_size_mb: None,
                    second_size_mb: None,
                }),
            }
        }

        #[test]
        fn should_count_login_clusters() {
            let mut report = AnalysisReport::new("test.log".to_string());
            report.add_finding(cluster_finding("alice", "failed_login"));

            assert_eq!(report.summary.login_findings, 1);
            assert_eq!(report.summary.login_clusters, 1);
            assert_eq!(report.summary.users_flagged, 1);
        }

        #[test]
        fn should_not_flag_users_without_trigger() {
            let mut report = AnalysisReport::new("test.log".to_string());
            report.add_finding(Finding {
                user: "carol".to_string(),
                category: "data_transfer".to_string(),
                status: "not_enough_events".to_string(),
                count: 1,
                message: "too few transfers".to_string(),
                trigger: None,
            });

            assert_eq!(report.summary.transfer_findings, 1);
            assert_eq!(report.summary.transfer_clusters, 0);
            assert_eq!(report.summary.users_flagged, 0);
        }

        #[test]
        fn should_render_markdown_sections() {
            let mut report = AnalysisReport::new("test.log".to_string());
            report.add_finding(cluster_finding("alice", "failed_login"));

            let md = report.to_markdown();
            assert!(md.contains("# Access Log Analysis Report"));
            assert!(md.contains("## Suspicious Activity"));
            assert!(md.contains("alice"));
            assert!(md.contains("2024-03-01 09:00:00"));
        }

        #[test]
        fn should_serialize_to_json() {
            let mut report = AnalysisReport::new("test.log".to_string());
            report.add_finding(cluster_finding("alice", "failed_login"));

            let json = report.to_json().unwrap();
            assert!(json.contains("\"user\": \"alice\""));
            assert!(json.contains("\"suspicious_cluster\""));
        }
    }
}
