//! Windowed pairwise correlation
//!
//! The algorithmic heart of loghound: given one user's series and a
//! detection policy, decide whether a suspicious cluster exists. Evaluation
//! is a pure function of (series, policy) with no I/O and no state, so
//! verdicts can be tested without capturing console output.
//!
//! Precondition: series are assumed sorted ascending by timestamp (they are
//! populated in log order and never re-sorted). Results for unordered input
//! are unspecified.

use chrono::NaiveDateTime;

use crate::configuration::DetectionConfig;
use crate::store::Transfer;

/// One endpoint of a triggering pair. Transfers carry their size so the
/// emitter can render it; login events do not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterEvent {
    pub at: NaiveDateTime,
    pub size_mb: Option<u64>,
}

impl ClusterEvent {
    fn login(at: NaiveDateTime) -> Self {
        Self { at, size_mb: None }
    }

    fn transfer(t: Transfer) -> Self {
        Self {
            at: t.at,
            size_mb: Some(t.size_mb),
        }
    }
}

/// Outcome of evaluating one series against policy.
///
/// `count` is the number of entries the threshold decision was based on:
/// the full series length for both policies. Transfers count raw, not
/// size-filtered; the size floor only gates pair eligibility.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Fewer entries than the policy minimum; includes the empty series.
    NotEnoughEvents { count: usize, required: usize },
    /// Enough transfer entries, but none reaches the size floor, so no pair
    /// is even eligible for the window test.
    EventsBelowThresholdButPresent { count: usize, floor_mb: u64 },
    /// A qualifying pair fell within the window; carries the first such pair
    /// in scan order.
    SuspiciousClusterFound {
        first: ClusterEvent,
        second: ClusterEvent,
        count: usize,
    },
    /// Enough entries, but every qualifying pair is too far apart in time.
    EventsPresentNoCluster { count: usize },
}

impl Verdict {
    pub fn is_suspicious(&self) -> bool {
        matches!(self, Verdict::SuspiciousClusterFound { .. })
    }
}

/// Seam between evaluation and reporting: the emitter only needs verdicts.
pub trait SeriesCorrelator {
    fn evaluate_logins(&self, series: &[NaiveDateTime]) -> Verdict;
    fn evaluate_transfers(&self, series: &[Transfer]) -> Verdict;
}

pub struct WindowCorrelator {
    policy: DetectionConfig,
}

impl WindowCorrelator {
    pub fn new(policy: DetectionConfig) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &DetectionConfig {
        &self.policy
    }

    fn within_window(&self, a: NaiveDateTime, b: NaiveDateTime) -> bool {
        b.signed_duration_since(a).num_seconds().abs() <= self.policy.window_secs as i64
    }
}

impl SeriesCorrelator for WindowCorrelator {
    /// First-hit scan: outer index ascending, inner index ascending, stop at
    /// the first pair within the window. Deliberately not the tightest or
    /// earliest cluster.
    fn evaluate_logins(&self, series: &[NaiveDateTime]) -> Verdict {
        let count = series.len();
        let required = self.policy.login_threshold;

        if count < required {
            return Verdict::NotEnoughEvents { count, required };
        }

        for i in 0..count {
            for j in (i + 1)..count {
                if self.within_window(series[i], series[j]) {
                    return Verdict::SuspiciousClusterFound {
                        first: ClusterEvent::login(series[i]),
                        second: ClusterEvent::login(series[j]),
                        count,
                    };
                }
            }
        }

        Verdict::EventsPresentNoCluster { count }
    }

    /// Same first-hit scan, but only entries at or above the size floor are
    /// eligible; sub-floor entries are skipped in both loops and the raw
    /// series length gates the minimum count.
    fn evaluate_transfers(&self, series: &[Transfer]) -> Verdict {
        let count = series.len();
        let required = self.policy.min_transfer_count;
        let floor = self.policy.size_floor_mb;

        if count < required {
            return Verdict::NotEnoughEvents { count, required };
        }

        if !series.iter().any(|t| t.size_mb >= floor) {
            return Verdict::EventsBelowThresholdButPresent {
                count,
                floor_mb: floor,
            };
        }

        for i in 0..count {
            if series[i].size_mb < floor {
                continue;
            }
            for j in (i + 1)..count {
                if series[j].size_mb < floor {
                    continue;
                }
                if self.within_window(series[i].at, series[j].at) {
                    return Verdict::SuspiciousClusterFound {
                        first: ClusterEvent::transfer(series[i]),
                        second: ClusterEvent::transfer(series[j]),
                        count,
                    };
                }
            }
        }

        Verdict::EventsPresentNoCluster { count }
    }
}
