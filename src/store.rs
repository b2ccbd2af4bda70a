//! Per-user event accumulation
//!
//! The store keeps one insertion-ordered series per user per category and
//! the set of all users seen, including users who only ever logged in
//! successfully. Series grow monotonically during ingestion and are
//! read-only afterwards; nothing here can fail.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;

use crate::{EventCategory, LogEvent};

/// One data-transfer entry: when it happened and how large it was.
/// Recorded regardless of size; the correlator applies the size floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transfer {
    pub at: NaiveDateTime,
    pub size_mb: u64,
}

#[derive(Debug, Default)]
pub struct ActivityStore {
    failed_logins: BTreeMap<String, Vec<NaiveDateTime>>,
    transfers: BTreeMap<String, Vec<Transfer>>,
    users: BTreeSet<String>,
}

impl ActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event: the user is always remembered, and failed logins
    /// and transfers are appended to their series. Successful logins leave
    /// no series entry.
    pub fn observe(&mut self, event: &LogEvent) {
        match event.category() {
            EventCategory::LoginFailure => {
                self.record_failed_login(event.user(), event.timestamp());
            }
            EventCategory::DataTransfer => {
                // Size is always present on transfer events by construction.
                let size_mb = event.size_mb().unwrap_or(0);
                self.record_transfer(event.user(), event.timestamp(), size_mb);
            }
            EventCategory::LoginSuccess => {
                self.users.insert(event.user().to_string());
            }
        }
    }

    pub fn record_failed_login(&mut self, user: &str, at: NaiveDateTime) {
        self.users.insert(user.to_string());
        self.failed_logins.entry(user.to_string()).or_default().push(at);
    }

    pub fn record_transfer(&mut self, user: &str, at: NaiveDateTime, size_mb: u64) {
        self.users.insert(user.to_string());
        self.transfers
            .entry(user.to_string())
            .or_default()
            .push(Transfer { at, size_mb });
    }

    /// Distinct users encountered, in lexicographic order for deterministic
    /// reporting.
    pub fn users_seen(&self) -> impl Iterator<Item = &str> {
        self.users.iter().map(String::as_str)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn failed_logins_for(&self, user: &str) -> &[NaiveDateTime] {
        self.failed_logins.get(user).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn transfers_for(&self, user: &str) -> &[Transfer] {
        self.transfers.get(user).map(Vec::as_slice).unwrap_or(&[])
    }
}
