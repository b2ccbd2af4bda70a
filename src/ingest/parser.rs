//! Log line parsing
//!
//! Tokenizes one line of the access log into a typed [`LogEvent`]. All
//! failures are typed and recoverable by the ingestion layer; nothing here
//! panics on bad input.
//!
//! Expected shapes:
//! `<date> <time> User: <user> Login: <Success|Failed> IP: <addr>`
//! `<date> <time> User: <user> Data Transfer: <size>MB IP: <addr>`

use chrono::NaiveDateTime;

use crate::errors::{LoghoundError, Result};
use crate::{LogEvent, TIMESTAMP_FORMAT};

pub struct LineParser;

impl LineParser {
    /// Parse a single log line. `line_no` is 1-based and only used for
    /// error reporting.
    pub fn parse_line(line: &str, line_no: usize) -> Result<LogEvent> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 6 {
            return Err(LoghoundError::MalformedRecord {
                line_no,
                reason: format!("expected at least 6 fields, found {}", tokens.len()),
            });
        }

        let timestamp = Self::parse_timestamp(tokens[0], tokens[1], line_no)?;

        if tokens[2] != "User:" {
            return Err(LoghoundError::MalformedRecord {
                line_no,
                reason: format!("expected \"User:\" marker, found {:?}", tokens[2]),
            });
        }
        let user = tokens[3].to_string();
        let ip = Self::extract_ip(&tokens);

        match tokens[4] {
            "Login:" => match tokens[5] {
                "Success" => Ok(LogEvent::login(timestamp, user, true, ip)),
                "Failed" => Ok(LogEvent::login(timestamp, user, false, ip)),
                other => Err(LoghoundError::UnknownCategory {
                    line_no,
                    token: other.to_string(),
                }),
            },
            "Data" if tokens[5] == "Transfer:" => {
                let raw = tokens.get(6).ok_or(LoghoundError::MalformedRecord {
                    line_no,
                    reason: "missing transfer size".to_string(),
                })?;
                let size_mb = Self::parse_size(raw, line_no)?;
                Ok(LogEvent::transfer(timestamp, user, size_mb, ip))
            }
            other => Err(LoghoundError::UnknownCategory {
                line_no,
                token: other.to_string(),
            }),
        }
    }

    fn parse_timestamp(date: &str, time: &str, line_no: usize) -> Result<NaiveDateTime> {
        let combined = format!("{} {}", date, time);
        NaiveDateTime::parse_from_str(&combined, TIMESTAMP_FORMAT).map_err(|e| {
            LoghoundError::MalformedRecord {
                line_no,
                reason: format!("invalid timestamp {:?}: {}", combined, e),
            }
        })
    }

    /// Size field looks like `2048MB`. Negative or non-numeric values are
    /// rejected (u64 parsing refuses a leading minus).
    fn parse_size(raw: &str, line_no: usize) -> Result<u64> {
        let digits = raw.strip_suffix("MB").unwrap_or(raw);
        digits.parse::<u64>().map_err(|_| LoghoundError::InvalidSize {
            line_no,
            value: raw.to_string(),
        })
    }

    fn extract_ip(tokens: &[&str]) -> Option<String> {
        let pos = tokens.iter().position(|&t| t == "IP:")?;
        tokens.get(pos + 1).map(|s| s.to_string())
    }
}
