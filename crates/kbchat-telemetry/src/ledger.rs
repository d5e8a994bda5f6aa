//! Accumulated daily cost report.
//!
//! The report is a flat text file with one running total per calendar date:
//!
//! ```text
//! on date 2024-05-01 total costs in USD: $1.2345600
//! ```
//!
//! Recording a cost either merges into the line for that date or appends a
//! new line. Every other line is preserved byte-for-byte. The whole
//! read-modify-write runs under an exclusive advisory lock on a sidecar
//! `.lock` file, and the new content replaces the report by rename.

use crate::io::{atomic_write, lock_sidecar};
use crate::types::LedgerEntry;
use chrono::{NaiveDate, NaiveDateTime};
use fs2::FileExt;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, warn};

/// Fractional digits written for every amount
const AMOUNT_SCALE: u32 = 7;

static ENTRY_RE: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("cost delta must be non-negative, got {0}")]
    NegativeDelta(Decimal),

    #[error("malformed amount {amount:?} for {date} in {}", .path.display())]
    MalformedAmount {
        date: NaiveDate,
        amount: String,
        path: PathBuf,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("running total for {date} overflows in {}", .path.display())]
    Overflow { date: NaiveDate, path: PathBuf },

    #[error("invalid entry pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("report I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Render an amount with exactly seven fractional digits
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.7}", rounded)
}

fn entry_line(date: NaiveDate, amount: Decimal) -> String {
    format!(
        "on date {} total costs in USD: ${}",
        date.format("%Y-%m-%d"),
        format_amount(amount)
    )
}

/// Daily running totals persisted at a single report path
#[derive(Debug, Clone)]
pub struct DailyLedger {
    path: PathBuf,
}

impl DailyLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add `delta` to the running total for the calendar date of `at`.
    ///
    /// A missing report is created with a single entry. An existing report
    /// gets the first line for that date rewritten, or a new entry appended
    /// after a newline when the date has no line yet.
    pub fn record_cost(&self, delta: Decimal, at: NaiveDateTime) -> Result<(), LedgerError> {
        if delta.is_sign_negative() && !delta.is_zero() {
            return Err(LedgerError::NegativeDelta(delta));
        }
        let date = at.date();

        let lock = lock_sidecar(&self.path)?;
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        let updated = if content.is_empty() {
            debug!(path = %self.path.display(), %date, "creating daily report");
            entry_line(date, delta)
        } else if let Some(updated) = self.merge(&content, date, delta)? {
            debug!(path = %self.path.display(), %date, "merging cost into existing entry");
            updated
        } else {
            debug!(path = %self.path.display(), %date, "appending entry for new date");
            format!("{}\n{}", content, entry_line(date, delta))
        };

        atomic_write(&self.path, updated.as_bytes())?;
        FileExt::unlock(&lock)?;
        Ok(())
    }

    /// Rewrite the first line carrying `date`, returning `None` when no line matches.
    fn merge(
        &self,
        content: &str,
        date: NaiveDate,
        delta: Decimal,
    ) -> Result<Option<String>, LedgerError> {
        let date_key = date.format("%Y-%m-%d").to_string();
        let pattern = Regex::new(&format!(r"({}.*?\$)([0-9.]+)", regex::escape(&date_key)))?;

        let mut out = String::with_capacity(content.len() + 8);
        let mut merged = false;

        for line in content.split_inclusive('\n') {
            if merged {
                if pattern.is_match(line) {
                    warn!(path = %self.path.display(), %date, "duplicate entry left untouched");
                }
                out.push_str(line);
                continue;
            }

            let Some(caps) = pattern.captures(line) else {
                out.push_str(line);
                continue;
            };

            let (Some(whole), Some(prefix), Some(amount)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                out.push_str(line);
                continue;
            };

            let current =
                Decimal::from_str(amount.as_str()).map_err(|source| LedgerError::MalformedAmount {
                    date,
                    amount: amount.as_str().to_string(),
                    path: self.path.clone(),
                    source,
                })?;

            let total = current.checked_add(delta).ok_or_else(|| LedgerError::Overflow {
                date,
                path: self.path.clone(),
            })?;

            out.push_str(&line[..whole.start()]);
            out.push_str(prefix.as_str());
            out.push_str(&format_amount(total));
            out.push_str(&line[whole.end()..]);
            merged = true;
        }

        Ok(merged.then_some(out))
    }

    /// Read back every well-formed entry in file order. A missing report has none.
    pub fn entries(&self) -> Result<Vec<LedgerEntry>, LedgerError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let re = ENTRY_RE.get_or_init(|| {
            Regex::new(r"^on date (\d{4}-\d{2}-\d{2}) total costs in USD: \$([0-9.]+)").unwrap()
        });

        let mut entries = Vec::new();
        for line in content.lines() {
            let Some(caps) = re.captures(line) else {
                continue;
            };
            let date = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d");
            let total = Decimal::from_str(&caps[2]);
            match (date, total) {
                (Ok(date), Ok(total)) => entries.push(LedgerEntry { date, total }),
                _ => warn!(line, "skipping unparseable report line"),
            }
        }

        Ok(entries)
    }
}
