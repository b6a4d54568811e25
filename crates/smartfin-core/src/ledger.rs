//! Ledger record vocabulary shared by every aggregation.
//!
//! Transaction and expense entities both project into [`LedgerRecord`], the
//! shape the analytics layer consumes. Records arriving from API payloads and
//! legacy exports are messy: amounts show up as JSON numbers or strings, dates
//! as RFC 3339, bare dates, or Unix milliseconds. The parsers here normalize
//! those shapes once so the aggregations can stay simple.
//!
//! Malformed values follow a single policy: [`parse_amount`] and
//! [`parse_date`] return `None` and every aggregation silently skips the
//! record. No sentinel values, no partial contributions.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A monetary amount as it arrives on the wire: number or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl Default for RawAmount {
    fn default() -> Self {
        RawAmount::Number(0.0)
    }
}

impl From<f64> for RawAmount {
    fn from(value: f64) -> Self {
        RawAmount::Number(value)
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        RawAmount::Text(value.to_string())
    }
}

/// A record date as it arrives on the wire: Unix milliseconds or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    Timestamp(i64),
    Text(String),
}

impl From<&str> for RawDate {
    fn from(value: &str) -> Self {
        RawDate::Text(value.to_string())
    }
}

impl From<DateTime<Utc>> for RawDate {
    fn from(value: DateTime<Utc>) -> Self {
        RawDate::Text(value.to_rfc3339())
    }
}

/// Whether money moved into or out of the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The transaction-like record every aggregation consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub amount: RawAmount,
    /// Wire name is `type` for compatibility with existing exports.
    #[serde(rename = "type", default)]
    pub kind: Option<TransactionKind>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<RawDate>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Coerce a raw amount to a finite f64.
///
/// Strings are trimmed and parsed strictly: no currency symbols, no
/// thousands separators. Non-finite values (NaN, infinities) are rejected
/// so they can never poison a running total.
pub fn parse_amount(raw: &RawAmount) -> Option<f64> {
    match raw {
        RawAmount::Number(n) if n.is_finite() => Some(*n),
        RawAmount::Number(_) => None,
        RawAmount::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

/// Parse a raw date to UTC.
///
/// Text forms tried in order: RFC 3339, `%Y-%m-%dT%H:%M:%S%.f`,
/// `%Y-%m-%d %H:%M:%S`, `%Y-%m-%d` (midnight). Numbers are Unix
/// milliseconds. Naive forms are taken as UTC.
pub fn parse_date(raw: &RawDate) -> Option<DateTime<Utc>> {
    match raw {
        RawDate::Timestamp(ms) => Utc.timestamp_millis_opt(*ms).single(),
        RawDate::Text(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                    return Some(dt.and_utc());
                }
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        }
    }
}

/// Canonical income/expense classification, applied by every aggregation.
///
/// An explicit kind always wins. Otherwise a category containing "income"
/// (case-insensitive) marks income and any other non-blank category marks an
/// expense. Records with neither field are unclassified and contribute to no
/// total.
pub fn classify(record: &LedgerRecord) -> Option<TransactionKind> {
    if let Some(kind) = record.kind {
        return Some(kind);
    }
    let category = record.category.as_deref().map(str::trim).unwrap_or("");
    if category.is_empty() {
        return None;
    }
    if category.to_lowercase().contains("income") {
        Some(TransactionKind::Income)
    } else {
        Some(TransactionKind::Expense)
    }
}
