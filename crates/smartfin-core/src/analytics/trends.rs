//! Monthly income/expense trend over a sliding window of calendar months.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::{classify, parse_amount, parse_date, LedgerRecord, TransactionKind};

use super::{month_label, months_between, round2, shift_month};

/// Default look-back window when the caller does not specify one.
pub const DEFAULT_TREND_MONTHS: usize = 6;

/// One calendar month in a trend window. Values are rounded to two decimals
/// as numbers, not strings, so charts can consume them directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrendPoint {
    /// Short month name, "Jan".."Dec".
    pub month: String,
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

/// Bucket records into the `months` calendar months ending at `now`.
///
/// Buckets are keyed by year and month, so a window longer than twelve
/// months can never alias two Januaries into one bucket. The output is
/// ordered oldest to newest and always contains exactly `months` entries,
/// zero-filled where nothing happened. Records dated in the future or
/// before the window are ignored, as are records whose amount or date
/// fails to parse.
pub fn monthly_trend(
    records: &[LedgerRecord],
    months: usize,
    now: DateTime<Utc>,
) -> Vec<MonthlyTrendPoint> {
    if months == 0 {
        return Vec::new();
    }

    // income/expense pairs, index 0 = oldest month in the window
    let mut buckets = vec![(0.0f64, 0.0f64); months];

    for record in records {
        let Some(date) = record.date.as_ref().and_then(parse_date) else {
            continue;
        };
        let Some(amount) = parse_amount(&record.amount) else {
            continue;
        };
        let distance = months_between(date, now);
        if distance < 0 || distance >= months as i32 {
            continue;
        }
        let idx = months - 1 - distance as usize;
        match classify(record) {
            Some(TransactionKind::Income) => buckets[idx].0 += amount,
            Some(TransactionKind::Expense) => buckets[idx].1 += amount,
            None => {}
        }
    }

    buckets
        .iter()
        .enumerate()
        .map(|(idx, (income, expenses))| {
            let offset = (months - 1 - idx) as i32;
            let (year, month) = shift_month(now.year(), now.month(), -offset);
            MonthlyTrendPoint {
                month: month_label(year, month),
                income: round2(*income),
                expenses: round2(*expenses),
                balance: round2(income - expenses),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{RawAmount, RawDate};
    use chrono::TimeZone;

    fn on(date: &str, kind: TransactionKind, amount: f64) -> LedgerRecord {
        LedgerRecord {
            amount: RawAmount::Number(amount),
            kind: Some(kind),
            date: Some(RawDate::Text(date.to_string())),
            ..Default::default()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 23, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_window_is_always_fully_populated() {
        let trend = monthly_trend(&[], 6, now());
        assert_eq!(trend.len(), 6);
        let labels: Vec<&str> = trend.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(labels, vec!["Mar", "Apr", "May", "Jun", "Jul", "Aug"]);
        assert!(trend.iter().all(|p| p.income == 0.0 && p.expenses == 0.0 && p.balance == 0.0));
    }

    #[test]
    fn test_records_land_in_their_month() {
        let records = vec![
            on("2026-08-05", TransactionKind::Income, 100.0),
            on("2026-07-10", TransactionKind::Expense, 40.0),
        ];
        let trend = monthly_trend(&records, 6, now());
        let jul = &trend[4];
        let aug = &trend[5];
        assert_eq!(jul.month, "Jul");
        assert_eq!(jul.expenses, 40.0);
        assert_eq!(jul.balance, -40.0);
        assert_eq!(aug.month, "Aug");
        assert_eq!(aug.income, 100.0);
        assert_eq!(aug.balance, 100.0);
    }

    #[test]
    fn test_out_of_window_records_are_ignored() {
        let records = vec![
            // before the 6-month window
            on("2026-02-28", TransactionKind::Expense, 500.0),
            // in the future
            on("2026-09-01", TransactionKind::Income, 900.0),
        ];
        let trend = monthly_trend(&records, 6, now());
        assert!(trend.iter().all(|p| p.income == 0.0 && p.expenses == 0.0));
    }

    #[test]
    fn test_year_boundary_does_not_alias() {
        // 14-month window from now=Aug 2026 reaches back to Jul 2025; a
        // record from Aug 2025 must not merge into the Aug 2026 bucket.
        let records = vec![
            on("2025-08-15", TransactionKind::Expense, 75.0),
            on("2026-08-15", TransactionKind::Expense, 25.0),
        ];
        let trend = monthly_trend(&records, 14, now());
        assert_eq!(trend.len(), 14);
        assert_eq!(trend[1].month, "Aug");
        assert_eq!(trend[1].expenses, 75.0);
        assert_eq!(trend[13].month, "Aug");
        assert_eq!(trend[13].expenses, 25.0);
    }

    #[test]
    fn test_values_are_rounded_to_cents() {
        let records = vec![
            on("2026-08-01", TransactionKind::Income, 10.004),
            on("2026-08-02", TransactionKind::Income, 0.003),
        ];
        let trend = monthly_trend(&records, 1, now());
        assert_eq!(trend[0].income, 10.01);
    }

    #[test]
    fn test_unparseable_date_or_amount_is_skipped() {
        let records = vec![
            LedgerRecord {
                amount: RawAmount::Number(50.0),
                kind: Some(TransactionKind::Expense),
                date: Some(RawDate::Text("soon".to_string())),
                ..Default::default()
            },
            LedgerRecord {
                amount: RawAmount::Text("n/a".to_string()),
                kind: Some(TransactionKind::Expense),
                date: Some(RawDate::Text("2026-08-10".to_string())),
                ..Default::default()
            },
            LedgerRecord {
                amount: RawAmount::Number(50.0),
                kind: Some(TransactionKind::Expense),
                date: None,
                ..Default::default()
            },
        ];
        let trend = monthly_trend(&records, 6, now());
        assert!(trend.iter().all(|p| p.expenses == 0.0));
    }

    #[test]
    fn test_day_of_month_is_irrelevant() {
        // Aug 31 and Aug 1 share a bucket even though they are 30 days apart.
        let records = vec![
            on("2026-08-01", TransactionKind::Expense, 10.0),
            on("2026-08-31", TransactionKind::Expense, 20.0),
        ];
        let trend = monthly_trend(&records, 2, now());
        assert_eq!(trend[1].expenses, 30.0);
    }
}
