//! Pure aggregation functions over in-memory ledger records.
//!
//! Every function here is synchronous, deterministic and side-effect free:
//! the caller passes the records and, where calendars matter, the `now`
//! instant. Nothing in this module reads the wall clock or touches the
//! database, which keeps the outputs reproducible in tests.

pub mod categories;
pub mod projection;
pub mod summary;
pub mod trends;

pub use categories::{group_by_category, CategoryBreakdown, CategoryGroup, UNCATEGORIZED};
pub use projection::{project_cashflow, CashflowProjection, ProjectedMonth, DEFAULT_PROJECTION_MONTHS};
pub use summary::{summarize, FinancialSummary};
pub use trends::{monthly_trend, MonthlyTrendPoint, DEFAULT_TREND_MONTHS};

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Format a monetary value to exactly two decimals.
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

/// Round to two decimals without changing the representation to a string.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Whole calendar months from `from` to `to`. Positive when `from` is in
/// an earlier month, regardless of the day of month.
pub(crate) fn months_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i32 {
    (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32)
}

/// Shift a (year, month) pair by `offset` calendar months.
pub(crate) fn shift_month(year: i32, month: u32, offset: i32) -> (i32, u32) {
    let total = year * 12 + month as i32 - 1 + offset;
    (total.div_euclid(12), (total.rem_euclid(12) + 1) as u32)
}

/// Short English month name ("Jan".."Dec") for a bucket label.
pub(crate) fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_shift_month_wraps_years() {
        assert_eq!(shift_month(2026, 11, 1), (2026, 12));
        assert_eq!(shift_month(2026, 11, 2), (2027, 1));
        assert_eq!(shift_month(2026, 1, -1), (2025, 12));
        assert_eq!(shift_month(2026, 6, -18), (2024, 12));
    }

    #[test]
    fn test_months_between_ignores_days() {
        let jan_31 = Utc.with_ymd_and_hms(2026, 1, 31, 0, 0, 0).unwrap();
        let feb_1 = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(months_between(jan_31, feb_1), 1);
        assert_eq!(months_between(feb_1, jan_31), -1);

        let dec_2025 = Utc.with_ymd_and_hms(2025, 12, 15, 0, 0, 0).unwrap();
        let mar_2026 = Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap();
        assert_eq!(months_between(dec_2025, mar_2026), 3);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(1000.5), "1000.50");
        assert_eq!(format_amount(-200.0), "-200.00");
        assert_eq!(format_amount(0.005), "0.01");
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(2026, 1), "Jan");
        assert_eq!(month_label(2026, 12), "Dec");
    }
}
