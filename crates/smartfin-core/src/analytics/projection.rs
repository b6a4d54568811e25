//! Naive flat cashflow projection from monthly history.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::{classify, parse_amount, parse_date, LedgerRecord, TransactionKind};

use super::{format_amount, shift_month};

/// Default number of future months to project.
pub const DEFAULT_PROJECTION_MONTHS: usize = 3;

/// One projected month, amounts formatted to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedMonth {
    /// Calendar month in "YYYY-MM" form.
    pub month: String,
    pub income: String,
    pub expenses: String,
    pub balance: String,
}

/// A flat-average projection plus the note explaining how it was computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashflowProjection {
    /// How the numbers were derived. Surfaced verbatim in every output so a
    /// flat average is never mistaken for a forecast model.
    pub basis: String,
    pub months: Vec<ProjectedMonth>,
}

/// Project cashflow for `future_months` starting the month after `now`.
///
/// History is bucketed by calendar month; the projection repeats the mean
/// monthly income and expenses of every historical month that has at least
/// one classified record. With no history the projection is all zeros.
/// Records with unparseable amounts or dates are skipped.
pub fn project_cashflow(
    records: &[LedgerRecord],
    future_months: usize,
    now: DateTime<Utc>,
) -> CashflowProjection {
    let mut history: BTreeMap<(i32, u32), (f64, f64)> = BTreeMap::new();

    for record in records {
        let Some(date) = record.date.as_ref().and_then(parse_date) else {
            continue;
        };
        let Some(amount) = parse_amount(&record.amount) else {
            continue;
        };
        let Some(kind) = classify(record) else {
            continue;
        };
        let entry = history
            .entry((date.year(), date.month()))
            .or_insert((0.0, 0.0));
        match kind {
            TransactionKind::Income => entry.0 += amount,
            TransactionKind::Expense => entry.1 += amount,
        }
    }

    let month_count = history.len();
    let (mean_income, mean_expenses) = if month_count == 0 {
        (0.0, 0.0)
    } else {
        let income: f64 = history.values().map(|(i, _)| i).sum();
        let expenses: f64 = history.values().map(|(_, e)| e).sum();
        (
            income / month_count as f64,
            expenses / month_count as f64,
        )
    };

    let months = (1..=future_months)
        .map(|offset| {
            let (year, month) = shift_month(now.year(), now.month(), offset as i32);
            ProjectedMonth {
                month: format!("{:04}-{:02}", year, month),
                income: format_amount(mean_income),
                expenses: format_amount(mean_expenses),
                balance: format_amount(mean_income - mean_expenses),
            }
        })
        .collect();

    let basis = match month_count {
        0 => "flat average with no recorded history".to_string(),
        1 => "flat average of 1 month of history".to_string(),
        n => format!("flat average of {} months of history", n),
    };

    CashflowProjection { basis, months }
}
