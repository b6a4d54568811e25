//! Income/expense summary over a set of ledger records.

use serde::{Deserialize, Serialize};

use crate::ledger::{classify, parse_amount, LedgerRecord, TransactionKind};

use super::format_amount;

/// Totals formatted to two decimals, the shape dashboards and the API serve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub income: String,
    pub expenses: String,
    pub balance: String,
}

impl FinancialSummary {
    /// Summary of an empty ledger.
    pub fn zero() -> Self {
        FinancialSummary {
            income: format_amount(0.0),
            expenses: format_amount(0.0),
            balance: format_amount(0.0),
        }
    }
}

/// Total classified income and expenses across `records`.
///
/// The balance is computed as income minus expenses before formatting, so it
/// can never drift from the two totals. Records whose amount fails to parse
/// are skipped; unclassifiable records contribute to neither total.
pub fn summarize(records: &[LedgerRecord]) -> FinancialSummary {
    let mut income = 0.0;
    let mut expenses = 0.0;

    for record in records {
        let Some(amount) = parse_amount(&record.amount) else {
            continue;
        };
        match classify(record) {
            Some(TransactionKind::Income) => income += amount,
            Some(TransactionKind::Expense) => expenses += amount,
            None => {}
        }
    }

    FinancialSummary {
        income: format_amount(income),
        expenses: format_amount(expenses),
        balance: format_amount(income - expenses),
    }
}
