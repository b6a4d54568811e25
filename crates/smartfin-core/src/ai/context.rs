//! Business context for assistant prompts
//!
//! Renders the user's current numbers into a compact system prompt so the
//! assistant answers are grounded in their data instead of generic advice.
//! Amounts and categories only; no credentials, emails or tokens.

use crate::analytics::FinancialSummary;
use crate::models::Transaction;

/// How many recent transactions to include in the prompt.
const RECENT_LIMIT: usize = 10;

/// Build the system prompt for a chat request.
pub fn business_context(
    business_name: Option<&str>,
    summary: &FinancialSummary,
    recent: &[Transaction],
    product_count: i64,
) -> String {
    let mut context = String::new();

    context.push_str(
        "You are SmartFin, a financial assistant for a small business. \
         Answer using the figures below. Be concise and practical. \
         If asked something the data cannot answer, say so.\n\n",
    );

    if let Some(name) = business_name {
        context.push_str(&format!("Business: {}\n", name));
    }
    context.push_str(&format!(
        "Totals: income {}, expenses {}, balance {}\n",
        summary.income, summary.expenses, summary.balance
    ));
    context.push_str(&format!("Products in catalog: {}\n", product_count));

    if recent.is_empty() {
        context.push_str("No transactions recorded yet.\n");
    } else {
        context.push_str("Recent transactions (newest first):\n");
        for tx in recent.iter().take(RECENT_LIMIT) {
            context.push_str(&format!(
                "- {} | {:.2} | {} | {}\n",
                tx.date.format("%Y-%m-%d"),
                tx.amount,
                tx.kind.map(|k| k.as_str()).unwrap_or("unclassified"),
                tx.category.as_deref().unwrap_or("Uncategorized"),
            ));
        }
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TransactionKind;
    use chrono::{TimeZone, Utc};

    fn summary() -> FinancialSummary {
        FinancialSummary {
            income: "1000.00".to_string(),
            expenses: "400.00".to_string(),
            balance: "600.00".to_string(),
        }
    }

    #[test]
    fn test_context_includes_totals_and_business() {
        let ctx = business_context(Some("Corner Shop"), &summary(), &[], 3);
        assert!(ctx.contains("Corner Shop"));
        assert!(ctx.contains("income 1000.00"));
        assert!(ctx.contains("Products in catalog: 3"));
        assert!(ctx.contains("No transactions recorded yet"));
    }

    #[test]
    fn test_context_caps_recent_transactions() {
        let txs: Vec<Transaction> = (0..20)
            .map(|i| Transaction {
                id: i,
                user_id: 1,
                description: None,
                amount: 10.0,
                kind: Some(TransactionKind::Expense),
                category: Some("Supplies".to_string()),
                date: Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap(),
                created_at: Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap(),
            })
            .collect();

        let ctx = business_context(None, &summary(), &txs, 0);
        assert_eq!(ctx.matches("Supplies").count(), RECENT_LIMIT);
    }
}
