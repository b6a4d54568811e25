//! The built-in notification rules.
//!
//! Each rule reads the pre-computed aggregates in [`RuleContext`] and emits
//! zero or more notifications. Rules return `Result` so a rule that cannot
//! make sense of its inputs fails loudly to the engine instead of silently
//! producing garbage; the engine decides what failure means for the batch.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::analytics::{CategoryBreakdown, FinancialSummary, MonthlyTrendPoint};
use crate::error::{Error, Result};
use crate::models::UserProfile;

use super::types::{Notification, NotificationId};

/// Days before month end at which the tax reminder starts firing.
const TAX_REMINDER_WINDOW_DAYS: u32 = 3;

/// Days after signup during which the welcome notification shows.
const WELCOME_WINDOW_DAYS: i64 = 7;

/// Everything a rule may read. Aggregates are computed once by the caller
/// and shared across all rules; rules never recompute or mutate them.
#[derive(Debug, Clone)]
pub struct RuleContext<'a> {
    pub summary: &'a FinancialSummary,
    /// Monthly trend ordered oldest to newest.
    pub trend: &'a [MonthlyTrendPoint],
    pub categories: &'a CategoryBreakdown,
    /// Number of transaction entities on the account (not ledger records).
    pub transaction_count: usize,
    /// Number of expense entities on the account.
    pub expense_count: usize,
    pub profile: Option<&'a UserProfile>,
    pub now: DateTime<Utc>,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        summary: &'a FinancialSummary,
        trend: &'a [MonthlyTrendPoint],
        categories: &'a CategoryBreakdown,
        now: DateTime<Utc>,
    ) -> Self {
        RuleContext {
            summary,
            trend,
            categories,
            transaction_count: 0,
            expense_count: 0,
            profile: None,
            now,
        }
    }

    pub fn with_counts(mut self, transaction_count: usize, expense_count: usize) -> Self {
        self.transaction_count = transaction_count;
        self.expense_count = expense_count;
        self
    }

    pub fn with_profile(mut self, profile: &'a UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }
}

/// A single notification rule.
pub trait NotificationRule: Send + Sync {
    /// Stable name used in logs when the rule fails.
    fn name(&self) -> &'static str;

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<Notification>>;
}

/// Fires when the overall balance is negative.
pub struct LowBalanceRule;

impl NotificationRule for LowBalanceRule {
    fn name(&self) -> &'static str {
        "low_balance"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<Notification>> {
        let balance: f64 = ctx.summary.balance.parse().map_err(|_| {
            Error::InvalidData(format!(
                "summary balance is not numeric: {:?}",
                ctx.summary.balance
            ))
        })?;
        if balance < 0.0 {
            return Ok(vec![Notification::new(
                NotificationId::LowBalance,
                format!(
                    "Your balance is negative ({}). Expenses currently exceed recorded income.",
                    ctx.summary.balance
                ),
                ctx.now,
            )]);
        }
        Ok(Vec::new())
    }
}

/// Compares the two most recent trend months and reports the swing.
pub struct ExpenseTrendRule;

impl NotificationRule for ExpenseTrendRule {
    fn name(&self) -> &'static str {
        "expense_trend"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<Notification>> {
        let [.., previous, current] = ctx.trend else {
            return Ok(Vec::new());
        };

        let delta = current.expenses - previous.expenses;
        let pct = if previous.expenses == 0.0 {
            0.0
        } else {
            delta / previous.expenses * 100.0
        };
        if !pct.is_finite() {
            return Ok(Vec::new());
        }

        if delta > 0.0 {
            Ok(vec![Notification::new(
                NotificationId::ExpenseIncrease,
                format!(
                    "Spending in {} is up {:.1}% (${:.2}) compared with {}.",
                    current.month, pct, delta, previous.month
                ),
                ctx.now,
            )])
        } else if delta < 0.0 {
            Ok(vec![Notification::new(
                NotificationId::ExpenseDecrease,
                format!(
                    "Spending in {} is down {:.1}% (${:.2}) compared with {}.",
                    current.month,
                    pct.abs(),
                    delta.abs(),
                    previous.month
                ),
                ctx.now,
            )])
        } else {
            Ok(Vec::new())
        }
    }
}

/// Names the category with the largest non-income total.
pub struct TopCategoryRule;

impl NotificationRule for TopCategoryRule {
    fn name(&self) -> &'static str {
        "top_category"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<Notification>> {
        let mut best: Option<(&str, f64, usize)> = None;
        for (label, group) in ctx.categories.iter() {
            if label.to_lowercase().contains("income") {
                continue;
            }
            let total = group.total.parse::<f64>().unwrap_or(0.0);
            if total <= 0.0 {
                continue;
            }
            // strict comparison keeps the first label on ties
            if best.map_or(true, |(_, t, _)| total > t) {
                best = Some((label.as_str(), total, group.count));
            }
        }

        let Some((label, total, count)) = best else {
            return Ok(Vec::new());
        };
        let records = if count == 1 { "record" } else { "records" };
        Ok(vec![Notification::new(
            NotificationId::TopCategory,
            format!(
                "Most of your spending is in {}: ${:.2} across {} {}.",
                label, total, count, records
            ),
            ctx.now,
        )])
    }
}

/// Nudges accounts that record expenses but no transactions.
pub struct TrackIncomeRule;

impl NotificationRule for TrackIncomeRule {
    fn name(&self) -> &'static str {
        "track_income"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<Notification>> {
        if ctx.transaction_count == 0 && ctx.expense_count > 0 {
            return Ok(vec![Notification::new(
                NotificationId::TrackIncome,
                "You're tracking expenses but no income yet. Record income transactions \
                 for a complete picture of the business.",
                ctx.now,
            )]);
        }
        Ok(Vec::new())
    }
}

/// Fires in the last days of each calendar month.
pub struct TaxReminderRule;

impl NotificationRule for TaxReminderRule {
    fn name(&self) -> &'static str {
        "tax_reminder"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<Notification>> {
        let (next_year, next_month) = crate::analytics::shift_month(ctx.now.year(), ctx.now.month(), 1);
        let last_day = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| Error::InvalidData("month-end arithmetic failed".to_string()))?;

        let days_left = last_day.day().saturating_sub(ctx.now.day());
        if days_left > TAX_REMINDER_WINDOW_DAYS {
            return Ok(Vec::new());
        }

        let phrase = if days_left == 1 {
            "1 day".to_string()
        } else {
            format!("{} days", days_left)
        };
        Ok(vec![Notification::new(
            NotificationId::TaxReminder,
            format!(
                "{} left in {}. A good time to reconcile the books for tax records.",
                phrase,
                ctx.now.format("%B")
            ),
            ctx.now,
        )])
    }
}

/// Greets accounts created within the last week.
pub struct WelcomeRule;

impl NotificationRule for WelcomeRule {
    fn name(&self) -> &'static str {
        "welcome"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<Notification>> {
        let Some(profile) = ctx.profile else {
            return Ok(Vec::new());
        };
        let days = (ctx.now - profile.created_at).num_days();
        if !(0..WELCOME_WINDOW_DAYS).contains(&days) {
            return Ok(Vec::new());
        }

        let message = match profile.business_name.as_deref() {
            Some(name) => format!(
                "Welcome to SmartFin, {}! Add your products and record a sale to see \
                 the dashboard come alive.",
                name
            ),
            None => "Welcome to SmartFin! Add your products and record a sale to see \
                     the dashboard come alive."
                .to_string(),
        };
        Ok(vec![Notification::new(
            NotificationId::Welcome,
            message,
            ctx.now,
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{FinancialSummary, MonthlyTrendPoint};
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn summary(income: &str, expenses: &str, balance: &str) -> FinancialSummary {
        FinancialSummary {
            income: income.to_string(),
            expenses: expenses.to_string(),
            balance: balance.to_string(),
        }
    }

    fn trend_point(month: &str, expenses: f64) -> MonthlyTrendPoint {
        MonthlyTrendPoint {
            month: month.to_string(),
            income: 0.0,
            expenses,
            balance: -expenses,
        }
    }

    fn mid_month_now() -> DateTime<Utc> {
        // far from month end so the tax reminder stays quiet
        Utc.with_ymd_and_hms(2026, 8, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_low_balance_fires_on_negative() {
        let s = summary("1000.00", "1200.00", "-200.00");
        let trend = [];
        let categories = BTreeMap::new();
        let ctx = RuleContext::new(&s, &trend, &categories, mid_month_now());

        let out = LowBalanceRule.evaluate(&ctx).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, NotificationId::LowBalance);
        assert!(out[0].message.contains("-200"));
    }

    #[test]
    fn test_low_balance_quiet_when_positive() {
        let s = summary("1000.00", "200.00", "800.00");
        let trend = [];
        let categories = BTreeMap::new();
        let ctx = RuleContext::new(&s, &trend, &categories, mid_month_now());
        assert!(LowBalanceRule.evaluate(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_low_balance_rejects_corrupt_summary() {
        let s = summary("0.00", "0.00", "not-a-number");
        let trend = [];
        let categories = BTreeMap::new();
        let ctx = RuleContext::new(&s, &trend, &categories, mid_month_now());
        assert!(LowBalanceRule.evaluate(&ctx).is_err());
    }

    #[test]
    fn test_expense_trend_reports_increase() {
        let s = summary("0.00", "0.00", "0.00");
        let trend = [trend_point("Jun", 100.0), trend_point("Jul", 150.0)];
        let categories = BTreeMap::new();
        let ctx = RuleContext::new(&s, &trend, &categories, mid_month_now());

        let out = ExpenseTrendRule.evaluate(&ctx).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, NotificationId::ExpenseIncrease);
        assert!(out[0].message.contains("50.0%"));
        assert!(out[0].message.contains("$50.00"));
    }

    #[test]
    fn test_expense_trend_reports_decrease_with_absolute_values() {
        let s = summary("0.00", "0.00", "0.00");
        let trend = [trend_point("Jun", 200.0), trend_point("Jul", 150.0)];
        let categories = BTreeMap::new();
        let ctx = RuleContext::new(&s, &trend, &categories, mid_month_now());

        let out = ExpenseTrendRule.evaluate(&ctx).unwrap();
        assert_eq!(out[0].id, NotificationId::ExpenseDecrease);
        assert!(out[0].message.contains("25.0%"));
        assert!(out[0].message.contains("$50.00"));
        assert!(!out[0].message.contains("-"));
    }

    #[test]
    fn test_expense_trend_zero_baseline_reports_zero_pct() {
        let s = summary("0.00", "0.00", "0.00");
        let trend = [trend_point("Jun", 0.0), trend_point("Jul", 80.0)];
        let categories = BTreeMap::new();
        let ctx = RuleContext::new(&s, &trend, &categories, mid_month_now());

        let out = ExpenseTrendRule.evaluate(&ctx).unwrap();
        assert_eq!(out[0].id, NotificationId::ExpenseIncrease);
        assert!(out[0].message.contains("0.0%"));
    }

    #[test]
    fn test_expense_trend_needs_two_months() {
        let s = summary("0.00", "0.00", "0.00");
        let trend = [trend_point("Jul", 150.0)];
        let categories = BTreeMap::new();
        let ctx = RuleContext::new(&s, &trend, &categories, mid_month_now());
        assert!(ExpenseTrendRule.evaluate(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_top_category_skips_income_groups() {
        let s = summary("0.00", "0.00", "0.00");
        let trend = [];
        let mut categories = BTreeMap::new();
        categories.insert(
            "Consulting Income".to_string(),
            crate::analytics::CategoryGroup {
                total: "5000.00".to_string(),
                count: 2,
                transactions: Vec::new(),
            },
        );
        categories.insert(
            "Rent".to_string(),
            crate::analytics::CategoryGroup {
                total: "900.00".to_string(),
                count: 1,
                transactions: Vec::new(),
            },
        );
        let ctx = RuleContext::new(&s, &trend, &categories, mid_month_now());

        let out = TopCategoryRule.evaluate(&ctx).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, NotificationId::TopCategory);
        assert!(out[0].message.contains("Rent"));
        assert!(out[0].message.contains("$900.00"));
        assert!(out[0].message.contains("1 record"));
    }

    #[test]
    fn test_top_category_quiet_without_positive_spending() {
        let s = summary("0.00", "0.00", "0.00");
        let trend = [];
        let mut categories = BTreeMap::new();
        categories.insert(
            "Refunds".to_string(),
            crate::analytics::CategoryGroup {
                total: "-50.00".to_string(),
                count: 1,
                transactions: Vec::new(),
            },
        );
        let ctx = RuleContext::new(&s, &trend, &categories, mid_month_now());
        assert!(TopCategoryRule.evaluate(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_track_income_only_when_expenses_alone() {
        let s = summary("0.00", "0.00", "0.00");
        let trend = [];
        let categories = BTreeMap::new();

        let ctx = RuleContext::new(&s, &trend, &categories, mid_month_now()).with_counts(0, 3);
        let out = TrackIncomeRule.evaluate(&ctx).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, NotificationId::TrackIncome);

        let ctx = RuleContext::new(&s, &trend, &categories, mid_month_now()).with_counts(1, 3);
        assert!(TrackIncomeRule.evaluate(&ctx).unwrap().is_empty());

        let ctx = RuleContext::new(&s, &trend, &categories, mid_month_now()).with_counts(0, 0);
        assert!(TrackIncomeRule.evaluate(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_tax_reminder_fires_near_month_end() {
        let s = summary("0.00", "0.00", "0.00");
        let trend = [];
        let categories = BTreeMap::new();

        // Aug 29: two days before Aug 31
        let now = Utc.with_ymd_and_hms(2026, 8, 29, 9, 0, 0).unwrap();
        let ctx = RuleContext::new(&s, &trend, &categories, now);
        let out = TaxReminderRule.evaluate(&ctx).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, NotificationId::TaxReminder);
        assert!(out[0].message.contains("2 days"));
        assert!(out[0].message.contains("August"));
    }

    #[test]
    fn test_tax_reminder_uses_singular_day() {
        let s = summary("0.00", "0.00", "0.00");
        let trend = [];
        let categories = BTreeMap::new();
        let now = Utc.with_ymd_and_hms(2026, 8, 30, 9, 0, 0).unwrap();
        let ctx = RuleContext::new(&s, &trend, &categories, now);
        let out = TaxReminderRule.evaluate(&ctx).unwrap();
        assert!(out[0].message.contains("1 day left"));
        assert!(!out[0].message.contains("1 days"));
    }

    #[test]
    fn test_tax_reminder_quiet_mid_month() {
        let s = summary("0.00", "0.00", "0.00");
        let trend = [];
        let categories = BTreeMap::new();
        let ctx = RuleContext::new(&s, &trend, &categories, mid_month_now());
        assert!(TaxReminderRule.evaluate(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_welcome_window_is_seven_days() {
        let s = summary("0.00", "0.00", "0.00");
        let trend = [];
        let categories = BTreeMap::new();
        let now = mid_month_now();

        let fresh = UserProfile {
            business_name: Some("Corner Bakery".to_string()),
            created_at: now - chrono::Duration::days(2),
        };
        let ctx = RuleContext::new(&s, &trend, &categories, now).with_profile(&fresh);
        let out = WelcomeRule.evaluate(&ctx).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, NotificationId::Welcome);
        assert!(out[0].message.contains("Corner Bakery"));

        let old = UserProfile {
            business_name: None,
            created_at: now - chrono::Duration::days(8),
        };
        let ctx = RuleContext::new(&s, &trend, &categories, now).with_profile(&old);
        assert!(WelcomeRule.evaluate(&ctx).unwrap().is_empty());

        // created "in the future" (clock skew) stays quiet too
        let skewed = UserProfile {
            business_name: None,
            created_at: now + chrono::Duration::days(1),
        };
        let ctx = RuleContext::new(&s, &trend, &categories, now).with_profile(&skewed);
        assert!(WelcomeRule.evaluate(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_welcome_needs_a_profile() {
        let s = summary("0.00", "0.00", "0.00");
        let trend = [];
        let categories = BTreeMap::new();
        let ctx = RuleContext::new(&s, &trend, &categories, mid_month_now());
        assert!(WelcomeRule.evaluate(&ctx).unwrap().is_empty());
    }
}
