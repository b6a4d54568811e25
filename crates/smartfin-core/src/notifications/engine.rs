//! Notification engine: evaluates every rule, isolates failures, and
//! guarantees a non-empty, priority-ordered result.

use chrono::{DateTime, Utc};
use tracing::warn;

use super::rules::{
    ExpenseTrendRule, LowBalanceRule, NotificationRule, RuleContext, TaxReminderRule,
    TopCategoryRule, TrackIncomeRule, WelcomeRule,
};
use super::types::{Notification, NotificationId};

/// Runs the registered rules in a fixed order.
pub struct NotificationEngine {
    rules: Vec<Box<dyn NotificationRule>>,
}

impl NotificationEngine {
    /// Engine with the six built-in rules.
    pub fn new() -> Self {
        let mut engine = NotificationEngine { rules: Vec::new() };
        engine.register(Box::new(LowBalanceRule));
        engine.register(Box::new(ExpenseTrendRule));
        engine.register(Box::new(TopCategoryRule));
        engine.register(Box::new(TrackIncomeRule));
        engine.register(Box::new(TaxReminderRule));
        engine.register(Box::new(WelcomeRule));
        engine
    }

    pub fn register(&mut self, rule: Box<dyn NotificationRule>) {
        self.rules.push(rule);
    }

    /// Evaluate every rule against `ctx`.
    ///
    /// Rules fail independently: an `Err` is logged and skipped so one broken
    /// rule never suppresses the rest. When nothing fires, including the case
    /// where every rule failed, the fixed fallback pair is returned instead.
    /// The result is therefore never empty and never an error. Output is
    /// sorted high, medium, low; registration order breaks ties (stable sort).
    pub fn generate(&self, ctx: &RuleContext<'_>) -> Vec<Notification> {
        let mut notifications = Vec::new();
        for rule in &self.rules {
            match rule.evaluate(ctx) {
                Ok(mut items) => notifications.append(&mut items),
                Err(e) => {
                    warn!(rule = rule.name(), "Notification rule failed: {}", e);
                }
            }
        }

        if notifications.is_empty() {
            notifications = Self::fallback(ctx.now);
        }

        notifications.sort_by_key(|n| n.priority.rank());
        notifications
    }

    /// Fixed defaults shown when no rule produces anything.
    fn fallback(now: DateTime<Utc>) -> Vec<Notification> {
        vec![
            Notification::new(
                NotificationId::GetStarted,
                "Add your first transactions to unlock summaries, trends and cashflow \
                 projections.",
                now,
            ),
            Notification::new(
                NotificationId::ExploreReports,
                "Browse the reports section to see where money comes and goes each month.",
                now,
            ),
        ]
    }
}

impl Default for NotificationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{FinancialSummary, MonthlyTrendPoint};
    use crate::error::{Error, Result};
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn summary(income: &str, expenses: &str, balance: &str) -> FinancialSummary {
        FinancialSummary {
            income: income.to_string(),
            expenses: expenses.to_string(),
            balance: balance.to_string(),
        }
    }

    fn quiet_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_ledger_falls_back_to_defaults() {
        let s = summary("0.00", "0.00", "0.00");
        let trend = [];
        let categories = BTreeMap::new();
        let ctx = RuleContext::new(&s, &trend, &categories, quiet_now());

        let out = NotificationEngine::new().generate(&ctx);
        let ids: Vec<NotificationId> = out.iter().map(|n| n.id).collect();
        assert_eq!(
            ids,
            vec![NotificationId::GetStarted, NotificationId::ExploreReports]
        );
    }

    #[test]
    fn test_high_priority_sorts_first() {
        let s = summary("1000.00", "1200.00", "-200.00");
        let trend = [
            MonthlyTrendPoint {
                month: "Jun".to_string(),
                income: 0.0,
                expenses: 100.0,
                balance: -100.0,
            },
            MonthlyTrendPoint {
                month: "Jul".to_string(),
                income: 0.0,
                expenses: 150.0,
                balance: -150.0,
            },
        ];
        let categories = BTreeMap::new();
        let ctx = RuleContext::new(&s, &trend, &categories, quiet_now());

        let out = NotificationEngine::new().generate(&ctx);
        assert!(out.len() >= 2);
        assert_eq!(out[0].id, NotificationId::LowBalance);
        for pair in out.windows(2) {
            assert!(pair[0].priority.rank() <= pair[1].priority.rank());
        }
    }

    #[test]
    fn test_repeated_generation_is_deterministic() {
        let s = summary("1000.00", "1200.00", "-200.00");
        let trend = [];
        let categories = BTreeMap::new();
        let ctx = RuleContext::new(&s, &trend, &categories, quiet_now());

        let engine = NotificationEngine::new();
        let first = engine.generate(&ctx);
        let second = engine.generate(&ctx);
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    struct BrokenRule;

    impl NotificationRule for BrokenRule {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn evaluate(&self, _ctx: &RuleContext<'_>) -> Result<Vec<Notification>> {
            Err(Error::InvalidData("boom".to_string()))
        }
    }

    #[test]
    fn test_failing_rule_does_not_suppress_others() {
        let s = summary("1000.00", "1200.00", "-200.00");
        let trend = [];
        let categories = BTreeMap::new();
        let ctx = RuleContext::new(&s, &trend, &categories, quiet_now());

        let mut engine = NotificationEngine::new();
        engine.register(Box::new(BrokenRule));
        let out = engine.generate(&ctx);
        assert_eq!(out[0].id, NotificationId::LowBalance);
    }

    #[test]
    fn test_all_rules_failing_yields_fallback() {
        // corrupt balance makes the low-balance rule error; with no other
        // signals the engine must still answer with the defaults
        let s = summary("0.00", "0.00", "garbage");
        let trend = [];
        let categories = BTreeMap::new();
        let ctx = RuleContext::new(&s, &trend, &categories, quiet_now());

        let out = NotificationEngine::new().generate(&ctx);
        assert_eq!(out[0].id, NotificationId::GetStarted);
        assert_eq!(out[1].id, NotificationId::ExploreReports);
    }
}
