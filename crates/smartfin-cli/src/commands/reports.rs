//! Report, dashboard and notification commands

use anyhow::Result;
use chrono::Utc;
use smartfin_core::db::Database;
use smartfin_core::models::User;
use smartfin_core::notifications::{NotificationEngine, NotificationKind, RuleContext};
use smartfin_core::{
    group_by_category, monthly_trend, project_cashflow, summarize, DEFAULT_TREND_MONTHS,
};

use super::truncate;

pub fn cmd_report_summary(db: &Database, user: &User) -> Result<()> {
    let records = db.ledger_records(user.id)?;
    let summary = summarize(&records);

    println!();
    println!("📊 Financial Summary");
    println!("   ─────────────────────────────");
    println!("   Income:   {:>12}", summary.income);
    println!("   Expenses: {:>12}", summary.expenses);
    println!("   Balance:  {:>12}", summary.balance);
    println!();

    Ok(())
}

pub fn cmd_report_trends(db: &Database, user: &User, months: usize) -> Result<()> {
    anyhow::ensure!(months >= 1, "months must be at least 1");

    let records = db.ledger_records(user.id)?;
    let trend = monthly_trend(&records, months, Utc::now());

    println!();
    println!("📈 Monthly Trend (last {} months)", months);
    println!(
        "   {:6}  {:>10}  {:>10}  {:>10}",
        "Month", "Income", "Expenses", "Balance"
    );
    println!("   ────────────────────────────────────────────");

    for point in trend {
        println!(
            "   {:6}  {:>10.2}  {:>10.2}  {:>10.2}",
            point.month, point.income, point.expenses, point.balance
        );
    }
    println!();

    Ok(())
}

pub fn cmd_report_categories(db: &Database, user: &User) -> Result<()> {
    let records = db.ledger_records(user.id)?;
    let breakdown = group_by_category(&records);

    if breakdown.is_empty() {
        println!("No categorized records yet.");
        return Ok(());
    }

    println!();
    println!("🏷️  Category Breakdown");
    println!("   {:24}  {:>12}  {:>6}", "Category", "Total", "Count");
    println!("   ────────────────────────────────────────────────");

    for (label, group) in &breakdown {
        println!(
            "   {:24}  {:>12}  {:>6}",
            truncate(label, 24),
            group.total,
            group.count
        );
    }
    println!();

    Ok(())
}

pub fn cmd_report_forecast(db: &Database, user: &User, months: usize) -> Result<()> {
    anyhow::ensure!(months >= 1, "months must be at least 1");

    let records = db.ledger_records(user.id)?;
    let projection = project_cashflow(&records, months, Utc::now());

    println!();
    println!("🔮 Cashflow Forecast ({} months ahead)", months);
    println!("   {}", projection.basis);
    println!();
    println!(
        "   {:8}  {:>10}  {:>10}  {:>10}",
        "Month", "Income", "Expenses", "Balance"
    );
    println!("   ──────────────────────────────────────────────");

    for month in &projection.months {
        println!(
            "   {:8}  {:>10}  {:>10}  {:>10}",
            month.month, month.income, month.expenses, month.balance
        );
    }
    println!();

    Ok(())
}

pub fn cmd_dashboard(db: &Database, user: &User) -> Result<()> {
    let records = db.ledger_records(user.id)?;
    let summary = summarize(&records);
    let breakdown = group_by_category(&records);

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│         💰 SmartFin Dashboard           │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    if let Some(business) = &user.business_name {
        println!("  Business: {}", business);
    }
    println!("  Income:   {:>12}", summary.income);
    println!("  Expenses: {:>12}", summary.expenses);
    println!("  Balance:  {:>12}", summary.balance);
    println!();
    println!("  Transactions: {}", db.count_transactions(user.id)?);
    println!("  Expenses:     {}", db.count_expenses(user.id)?);
    println!("  Products:     {}", db.count_products(user.id)?);
    println!("  Contacts:     {}", db.count_contacts(user.id)?);

    // Top categories by absolute total
    let mut top: Vec<_> = breakdown
        .iter()
        .map(|(label, group)| {
            let total = group.total.parse::<f64>().unwrap_or(0.0);
            (label, total, group.count)
        })
        .collect();
    top.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));

    if !top.is_empty() {
        println!();
        println!("  Top categories:");
        for (label, total, count) in top.iter().take(5) {
            println!("    {:20}  {:>10.2}  ({} records)", truncate(label, 20), total, count);
        }
    }

    print_notifications(db, user)?;

    Ok(())
}

pub fn cmd_notifications(db: &Database, user: &User) -> Result<()> {
    print_notifications(db, user)
}

fn print_notifications(db: &Database, user: &User) -> Result<()> {
    let records = db.ledger_records(user.id)?;
    let summary = summarize(&records);
    let trend = monthly_trend(&records, DEFAULT_TREND_MONTHS, Utc::now());
    let breakdown = group_by_category(&records);
    let profile = user.profile();

    let ctx = RuleContext::new(&summary, &trend, &breakdown, Utc::now())
        .with_counts(
            db.count_transactions(user.id)? as usize,
            db.count_expenses(user.id)? as usize,
        )
        .with_profile(&profile);

    let notifications = NotificationEngine::new().generate(&ctx);

    println!();
    println!("🔔 Notifications");
    println!("   ─────────────────────────────────────────────────────────────");

    for notification in &notifications {
        let icon = match notification.kind {
            NotificationKind::Alert => "⚠️ ",
            NotificationKind::Insight => "💡",
            NotificationKind::Info => "ℹ️ ",
        };
        println!(
            "   {} [{}] {}",
            icon, notification.priority, notification.message
        );
    }
    println!();

    Ok(())
}
