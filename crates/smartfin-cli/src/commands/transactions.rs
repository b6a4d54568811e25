//! Transaction and expense commands

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use smartfin_core::db::Database;
use smartfin_core::ledger::{parse_amount, parse_date, RawAmount, RawDate, TransactionKind};
use smartfin_core::models::{NewExpense, NewTransaction, User};

use super::truncate;

/// Parse a user-supplied amount through the tolerant ledger parser.
fn parse_cli_amount(raw: &str) -> Result<f64> {
    parse_amount(&RawAmount::Text(raw.to_string()))
        .with_context(|| format!("'{}' is not a valid amount", raw))
}

/// Parse a user-supplied date, defaulting to now when absent.
fn parse_cli_date(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        None => Ok(Utc::now()),
        Some(s) => parse_date(&RawDate::Text(s.to_string()))
            .with_context(|| format!("'{}' is not a parseable date", s)),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_tx_add(
    db: &Database,
    user: &User,
    amount: &str,
    description: Option<&str>,
    kind: Option<&str>,
    category: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    let amount = parse_cli_amount(amount)?;
    let kind = kind
        .map(|k| k.parse::<TransactionKind>())
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;
    let date = parse_cli_date(date)?;

    let tx = db.insert_transaction(
        user.id,
        &NewTransaction {
            description: description.map(String::from),
            amount,
            kind,
            category: category.map(String::from),
            date,
        },
    )?;

    println!(
        "✅ Recorded transaction {} ({} {:.2})",
        tx.id,
        tx.kind.map(|k| k.as_str()).unwrap_or("unclassified"),
        tx.amount
    );

    Ok(())
}

pub fn cmd_tx_list(db: &Database, user: &User, limit: i64) -> Result<()> {
    let transactions = db.list_transactions(user.id, None, None, limit, 0)?;

    if transactions.is_empty() {
        println!("No transactions yet. Record one with:");
        println!("  smartfin tx add 1200.50 --type income --category Sales");
        return Ok(());
    }

    println!();
    println!("💳 Transactions");
    println!(
        "   {:>4}  {:10}  {:>10}  {:8}  {:16}  {}",
        "ID", "Date", "Amount", "Type", "Category", "Description"
    );
    println!("   ───────────────────────────────────────────────────────────────────");

    for tx in transactions {
        println!(
            "   {:>4}  {}  {:>10.2}  {:8}  {:16}  {}",
            tx.id,
            tx.date.format("%Y-%m-%d"),
            tx.amount,
            tx.kind.map(|k| k.as_str()).unwrap_or("-"),
            truncate(tx.category.as_deref().unwrap_or("-"), 16),
            truncate(tx.description.as_deref().unwrap_or(""), 32)
        );
    }

    Ok(())
}

pub fn cmd_expense_add(
    db: &Database,
    user: &User,
    amount: &str,
    description: Option<&str>,
    category: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    let amount = parse_cli_amount(amount)?;
    let date = parse_cli_date(date)?;

    let expense = db.insert_expense(
        user.id,
        &NewExpense {
            description: description.map(String::from),
            amount,
            category: category.map(String::from),
            date,
        },
    )?;

    println!("✅ Recorded expense {} ({:.2})", expense.id, expense.amount);

    Ok(())
}

pub fn cmd_expense_list(db: &Database, user: &User, limit: i64) -> Result<()> {
    let expenses = db.list_expenses(user.id, None, limit, 0)?;

    if expenses.is_empty() {
        println!("No expenses yet. Record one with:");
        println!("  smartfin expense add 89.99 --category Supplies");
        return Ok(());
    }

    println!();
    println!("🧾 Expenses");
    println!(
        "   {:>4}  {:10}  {:>10}  {:16}  {}",
        "ID", "Date", "Amount", "Category", "Description"
    );
    println!("   ─────────────────────────────────────────────────────────");

    for expense in expenses {
        println!(
            "   {:>4}  {}  {:>10.2}  {:16}  {}",
            expense.id,
            expense.date.format("%Y-%m-%d"),
            expense.amount,
            truncate(expense.category.as_deref().unwrap_or("-"), 16),
            truncate(expense.description.as_deref().unwrap_or(""), 32)
        );
    }

    Ok(())
}
