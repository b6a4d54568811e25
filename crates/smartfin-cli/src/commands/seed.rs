//! Demo data generation
//!
//! Seeds a few months of plausible bakery numbers so reports, trends and
//! the forecast have something to show straight after install.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use smartfin_core::db::Database;
use smartfin_core::ledger::TransactionKind;
use smartfin_core::models::{ContactKind, NewContact, NewExpense, NewProduct, NewTransaction, User};

const SEED_EMAIL: &str = "demo@smartfin.local";
const SEED_PASSWORD: &str = "demo-password";

pub fn cmd_seed(db: &Database, user_email: Option<&str>) -> Result<()> {
    let user = match user_email {
        Some(email) => db
            .get_user_by_email(email)?
            .with_context(|| format!("No user with email: {}", email))?,
        None => match db.get_user_by_email(SEED_EMAIL)? {
            Some(user) => user,
            None => {
                let user = db.create_user(SEED_EMAIL, SEED_PASSWORD, Some("Demo Bakery"))?;
                println!(
                    "👤 Created demo user {} (password: {})",
                    SEED_EMAIL, SEED_PASSWORD
                );
                user
            }
        },
    };

    if db.count_transactions(user.id)? > 0 || db.count_expenses(user.id)? > 0 {
        anyhow::bail!("{} already has data; seeding only fills an empty ledger", user.email);
    }

    seed_ledger(db, &user)?;
    if db.count_products(user.id)? == 0 {
        seed_catalog(db, &user)?;
    }

    println!("✅ Seeded demo data for {}", user.email);
    println!();
    println!("Try:");
    println!("  smartfin report summary --user {}", user.email);
    println!("  smartfin dashboard --user {}", user.email);

    Ok(())
}

fn seed_ledger(db: &Database, user: &User) -> Result<()> {
    let now = Utc::now();

    // Four months of income with a gentle upward slope
    let income = [
        ("Storefront sales", 4200.0, 90),
        ("Storefront sales", 4650.0, 60),
        ("Wholesale order, Hilltop Cafe", 1200.0, 45),
        ("Storefront sales", 5100.0, 30),
        ("Market stall weekend", 840.0, 12),
        ("Storefront sales", 5400.0, 2),
    ];
    for (description, amount, days_ago) in income {
        db.insert_transaction(
            user.id,
            &NewTransaction {
                description: Some(description.to_string()),
                amount,
                kind: Some(TransactionKind::Income),
                category: Some("Sales".to_string()),
                date: now - Duration::days(days_ago),
            },
        )?;
    }

    let expenses = [
        ("Monthly rent", 1500.0, "Rent", 85),
        ("Flour and sugar restock", 620.0, "Ingredients", 70),
        ("Monthly rent", 1500.0, "Rent", 55),
        ("Electricity bill", 310.0, "Utilities", 40),
        ("Flour and sugar restock", 580.0, "Ingredients", 35),
        ("Monthly rent", 1500.0, "Rent", 25),
        ("Oven repair", 450.0, "Maintenance", 18),
        ("Electricity bill", 295.0, "Utilities", 8),
    ];
    for (description, amount, category, days_ago) in expenses {
        db.insert_expense(
            user.id,
            &NewExpense {
                description: Some(description.to_string()),
                amount,
                category: Some(category.to_string()),
                date: now - Duration::days(days_ago),
            },
        )?;
    }

    println!("   Seeded {} transactions and {} expenses", income.len(), expenses.len());
    Ok(())
}

fn seed_catalog(db: &Database, user: &User) -> Result<()> {
    let products = [
        ("Sourdough loaf", 6.5, "BRD-001", 40),
        ("Croissant", 3.2, "PST-001", 60),
        ("Espresso", 2.8, "DRK-001", 200),
    ];
    for (name, price, sku, stock) in products {
        db.insert_product(
            user.id,
            &NewProduct {
                name: name.to_string(),
                description: None,
                price,
                sku: Some(sku.to_string()),
                stock,
            },
        )?;
    }

    db.insert_contact(
        user.id,
        &NewContact {
            name: "Hilltop Cafe".to_string(),
            email: Some("orders@hilltop.example".to_string()),
            phone: None,
            company: Some("Hilltop Cafe Ltd".to_string()),
            kind: ContactKind::Customer,
            notes: Some("Weekly wholesale order".to_string()),
        },
    )?;

    println!("   Seeded {} products and 1 contact", products.len());
    Ok(())
}
