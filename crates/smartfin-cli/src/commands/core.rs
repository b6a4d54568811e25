//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - `cmd_status` - Show database overview

use std::path::Path;

use anyhow::{Context, Result};
use smartfin_core::db::Database;

/// Open the database, running migrations on first use.
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Create a user: smartfin user add you@example.com --password ...");
    println!("  2. Record a transaction: smartfin tx add 1200.50 --type income");
    println!("  3. Start the web UI: smartfin serve");

    Ok(())
}

pub fn cmd_status(db_path: &Path) -> Result<()> {
    use std::fs;

    println!();
    println!("📊 SmartFin Status");
    println!("   ─────────────────────────────────────────────────────────────");

    println!("   Database: {}", db_path.display());

    if db_path.exists() {
        if let Ok(metadata) = fs::metadata(db_path) {
            let size_kb = metadata.len() as f64 / 1024.0;
            if size_kb < 1024.0 {
                println!("   Size: {:.1} KB", size_kb);
            } else {
                println!("   Size: {:.1} MB", size_kb / 1024.0);
            }
        }
    } else {
        println!("   Size: (database not initialized)");
    }

    if db_path.exists() {
        match open_db(db_path) {
            Ok(db) => {
                println!();
                println!("   Users: {}", db.count_users()?);
                for user in db.list_users()? {
                    let business = user
                        .business_name
                        .as_deref()
                        .map(|b| format!(" ({})", b))
                        .unwrap_or_default();
                    println!(
                        "     {}{}: {} transactions, {} expenses, {} products",
                        user.email,
                        business,
                        db.count_transactions(user.id)?,
                        db.count_expenses(user.id)?,
                        db.count_products(user.id)?
                    );
                }
            }
            Err(e) => {
                println!();
                println!("   ❌ Error opening database: {}", e);
            }
        }
    }

    println!();
    Ok(())
}
