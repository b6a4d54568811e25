//! User account commands

use anyhow::{Context, Result};
use smartfin_core::db::Database;

pub fn cmd_user_add(
    db: &Database,
    email: &str,
    password: &str,
    business_name: Option<&str>,
) -> Result<()> {
    let user = db
        .create_user(email, password, business_name)
        .context("Failed to create user")?;

    println!("✅ Created user {} (id {})", user.email, user.id);
    if let Some(business) = &user.business_name {
        println!("   Business: {}", business);
    }

    Ok(())
}

pub fn cmd_user_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users found. Create one with:");
        println!("  smartfin user add you@example.com --password ...");
        return Ok(());
    }

    println!();
    println!("👥 Users");
    println!("   ─────────────────────────────────────────────");

    for user in users {
        let business = user
            .business_name
            .as_deref()
            .map(|b| format!(" ({})", b))
            .unwrap_or_default();
        println!(
            "   {:>4}  {}{}  (since {})",
            user.id,
            user.email,
            business,
            user.created_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}
