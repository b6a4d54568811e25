//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `chat` - One-shot AI assistant query
//! - `core` - Core commands (init, status) and shared utilities (open_db)
//! - `export` - CSV export command
//! - `reports` - Report, dashboard and notification commands
//! - `seed` - Demo data generation
//! - `serve` - Web server command
//! - `transactions` - Transaction and expense commands (add, list)
//! - `users` - User account commands (add, list)

pub mod chat;
pub mod core;
pub mod export;
pub mod reports;
pub mod seed;
pub mod serve;
pub mod transactions;
pub mod users;

// Re-export command functions for main.rs
pub use chat::*;
pub use core::*;
pub use export::*;
pub use reports::*;
pub use seed::*;
pub use serve::*;
pub use transactions::*;
pub use users::*;

use anyhow::Result;
use smartfin_core::db::Database;
use smartfin_core::models::User;

/// Resolve which user a command acts as.
///
/// `--user EMAIL` wins. Without the flag, a single-user database resolves
/// to that user; anything else is an error that tells the caller what to do.
pub fn resolve_user(db: &Database, email: Option<&str>) -> Result<User> {
    if let Some(email) = email {
        return db
            .get_user_by_email(email)?
            .ok_or_else(|| anyhow::anyhow!("No user with email: {}", email));
    }

    let mut users = db.list_users()?.into_iter();
    match (users.next(), users.next()) {
        (Some(user), None) => Ok(user),
        (None, _) => anyhow::bail!(
            "No users yet. Create one with: smartfin user add you@example.com --password ..."
        ),
        (Some(_), Some(_)) => anyhow::bail!("Multiple users exist; pick one with --user EMAIL"),
    }
}

/// Truncate a string to a maximum length, adding "..." if truncated.
/// Cuts on a char boundary so multibyte text never splits mid-character.
pub fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(3);
    let cut = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= keep)
        .last()
        .unwrap_or(0);
    format!("{}...", &s[..cut])
}
