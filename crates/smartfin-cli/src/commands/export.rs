//! CSV export command

use std::path::Path;

use anyhow::{Context, Result};
use smartfin_core::db::Database;
use smartfin_core::models::User;

pub fn cmd_export(db: &Database, user: &User, output: Option<&Path>) -> Result<()> {
    let csv = db.export_transactions_csv(user.id)?;

    match output {
        Some(path) => {
            std::fs::write(path, &csv)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            // Minus one for the header row
            let rows = csv.lines().count().saturating_sub(1);
            println!("✅ Exported {} transactions to {}", rows, path.display());
        }
        None => print!("{}", csv),
    }

    Ok(())
}
