//! SmartFin CLI - Small business finance tracker
//!
//! Usage:
//!   smartfin init                 Initialize database
//!   smartfin tx add 1200.50       Record a transaction
//!   smartfin report summary       Show income/expense totals
//!   smartfin serve --port 3000    Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Status => commands::cmd_status(&cli.db),
        Commands::User { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                UserAction::Add {
                    email,
                    password,
                    business_name,
                } => commands::cmd_user_add(&db, &email, &password, business_name.as_deref()),
                UserAction::List => commands::cmd_user_list(&db),
            }
        }
        Commands::Tx { action } => {
            let db = commands::open_db(&cli.db)?;
            let user = commands::resolve_user(&db, cli.user.as_deref())?;
            match action {
                TxAction::Add {
                    amount,
                    description,
                    kind,
                    category,
                    date,
                } => commands::cmd_tx_add(
                    &db,
                    &user,
                    &amount,
                    description.as_deref(),
                    kind.as_deref(),
                    category.as_deref(),
                    date.as_deref(),
                ),
                TxAction::List { limit } => commands::cmd_tx_list(&db, &user, limit),
            }
        }
        Commands::Expense { action } => {
            let db = commands::open_db(&cli.db)?;
            let user = commands::resolve_user(&db, cli.user.as_deref())?;
            match action {
                ExpenseAction::Add {
                    amount,
                    description,
                    category,
                    date,
                } => commands::cmd_expense_add(
                    &db,
                    &user,
                    &amount,
                    description.as_deref(),
                    category.as_deref(),
                    date.as_deref(),
                ),
                ExpenseAction::List { limit } => commands::cmd_expense_list(&db, &user, limit),
            }
        }
        Commands::Report { report_type } => {
            let db = commands::open_db(&cli.db)?;
            let user = commands::resolve_user(&db, cli.user.as_deref())?;
            match report_type {
                ReportType::Summary => commands::cmd_report_summary(&db, &user),
                ReportType::Trends { months } => commands::cmd_report_trends(&db, &user, months),
                ReportType::Categories => commands::cmd_report_categories(&db, &user),
                ReportType::Forecast { months } => {
                    commands::cmd_report_forecast(&db, &user, months)
                }
            }
        }
        Commands::Dashboard => {
            let db = commands::open_db(&cli.db)?;
            let user = commands::resolve_user(&db, cli.user.as_deref())?;
            commands::cmd_dashboard(&db, &user)
        }
        Commands::Notifications => {
            let db = commands::open_db(&cli.db)?;
            let user = commands::resolve_user(&db, cli.user.as_deref())?;
            commands::cmd_notifications(&db, &user)
        }
        Commands::Export { output } => {
            let db = commands::open_db(&cli.db)?;
            let user = commands::resolve_user(&db, cli.user.as_deref())?;
            commands::cmd_export(&db, &user, output.as_deref())
        }
        Commands::Seed => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_seed(&db, cli.user.as_deref())
        }
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(&cli.db, &host, port, static_dir.as_deref()).await,
        Commands::Chat { message } => {
            let db = commands::open_db(&cli.db)?;
            let user = commands::resolve_user(&db, cli.user.as_deref())?;
            commands::cmd_chat(&db, &user, &message).await
        }
    }
}
