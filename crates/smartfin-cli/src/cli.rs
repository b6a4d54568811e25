//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SmartFin - Small business finance tracker
#[derive(Parser)]
#[command(name = "smartfin")]
#[command(about = "Self-hosted small business finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "smartfin.db", env = "SMARTFIN_DB", global = true)]
    pub db: PathBuf,

    /// Act as this user (email). Optional when exactly one user exists.
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Show database status (path, size, record counts)
    Status,

    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Record and list transactions
    Tx {
        #[command(subcommand)]
        action: TxAction,
    },

    /// Record and list expenses
    Expense {
        #[command(subcommand)]
        action: ExpenseAction,
    },

    /// Generate financial reports
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },

    /// Show dashboard summary with top categories and notifications
    Dashboard,

    /// Print current notifications
    Notifications,

    /// Export transactions to CSV
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate a few months of demo data
    Seed,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Ask the AI assistant a one-shot question
    Chat {
        /// The question to ask
        message: String,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a user account
    Add {
        /// Email address (used for login)
        email: String,

        /// Password (minimum 8 characters)
        #[arg(long)]
        password: String,

        /// Business name shown in reports and the assistant
        #[arg(long)]
        business_name: Option<String>,
    },

    /// List user accounts
    List,
}

#[derive(Subcommand)]
pub enum TxAction {
    /// Record a transaction
    Add {
        /// Amount (tolerant: "1200.50" or 1200.5)
        amount: String,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Transaction type: income or expense
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<String>,

        /// Category label
        #[arg(short, long)]
        category: Option<String>,

        /// Date (RFC 3339 or YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// List recent transactions
    List {
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },
}

#[derive(Subcommand)]
pub enum ExpenseAction {
    /// Record an expense
    Add {
        /// Amount (tolerant: "89.99" or 89.99)
        amount: String,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Category label
        #[arg(short, long)]
        category: Option<String>,

        /// Date (RFC 3339 or YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// List recent expenses
    List {
        /// Number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Income, expenses and balance totals
    Summary,

    /// Monthly income/expense trend
    Trends {
        /// Number of months to show
        #[arg(long, default_value = "6")]
        months: usize,
    },

    /// Totals grouped by category
    Categories,

    /// Flat-average cashflow forecast
    Forecast {
        /// Number of future months to project
        #[arg(long, default_value = "3")]
        months: usize,
    },
}
