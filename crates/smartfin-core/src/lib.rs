//! SmartFin Core Library
//!
//! Shared functionality for the SmartFin small-business finance tool:
//! - Database access and migrations (users, transactions, expenses, catalog, sales)
//! - Ledger vocabulary and tolerant parsers for wire-shaped amounts and dates
//! - Pure analytics: summaries, monthly trends, category breakdowns, projections
//! - Rule-driven notification engine
//! - CSV export
//! - Pluggable chat backends (Ollama, mock) for the business assistant

pub mod ai;
pub mod analytics;
pub mod db;
pub mod error;
pub mod export;
pub mod ledger;
pub mod models;
pub mod notifications;

pub use ai::{business_context, ChatBackend, ChatClient, ChatMessage, MockChat, OllamaChat};
pub use analytics::{
    format_amount, group_by_category, monthly_trend, project_cashflow, summarize,
    CashflowProjection, CategoryBreakdown, CategoryGroup, FinancialSummary, MonthlyTrendPoint,
    ProjectedMonth, DEFAULT_PROJECTION_MONTHS, DEFAULT_TREND_MONTHS,
};
pub use db::Database;
pub use error::{Error, Result};
pub use ledger::{classify, parse_amount, parse_date, LedgerRecord, RawAmount, RawDate, TransactionKind};
pub use models::{
    Contact, ContactKind, Expense, NewContact, NewExpense, NewProduct, NewSale, NewTransaction,
    Product, Sale, SaleItem, SaleLine, Transaction, User, UserProfile,
};
pub use notifications::{
    Notification, NotificationEngine, NotificationId, NotificationKind, NotificationPriority,
    RuleContext,
};
