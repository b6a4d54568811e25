//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `users` - User accounts and session tokens
//! - `transactions` - Transaction CRUD
//! - `expenses` - Expense CRUD
//! - `products` - Product catalog
//! - `contacts` - Customers and suppliers
//! - `sales` - Point-of-sale checkouts

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::Result;
use crate::ledger::LedgerRecord;
use crate::models::{Expense, Transaction};

mod contacts;
mod expenses;
mod products;
mod sales;
mod transactions;
mod users;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a stored datetime string into a DateTime<Utc>
///
/// Handles both the RFC 3339 values we write ourselves and the
/// "YYYY-MM-DD HH:MM:SS" values SQLite writes via CURRENT_TIMESTAMP.
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc())
        })
        .unwrap_or_else(|_| Utc::now())
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Create a database connection pool against `path` and run migrations.
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a temporary file rather than `:memory:` because every pooled
    /// connection would otherwise open its own private in-memory database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = format!("/tmp/smartfin_test_{}_{}.db", std::process::id(), id);

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// The combined ledger view: every transaction and expense the user has,
    /// projected into the shared record shape the analytics layer consumes.
    pub fn ledger_records(&self, user_id: i64) -> Result<Vec<LedgerRecord>> {
        let mut records: Vec<LedgerRecord> = self
            .list_all_transactions(user_id)?
            .iter()
            .map(Transaction::to_ledger_record)
            .collect();
        records.extend(
            self.list_all_expenses(user_id)?
                .iter()
                .map(Expense::to_ledger_record),
        );
        Ok(records)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- Enable foreign keys
            PRAGMA foreign_keys = ON;

            -- WAL mode: better concurrency, readers don't block writers
            -- Note: creates -wal and -shm sidecar files alongside the database
            PRAGMA journal_mode = WAL;

            -- Synchronous NORMAL: good balance of safety and performance
            PRAGMA synchronous = NORMAL;

            -- Store temp tables in memory (faster for complex queries)
            PRAGMA temp_store = MEMORY;

            -- User accounts
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                business_name TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Session tokens; only SHA-256 digests are stored
            CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                token_hash TEXT NOT NULL UNIQUE,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                expires_at DATETIME NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);

            -- Transactions (income and expense movements)
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                description TEXT,
                amount REAL NOT NULL,
                kind TEXT,                                 -- income, expense, or NULL
                category TEXT,
                date TEXT NOT NULL,                        -- RFC 3339
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_transactions_user ON transactions(user_id);
            CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
            CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category);

            -- Expenses (separate collection, implicitly money out)
            CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                description TEXT,
                amount REAL NOT NULL,
                category TEXT,
                date TEXT NOT NULL,                        -- RFC 3339
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_expenses_user ON expenses(user_id);
            CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);

            -- Product catalog
            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                description TEXT,
                price REAL NOT NULL,
                sku TEXT,
                stock INTEGER NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                UNIQUE(user_id, sku)
            );

            CREATE INDEX IF NOT EXISTS idx_products_user ON products(user_id);

            -- Contacts (customers and suppliers)
            CREATE TABLE IF NOT EXISTS contacts (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                email TEXT,
                phone TEXT,
                company TEXT,
                kind TEXT NOT NULL DEFAULT 'customer',     -- customer or supplier
                notes TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_contacts_user ON contacts(user_id);

            -- Point-of-sale checkouts
            CREATE TABLE IF NOT EXISTS sales (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                reference TEXT NOT NULL UNIQUE,
                contact_id INTEGER REFERENCES contacts(id),
                total REAL NOT NULL,
                transaction_id INTEGER NOT NULL REFERENCES transactions(id),
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_sales_user ON sales(user_id);

            CREATE TABLE IF NOT EXISTS sale_items (
                id INTEGER PRIMARY KEY,
                sale_id INTEGER NOT NULL REFERENCES sales(id) ON DELETE CASCADE,
                product_id INTEGER NOT NULL REFERENCES products(id),
                quantity INTEGER NOT NULL,
                unit_price REAL NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sale_items_sale ON sale_items(sale_id);
            "#,
        )?;

        info!("Database migrations complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let db = Database::in_memory().unwrap();
        db.run_migrations().unwrap();
        db.run_migrations().unwrap();
    }

    #[test]
    fn test_parse_datetime_formats() {
        let rfc = parse_datetime("2026-08-23T10:30:00+00:00");
        assert_eq!(rfc.to_rfc3339(), "2026-08-23T10:30:00+00:00");

        let sqlite = parse_datetime("2026-08-23 10:30:00");
        assert_eq!(sqlite, rfc);
    }

    #[test]
    fn test_ledger_records_combines_both_collections() {
        use crate::ledger::TransactionKind;
        use crate::models::{NewExpense, NewTransaction};
        use chrono::Utc;

        let db = Database::in_memory().unwrap();
        let user = db.create_user("owner@example.com", "password123", None).unwrap();

        db.insert_transaction(
            user.id,
            &NewTransaction {
                description: Some("invoice".to_string()),
                amount: 500.0,
                kind: Some(TransactionKind::Income),
                category: Some("Sales".to_string()),
                date: Utc::now(),
            },
        )
        .unwrap();
        db.insert_expense(
            user.id,
            &NewExpense {
                description: Some("paper".to_string()),
                amount: 20.0,
                category: Some("Supplies".to_string()),
                date: Utc::now(),
            },
        )
        .unwrap();

        let records = db.ledger_records(user.id).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records
            .iter()
            .any(|r| r.kind == Some(TransactionKind::Expense)));
    }
}
