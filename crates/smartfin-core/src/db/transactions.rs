//! Transaction operations
//!
//! Every query is scoped by `user_id`; a transaction belonging to another
//! user behaves exactly like one that does not exist.

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::ledger::TransactionKind;
use crate::models::{NewTransaction, Transaction};

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let kind: Option<String> = row.get(4)?;
    let date: String = row.get(6)?;
    let created_at: String = row.get(7)?;
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        description: row.get(2)?,
        amount: row.get(3)?,
        kind: kind.and_then(|k| k.parse::<TransactionKind>().ok()),
        category: row.get(5)?,
        date: parse_datetime(&date),
        created_at: parse_datetime(&created_at),
    })
}

const TX_COLUMNS: &str = "id, user_id, description, amount, kind, category, date, created_at";

impl Database {
    /// Insert a transaction and return it with its assigned id.
    pub fn insert_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<Transaction> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO transactions (user_id, description, amount, kind, category, date) \
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                user_id,
                tx.description,
                tx.amount,
                tx.kind.map(|k| k.as_str()),
                tx.category,
                tx.date.to_rfc3339(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);
        self.get_transaction(user_id, id)?.ok_or_else(|| {
            crate::error::Error::NotFound(format!("transaction {} after insert", id))
        })
    }

    /// Fetch one transaction, ownership enforced.
    pub fn get_transaction(&self, user_id: i64, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let tx = conn
            .query_row(
                &format!(
                    "SELECT {} FROM transactions WHERE id = ? AND user_id = ?",
                    TX_COLUMNS
                ),
                params![id, user_id],
                transaction_from_row,
            )
            .optional()?;
        Ok(tx)
    }

    /// List transactions newest first, with optional kind/category filters.
    pub fn list_transactions(
        &self,
        user_id: i64,
        kind: Option<TransactionKind>,
        category: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;

        let mut sql = format!("SELECT {} FROM transactions WHERE user_id = ?", TX_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

        if let Some(k) = kind {
            sql.push_str(" AND kind = ?");
            params.push(Box::new(k.as_str().to_string()));
        }
        if let Some(c) = category {
            sql.push_str(" AND category = ?");
            params.push(Box::new(c.to_string()));
        }
        sql.push_str(" ORDER BY date DESC, id DESC LIMIT ? OFFSET ?");
        params.push(Box::new(limit));
        params.push(Box::new(offset));

        let mut stmt = conn.prepare(&sql)?;
        let txs = stmt
            .query_map(
                rusqlite::params_from_iter(params.iter()),
                transaction_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(txs)
    }

    /// Every transaction a user has, for reports and the ledger view.
    pub fn list_all_transactions(&self, user_id: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE user_id = ? ORDER BY date DESC, id DESC",
            TX_COLUMNS
        ))?;
        let txs = stmt
            .query_map(params![user_id], transaction_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(txs)
    }

    /// Count a user's transactions.
    pub fn count_transactions(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Update a transaction. Returns false when it does not exist (or is
    /// owned by someone else).
    pub fn update_transaction(&self, user_id: i64, id: i64, tx: &NewTransaction) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE transactions SET description = ?, amount = ?, kind = ?, category = ?, date = ? \
             WHERE id = ? AND user_id = ?",
            params![
                tx.description,
                tx.amount,
                tx.kind.map(|k| k.as_str()),
                tx.category,
                tx.date.to_rfc3339(),
                id,
                user_id,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Delete a transaction. Returns false when nothing was deleted.
    pub fn delete_transaction(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM transactions WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(changed > 0)
    }
}
