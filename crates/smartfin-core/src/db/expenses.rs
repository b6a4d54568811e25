//! Expense operations
//!
//! Expenses are a separate collection from transactions: the entity itself
//! marks the money as going out, so there is no kind column. Queries are
//! scoped by `user_id` like everywhere else.

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Expense, NewExpense};

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let date: String = row.get(5)?;
    let created_at: String = row.get(6)?;
    Ok(Expense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        description: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        date: parse_datetime(&date),
        created_at: parse_datetime(&created_at),
    })
}

const EXPENSE_COLUMNS: &str = "id, user_id, description, amount, category, date, created_at";

impl Database {
    /// Insert an expense and return it with its assigned id.
    pub fn insert_expense(&self, user_id: i64, expense: &NewExpense) -> Result<Expense> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO expenses (user_id, description, amount, category, date) \
             VALUES (?, ?, ?, ?, ?)",
            params![
                user_id,
                expense.description,
                expense.amount,
                expense.category,
                expense.date.to_rfc3339(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);
        self.get_expense(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("expense {} after insert", id)))
    }

    /// Fetch one expense, ownership enforced.
    pub fn get_expense(&self, user_id: i64, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let expense = conn
            .query_row(
                &format!(
                    "SELECT {} FROM expenses WHERE id = ? AND user_id = ?",
                    EXPENSE_COLUMNS
                ),
                params![id, user_id],
                expense_from_row,
            )
            .optional()?;
        Ok(expense)
    }

    /// List expenses newest first, with an optional category filter.
    pub fn list_expenses(
        &self,
        user_id: i64,
        category: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Expense>> {
        let conn = self.conn()?;

        let mut sql = format!("SELECT {} FROM expenses WHERE user_id = ?", EXPENSE_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

        if let Some(c) = category {
            sql.push_str(" AND category = ?");
            params.push(Box::new(c.to_string()));
        }
        sql.push_str(" ORDER BY date DESC, id DESC LIMIT ? OFFSET ?");
        params.push(Box::new(limit));
        params.push(Box::new(offset));

        let mut stmt = conn.prepare(&sql)?;
        let expenses = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), expense_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    /// Every expense a user has, for reports and the ledger view.
    pub fn list_all_expenses(&self, user_id: i64) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE user_id = ? ORDER BY date DESC, id DESC",
            EXPENSE_COLUMNS
        ))?;
        let expenses = stmt
            .query_map(params![user_id], expense_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    /// Count a user's expenses.
    pub fn count_expenses(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Update an expense. Returns false when nothing matched.
    pub fn update_expense(&self, user_id: i64, id: i64, expense: &NewExpense) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE expenses SET description = ?, amount = ?, category = ?, date = ? \
             WHERE id = ? AND user_id = ?",
            params![
                expense.description,
                expense.amount,
                expense.category,
                expense.date.to_rfc3339(),
                id,
                user_id,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Delete an expense. Returns false when nothing was deleted.
    pub fn delete_expense(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM expenses WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(changed > 0)
    }
}
