//! CSV export of a user's transactions.

use csv::WriterBuilder;

use crate::db::Database;
use crate::error::{Error, Result};

/// Header row of the export, in column order.
const HEADERS: [&str; 5] = ["date", "description", "amount", "type", "category"];

impl Database {
    /// Render every transaction the user owns as CSV, newest first.
    ///
    /// Amounts are written with exactly two decimals; missing descriptions,
    /// kinds and categories become empty fields. Always includes the header
    /// row, so an empty account exports a one-line file.
    pub fn export_transactions_csv(&self, user_id: i64) -> Result<String> {
        let transactions = self.list_all_transactions(user_id)?;

        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        writer.write_record(HEADERS)?;
        for tx in &transactions {
            writer.write_record([
                tx.date.format("%Y-%m-%d").to_string(),
                tx.description.clone().unwrap_or_default(),
                format!("{:.2}", tx.amount),
                tx.kind.map(|k| k.as_str().to_string()).unwrap_or_default(),
                tx.category.clone().unwrap_or_default(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::InvalidData(format!("CSV writer flush failed: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| Error::InvalidData(format!("CSV output is not UTF-8: {}", e)))
    }
}
