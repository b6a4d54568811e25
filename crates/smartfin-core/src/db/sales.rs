//! Point-of-sale operations
//!
//! A checkout is one SQL transaction: stock checks, stock decrements, the
//! sale row, its line items, and the matching income transaction either all
//! land or none do. Insufficient stock on any line rolls the whole sale back.

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewSale, Sale, SaleItem};

/// Category written onto the income transaction a checkout produces.
pub const SALES_CATEGORY: &str = "Sales";

fn sale_from_row(row: &Row<'_>) -> rusqlite::Result<Sale> {
    let created_at: String = row.get(6)?;
    Ok(Sale {
        id: row.get(0)?,
        user_id: row.get(1)?,
        reference: row.get(2)?,
        contact_id: row.get(3)?,
        total: row.get(4)?,
        transaction_id: row.get(5)?,
        created_at: parse_datetime(&created_at),
    })
}

const SALE_COLUMNS: &str = "id, user_id, reference, contact_id, total, transaction_id, created_at";

impl Database {
    /// Ring up a sale.
    ///
    /// Validates every line against the catalog, decrements stock, writes
    /// the sale with its items and records the revenue as an income
    /// transaction in the `Sales` category, atomically.
    pub fn record_sale(&self, user_id: i64, sale: &NewSale) -> Result<(Sale, Vec<SaleItem>)> {
        if sale.items.is_empty() {
            return Err(Error::InvalidData("A sale needs at least one item".to_string()));
        }
        if sale.items.iter().any(|line| line.quantity <= 0) {
            return Err(Error::InvalidData(
                "Line quantities must be positive".to_string(),
            ));
        }
        if let Some(contact_id) = sale.contact_id {
            if self.get_contact(user_id, contact_id)?.is_none() {
                return Err(Error::NotFound(format!("contact {}", contact_id)));
            }
        }

        let conn = self.conn()?;
        conn.execute("BEGIN IMMEDIATE TRANSACTION", [])?;

        let result = (|| {
            let mut total = 0.0;
            let mut priced_lines: Vec<(i64, String, i64, f64)> = Vec::new();

            for line in &sale.items {
                let (name, price, stock): (String, f64, i64) = conn
                    .query_row(
                        "SELECT name, price, stock FROM products WHERE id = ? AND user_id = ?",
                        params![line.product_id, user_id],
                        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                    )
                    .optional()?
                    .ok_or_else(|| Error::NotFound(format!("product {}", line.product_id)))?;

                if stock < line.quantity {
                    return Err(Error::InsufficientStock(name));
                }

                conn.execute(
                    "UPDATE products SET stock = stock - ? WHERE id = ?",
                    params![line.quantity, line.product_id],
                )?;

                total += price * line.quantity as f64;
                priced_lines.push((line.product_id, name, line.quantity, price));
            }

            let reference = Uuid::new_v4().to_string();
            let now = Utc::now();

            conn.execute(
                "INSERT INTO transactions (user_id, description, amount, kind, category, date) \
                 VALUES (?, ?, ?, 'income', ?, ?)",
                params![
                    user_id,
                    format!("Sale {}", reference),
                    total,
                    SALES_CATEGORY,
                    now.to_rfc3339(),
                ],
            )?;
            let transaction_id = conn.last_insert_rowid();

            conn.execute(
                "INSERT INTO sales (user_id, reference, contact_id, total, transaction_id, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    user_id,
                    reference,
                    sale.contact_id,
                    total,
                    transaction_id,
                    now.to_rfc3339(),
                ],
            )?;
            let sale_id = conn.last_insert_rowid();

            let mut items = Vec::with_capacity(priced_lines.len());
            for (product_id, name, quantity, unit_price) in priced_lines {
                conn.execute(
                    "INSERT INTO sale_items (sale_id, product_id, quantity, unit_price) \
                     VALUES (?, ?, ?, ?)",
                    params![sale_id, product_id, quantity, unit_price],
                )?;
                items.push(SaleItem {
                    id: conn.last_insert_rowid(),
                    sale_id,
                    product_id,
                    product_name: name,
                    quantity,
                    unit_price,
                });
            }

            Ok((
                Sale {
                    id: sale_id,
                    user_id,
                    reference,
                    contact_id: sale.contact_id,
                    total,
                    transaction_id,
                    created_at: now,
                },
                items,
            ))
        })();

        match result {
            Ok(recorded) => {
                conn.execute("COMMIT", [])?;
                Ok(recorded)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    /// List a user's sales, newest first.
    pub fn list_sales(&self, user_id: i64) -> Result<Vec<Sale>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM sales WHERE user_id = ? ORDER BY id DESC",
            SALE_COLUMNS
        ))?;
        let sales = stmt
            .query_map(params![user_id], sale_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(sales)
    }

    /// Fetch one sale and its line items, ownership enforced.
    pub fn get_sale(&self, user_id: i64, id: i64) -> Result<Option<(Sale, Vec<SaleItem>)>> {
        let conn = self.conn()?;
        let sale = conn
            .query_row(
                &format!("SELECT {} FROM sales WHERE id = ? AND user_id = ?", SALE_COLUMNS),
                params![id, user_id],
                sale_from_row,
            )
            .optional()?;

        let Some(sale) = sale else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT si.id, si.sale_id, si.product_id, p.name, si.quantity, si.unit_price \
             FROM sale_items si JOIN products p ON p.id = si.product_id \
             WHERE si.sale_id = ? ORDER BY si.id",
        )?;
        let items = stmt
            .query_map(params![id], |row| {
                Ok(SaleItem {
                    id: row.get(0)?,
                    sale_id: row.get(1)?,
                    product_id: row.get(2)?,
                    product_name: row.get(3)?,
                    quantity: row.get(4)?,
                    unit_price: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Some((sale, items)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewProduct, SaleLine};

    fn setup() -> (Database, i64, i64) {
        let db = Database::in_memory().unwrap();
        let user = db
            .create_user("owner@example.com", "password123", None)
            .unwrap();
        let product = db
            .insert_product(
                user.id,
                &NewProduct {
                    name: "Coffee".to_string(),
                    description: None,
                    price: 4.50,
                    sku: Some("COF-1".to_string()),
                    stock: 10,
                },
            )
            .unwrap();
        (db, user.id, product.id)
    }

    #[test]
    fn test_checkout_decrements_stock_and_records_income() {
        let (db, user_id, product_id) = setup();

        let (sale, items) = db
            .record_sale(
                user_id,
                &NewSale {
                    contact_id: None,
                    items: vec![SaleLine {
                        product_id,
                        quantity: 3,
                    }],
                },
            )
            .unwrap();

        assert_eq!(sale.total, 13.50);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_name, "Coffee");

        let product = db.get_product(user_id, product_id).unwrap().unwrap();
        assert_eq!(product.stock, 7);

        // The matching income transaction exists and carries the total
        let tx = db
            .get_transaction(user_id, sale.transaction_id)
            .unwrap()
            .unwrap();
        assert_eq!(tx.amount, 13.50);
        assert_eq!(tx.category.as_deref(), Some(SALES_CATEGORY));
    }

    #[test]
    fn test_insufficient_stock_rolls_back_everything() {
        let (db, user_id, product_id) = setup();

        let err = db
            .record_sale(
                user_id,
                &NewSale {
                    contact_id: None,
                    items: vec![
                        SaleLine {
                            product_id,
                            quantity: 2,
                        },
                        SaleLine {
                            product_id,
                            quantity: 100,
                        },
                    ],
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientStock(_)));

        // First line's decrement was rolled back too
        let product = db.get_product(user_id, product_id).unwrap().unwrap();
        assert_eq!(product.stock, 10);
        assert!(db.list_sales(user_id).unwrap().is_empty());
        assert_eq!(db.count_transactions(user_id).unwrap(), 0);
    }

    #[test]
    fn test_invalid_sales_rejected() {
        let (db, user_id, product_id) = setup();

        assert!(db
            .record_sale(
                user_id,
                &NewSale {
                    contact_id: None,
                    items: vec![]
                }
            )
            .is_err());
        assert!(db
            .record_sale(
                user_id,
                &NewSale {
                    contact_id: None,
                    items: vec![SaleLine {
                        product_id,
                        quantity: 0
                    }]
                }
            )
            .is_err());
        assert!(db
            .record_sale(
                user_id,
                &NewSale {
                    contact_id: Some(999),
                    items: vec![SaleLine {
                        product_id,
                        quantity: 1
                    }]
                }
            )
            .is_err());
    }

    #[test]
    fn test_get_sale_with_items() {
        let (db, user_id, product_id) = setup();
        let (sale, _) = db
            .record_sale(
                user_id,
                &NewSale {
                    contact_id: None,
                    items: vec![SaleLine {
                        product_id,
                        quantity: 1,
                    }],
                },
            )
            .unwrap();

        let (fetched, items) = db.get_sale(user_id, sale.id).unwrap().unwrap();
        assert_eq!(fetched.reference, sale.reference);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit_price, 4.50);

        let other = db
            .create_user("other@example.com", "password123", None)
            .unwrap();
        assert!(db.get_sale(other.id, sale.id).unwrap().is_none());
    }
}
