//! Product catalog operations

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewProduct, Product};

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    let created_at: String = row.get(7)?;
    Ok(Product {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        price: row.get(4)?,
        sku: row.get(5)?,
        stock: row.get(6)?,
        created_at: parse_datetime(&created_at),
    })
}

const PRODUCT_COLUMNS: &str = "id, user_id, name, description, price, sku, stock, created_at";

impl Database {
    /// Insert a product. A duplicate SKU for the same user is rejected.
    pub fn insert_product(&self, user_id: i64, product: &NewProduct) -> Result<Product> {
        if product.name.trim().is_empty() {
            return Err(Error::InvalidData("Product name is required".to_string()));
        }
        if product.price < 0.0 {
            return Err(Error::InvalidData(
                "Product price cannot be negative".to_string(),
            ));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO products (user_id, name, description, price, sku, stock) \
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                user_id,
                product.name.trim(),
                product.description,
                product.price,
                product.sku,
                product.stock,
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Error::InvalidData(format!(
                    "SKU already in use: {}",
                    product.sku.as_deref().unwrap_or("")
                ))
            }
            other => Error::Database(other),
        })?;
        let id = conn.last_insert_rowid();
        drop(conn);
        self.get_product(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("product {} after insert", id)))
    }

    /// Fetch one product, ownership enforced.
    pub fn get_product(&self, user_id: i64, id: i64) -> Result<Option<Product>> {
        let conn = self.conn()?;
        let product = conn
            .query_row(
                &format!(
                    "SELECT {} FROM products WHERE id = ? AND user_id = ?",
                    PRODUCT_COLUMNS
                ),
                params![id, user_id],
                product_from_row,
            )
            .optional()?;
        Ok(product)
    }

    /// List a user's products by name.
    pub fn list_products(&self, user_id: i64) -> Result<Vec<Product>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM products WHERE user_id = ? ORDER BY name, id",
            PRODUCT_COLUMNS
        ))?;
        let products = stmt
            .query_map(params![user_id], product_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(products)
    }

    /// Count a user's products.
    pub fn count_products(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM products WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Update a product. Returns false when nothing matched.
    pub fn update_product(&self, user_id: i64, id: i64, product: &NewProduct) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE products SET name = ?, description = ?, price = ?, sku = ?, stock = ? \
             WHERE id = ? AND user_id = ?",
            params![
                product.name.trim(),
                product.description,
                product.price,
                product.sku,
                product.stock,
                id,
                user_id,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Delete a product. Returns false when nothing was deleted.
    pub fn delete_product(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM products WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(changed > 0)
    }

    /// Adjust stock by a signed delta (restock or correction).
    ///
    /// Fails rather than letting stock go negative.
    pub fn adjust_stock(&self, user_id: i64, id: i64, delta: i64) -> Result<i64> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE products SET stock = stock + ? \
             WHERE id = ? AND user_id = ? AND stock + ? >= 0",
            params![delta, id, user_id, delta],
        )?;
        if changed == 0 {
            return Err(Error::InvalidData(format!(
                "Cannot adjust stock of product {} by {}",
                id, delta
            )));
        }
        let stock = conn.query_row(
            "SELECT stock FROM products WHERE id = ? AND user_id = ?",
            params![id, user_id],
            |row| row.get(0),
        )?;
        Ok(stock)
    }
}
