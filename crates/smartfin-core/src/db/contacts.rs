//! Contact (customer/supplier) operations

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Contact, ContactKind, NewContact};

fn contact_from_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    let kind: String = row.get(6)?;
    let created_at: String = row.get(8)?;
    Ok(Contact {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        company: row.get(5)?,
        kind: kind.parse().unwrap_or(ContactKind::Customer),
        notes: row.get(7)?,
        created_at: parse_datetime(&created_at),
    })
}

const CONTACT_COLUMNS: &str =
    "id, user_id, name, email, phone, company, kind, notes, created_at";

impl Database {
    /// Insert a contact and return it with its assigned id.
    pub fn insert_contact(&self, user_id: i64, contact: &NewContact) -> Result<Contact> {
        if contact.name.trim().is_empty() {
            return Err(Error::InvalidData("Contact name is required".to_string()));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO contacts (user_id, name, email, phone, company, kind, notes) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                user_id,
                contact.name.trim(),
                contact.email,
                contact.phone,
                contact.company,
                contact.kind.as_str(),
                contact.notes,
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);
        self.get_contact(user_id, id)?
            .ok_or_else(|| Error::NotFound(format!("contact {} after insert", id)))
    }

    /// Fetch one contact, ownership enforced.
    pub fn get_contact(&self, user_id: i64, id: i64) -> Result<Option<Contact>> {
        let conn = self.conn()?;
        let contact = conn
            .query_row(
                &format!(
                    "SELECT {} FROM contacts WHERE id = ? AND user_id = ?",
                    CONTACT_COLUMNS
                ),
                params![id, user_id],
                contact_from_row,
            )
            .optional()?;
        Ok(contact)
    }

    /// List a user's contacts by name, optionally filtered by kind.
    pub fn list_contacts(
        &self,
        user_id: i64,
        kind: Option<ContactKind>,
    ) -> Result<Vec<Contact>> {
        let conn = self.conn()?;

        let mut sql = format!("SELECT {} FROM contacts WHERE user_id = ?", CONTACT_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];
        if let Some(k) = kind {
            sql.push_str(" AND kind = ?");
            params.push(Box::new(k.as_str().to_string()));
        }
        sql.push_str(" ORDER BY name, id");

        let mut stmt = conn.prepare(&sql)?;
        let contacts = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), contact_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(contacts)
    }

    /// Count a user's contacts.
    pub fn count_contacts(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM contacts WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Update a contact. Returns false when nothing matched.
    pub fn update_contact(&self, user_id: i64, id: i64, contact: &NewContact) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE contacts SET name = ?, email = ?, phone = ?, company = ?, kind = ?, notes = ? \
             WHERE id = ? AND user_id = ?",
            params![
                contact.name.trim(),
                contact.email,
                contact.phone,
                contact.company,
                contact.kind.as_str(),
                contact.notes,
                id,
                user_id,
            ],
        )?;
        Ok(changed > 0)
    }

    /// Delete a contact. Returns false when nothing was deleted.
    pub fn delete_contact(&self, user_id: i64, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM contacts WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(changed > 0)
    }
}
