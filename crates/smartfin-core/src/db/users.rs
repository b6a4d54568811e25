//! User account and session operations
//!
//! Passwords are hashed with Argon2id at signup and verified at login;
//! plaintext never touches the database. Session tokens are opaque random
//! strings handed to the client once; only their SHA-256 digests are stored,
//! so a leaked database cannot be replayed against live sessions.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use regex::Regex;
use rusqlite::{params, OptionalExtension, Row};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

/// How long a session token stays valid.
const SESSION_TTL_DAYS: i64 = 30;

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Check that an email looks like an email. Deliberately loose: one `@`,
/// something on both sides, a dot in the domain.
pub fn validate_email(email: &str) -> bool {
    // Compiled per call; signup is nowhere near hot enough to cache this.
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").map_or(false, |re| re.is_match(email))
}

/// Hex SHA-256 digest of a session token, the form stored at rest.
fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let created_at: String = row.get(4)?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        business_name: row.get(3)?,
        created_at: parse_datetime(&created_at),
    })
}

const USER_COLUMNS: &str = "id, email, password_hash, business_name, created_at";

impl Database {
    /// Create a user account.
    ///
    /// The email is lowercased before storage so logins are case-insensitive.
    /// Fails with `InvalidData` on a malformed email or short password, and
    /// with `InvalidData` when the email is already registered.
    pub fn create_user(
        &self,
        email: &str,
        password: &str,
        business_name: Option<&str>,
    ) -> Result<User> {
        let email = email.trim().to_lowercase();
        if !validate_email(&email) {
            return Err(Error::InvalidData(format!("Invalid email: {}", email)));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(Error::InvalidData(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)?
            .to_string();

        let conn = self.conn()?;
        let created_at = Utc::now();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO users (email, password_hash, business_name, created_at) \
             VALUES (?, ?, ?, ?)",
            params![email, password_hash, business_name, created_at.to_rfc3339()],
        )?;
        if inserted == 0 {
            return Err(Error::InvalidData(format!(
                "Email already registered: {}",
                email
            )));
        }

        Ok(User {
            id: conn.last_insert_rowid(),
            email,
            password_hash,
            business_name: business_name.map(String::from),
            created_at,
        })
    }

    /// Look up a user by email (case-insensitive).
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
                params![email.trim().to_lowercase()],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user by ID.
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                params![id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// List all users, oldest first.
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))?;
        let users = stmt
            .query_map([], user_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Count registered users.
    pub fn count_users(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Verify credentials and return the user on success.
    ///
    /// Returns `Auth` on an unknown email or a wrong password; the two cases
    /// produce the same message so the endpoint cannot be used to probe for
    /// registered addresses.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let user = self
            .get_user_by_email(email)?
            .ok_or_else(|| Error::Auth("Invalid email or password".to_string()))?;

        let parsed = PasswordHash::new(&user.password_hash)?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| Error::Auth("Invalid email or password".to_string()))?;

        Ok(user)
    }

    /// Issue a session token for a user.
    ///
    /// Returns the plaintext token; it is shown to the client exactly once
    /// and only its digest is stored. Expired sessions are purged lazily
    /// while we hold the connection anyway.
    pub fn create_session(&self, user_id: i64) -> Result<String> {
        let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let now = Utc::now();
        let expires_at = now + Duration::days(SESSION_TTL_DAYS);

        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM sessions WHERE expires_at < ?",
            params![now.to_rfc3339()],
        )?;
        conn.execute(
            "INSERT INTO sessions (user_id, token_hash, created_at, expires_at) \
             VALUES (?, ?, ?, ?)",
            params![
                user_id,
                token_digest(&token),
                now.to_rfc3339(),
                expires_at.to_rfc3339()
            ],
        )?;

        Ok(token)
    }

    /// Resolve a session token to its user, if the session is still live.
    pub fn session_user(&self, token: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT u.id, u.email, u.password_hash, u.business_name, u.created_at \
                 FROM sessions s JOIN users u ON u.id = s.user_id \
                 WHERE s.token_hash = ? AND s.expires_at >= ?",
                params![token_digest(token), Utc::now().to_rfc3339()],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Revoke a session token. Revoking an unknown token is not an error.
    pub fn delete_session(&self, token: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM sessions WHERE token_hash = ?",
            params![token_digest(token)],
        )?;
        Ok(())
    }
}
