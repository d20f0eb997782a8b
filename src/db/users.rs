use rusqlite::{params, OptionalExtension, Row};

use super::Database;
use crate::error::Result;
use crate::models::User;

const USER_COLUMNS: &str = "id, email, name, credential_hash, created_at";

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: Some(row.get(0)?),
        email: row.get(1)?,
        name: row.get(2)?,
        credential_hash: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl Database {
    // ── Users ─────────────────────────────────────────────────

    pub(crate) fn insert_user(&self, user: &User) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO users (email, name, credential_hash, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![user.email, user.name, user.credential_hash, user.created_at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id],
                row_to_user,
            )
            .optional()?)
    }

    /// Email lookup is case-insensitive.
    pub(crate) fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![email.trim()],
                row_to_user,
            )
            .optional()?)
    }

    pub(crate) fn get_users(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt.query_map([], row_to_user)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn update_user(&self, user: &User) -> Result<()> {
        self.conn.execute(
            "UPDATE users SET email = ?1, name = ?2 WHERE id = ?3",
            params![user.email, user.name, user.id],
        )?;
        Ok(())
    }
}
