mod analytics;
mod categories;
mod recurring;
mod schema;
mod transactions;
mod users;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;

use crate::error::Result;
use crate::models::{Category, EntryKind, Frequency};

/// Persistence gateway. Every per-user query takes the owner's id and
/// filters on it; default categories are the only rows shared across users.
pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        db.seed_default_categories()?;
        tracing::debug!(path = %path.display(), "database ready");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        db.seed_default_categories()?;
        Ok(db)
    }

    /// Raw connection, for tests that need to corrupt data on purpose.
    #[cfg(test)]
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            tracing::info!(version = schema::CURRENT_VERSION, "created database schema");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                tracing::info!(from_version, "applying migration");
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    fn seed_default_categories(&mut self) -> Result<()> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE is_default = 1",
            [],
            |row| row.get(0),
        )?;
        if count > 0 {
            return Ok(());
        }

        let tx = self.conn.transaction()?;
        for &(name, kind, color) in schema::DEFAULT_CATEGORIES {
            let cat = Category::new_default(name, kind, color);
            tx.execute(
                "INSERT OR IGNORE INTO categories (name, kind, color, is_default, user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![cat.name, cat.kind, cat.color, cat.is_default, cat.user_id],
            )?;
        }
        tx.commit()?;
        tracing::debug!(
            count = schema::DEFAULT_CATEGORIES.len(),
            "seeded default categories"
        );
        Ok(())
    }
}

// ── Column codecs ─────────────────────────────────────────────

impl ToSql for EntryKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for EntryKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        EntryKind::parse(s).ok_or_else(|| FromSqlError::Other(format!("unknown kind: {s}").into()))
    }
}

impl ToSql for Frequency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Frequency {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Frequency::parse(s)
            .ok_or_else(|| FromSqlError::Other(format!("unknown frequency: {s}").into()))
    }
}

/// Amounts are stored as whole cents so SQL sums stay exact.
pub(crate) fn to_cents(amount: Decimal) -> i64 {
    let mut scaled = amount;
    scaled.rescale(2);
    scaled.mantissa() as i64
}

pub(crate) fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
