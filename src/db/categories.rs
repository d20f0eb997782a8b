use rusqlite::{params, OptionalExtension, Row};

use super::Database;
use crate::error::Result;
use crate::models::{Category, EntryKind};

pub(super) const CATEGORY_COLUMNS: &str = "c.id, c.name, c.kind, c.color, c.is_default, c.user_id";

pub(super) fn row_to_category(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        kind: row.get(2)?,
        color: row.get(3)?,
        is_default: row.get(4)?,
        user_id: row.get(5)?,
    })
}

impl Database {
    // ── Categories ────────────────────────────────────────────

    /// Default categories first, then the user's own, each sorted by name.
    pub(crate) fn get_categories(
        &self,
        user_id: i64,
        kind: Option<EntryKind>,
    ) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories c
             WHERE (c.is_default = 1 OR c.user_id = ?1)
               AND (?2 IS NULL OR c.kind = ?2)
             ORDER BY c.is_default DESC, c.name"
        ))?;
        let rows = stmt.query_map(params![user_id, kind], row_to_category)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// A category the user may reference: their own or a default.
    pub(crate) fn get_visible_category(&self, user_id: i64, id: i64) -> Result<Option<Category>> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT {CATEGORY_COLUMNS} FROM categories c
                     WHERE c.id = ?1 AND (c.is_default = 1 OR c.user_id = ?2)"
                ),
                params![id, user_id],
                row_to_category,
            )
            .optional()?)
    }

    /// A category the user may edit: their own, never a default.
    pub(crate) fn get_owned_category(&self, user_id: i64, id: i64) -> Result<Option<Category>> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT {CATEGORY_COLUMNS} FROM categories c
                     WHERE c.id = ?1 AND c.user_id = ?2 AND c.is_default = 0"
                ),
                params![id, user_id],
                row_to_category,
            )
            .optional()?)
    }

    /// Look for a name clash inside the user's own categories of one kind.
    pub(crate) fn find_owned_category_by_name(
        &self,
        user_id: i64,
        name: &str,
        kind: EntryKind,
        exclude_id: Option<i64>,
    ) -> Result<Option<Category>> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT {CATEGORY_COLUMNS} FROM categories c
                     WHERE c.user_id = ?1 AND c.name = ?2 AND c.kind = ?3
                       AND (?4 IS NULL OR c.id != ?4)
                     LIMIT 1"
                ),
                params![user_id, name, kind, exclude_id],
                row_to_category,
            )
            .optional()?)
    }

    pub(crate) fn insert_category(&self, cat: &Category) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO categories (name, kind, color, is_default, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![cat.name, cat.kind, cat.color, cat.is_default, cat.user_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Only name and color are mutable.
    pub(crate) fn update_category(&self, cat: &Category) -> Result<()> {
        self.conn.execute(
            "UPDATE categories SET name = ?1, color = ?2
             WHERE id = ?3 AND user_id = ?4 AND is_default = 0",
            params![cat.name, cat.color, cat.id, cat.user_id],
        )?;
        Ok(())
    }

    /// Transactions plus recurring definitions pointing at the category.
    pub(crate) fn count_category_references(&self, id: i64) -> Result<i64> {
        Ok(self.conn.query_row(
            "SELECT (SELECT COUNT(*) FROM transactions WHERE category_id = ?1)
                  + (SELECT COUNT(*) FROM recurring_transactions WHERE category_id = ?1)",
            params![id],
            |row| row.get(0),
        )?)
    }

    pub(crate) fn delete_category(&self, user_id: i64, id: i64) -> Result<usize> {
        Ok(self.conn.execute(
            "DELETE FROM categories WHERE id = ?1 AND user_id = ?2 AND is_default = 0",
            params![id, user_id],
        )?)
    }
}
