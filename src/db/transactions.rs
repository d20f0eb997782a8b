use chrono::NaiveDate;
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{from_cents, to_cents, Database};
use crate::error::Result;
use crate::models::{Transaction, TransactionFilter};

const TRANSACTION_COLUMNS: &str =
    "t.id, t.user_id, t.category_id, t.kind, t.amount_cents, t.description, t.date, t.created_at";

fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        kind: row.get(3)?,
        amount: from_cents(row.get(4)?),
        description: row.get(5)?,
        date: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Shared by plain inserts and the materializer's per-definition transaction.
pub(super) fn insert_transaction_on(conn: &Connection, txn: &Transaction) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO transactions (user_id, category_id, kind, amount_cents, description, date, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            txn.user_id,
            txn.category_id,
            txn.kind,
            to_cents(txn.amount),
            txn.description,
            txn.date,
            txn.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// An existing row with the same owner, description, amount, kind, category
/// and date.
pub(super) fn find_duplicate_on(conn: &Connection, txn: &Transaction) -> rusqlite::Result<Option<i64>> {
    conn.query_row(
        "SELECT id FROM transactions
         WHERE user_id = ?1 AND description = ?2 AND amount_cents = ?3
           AND kind = ?4 AND category_id = ?5 AND date = ?6
         LIMIT 1",
        params![
            txn.user_id,
            txn.description,
            to_cents(txn.amount),
            txn.kind,
            txn.category_id,
            txn.date,
        ],
        |row| row.get(0),
    )
    .optional()
}

impl Database {
    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn insert_transaction(&self, txn: &Transaction) -> Result<i64> {
        Ok(insert_transaction_on(&self.conn, txn)?)
    }

    pub(crate) fn get_transaction(&self, user_id: i64, id: i64) -> Result<Option<Transaction>> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT {TRANSACTION_COLUMNS} FROM transactions t
                     WHERE t.id = ?1 AND t.user_id = ?2"
                ),
                params![id, user_id],
                row_to_transaction,
            )
            .optional()?)
    }

    /// Newest first (date, then id). `from` is an inclusive keyset position
    /// `(date, id)` to resume a previous page.
    pub(crate) fn get_transactions(
        &self,
        user_id: i64,
        filter: &TransactionFilter,
        limit: Option<u32>,
        from: Option<(NaiveDate, i64)>,
    ) -> Result<Vec<Transaction>> {
        let mut sql = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions t WHERE t.user_id = ?1");
        let mut param_values: Vec<Box<dyn ToSql>> = vec![Box::new(user_id)];

        if let Some(kind) = filter.kind {
            sql.push_str(&format!(" AND t.kind = ?{}", param_values.len() + 1));
            param_values.push(Box::new(kind));
        }
        if let Some(cid) = filter.category_id {
            sql.push_str(&format!(" AND t.category_id = ?{}", param_values.len() + 1));
            param_values.push(Box::new(cid));
        }
        if let Some(start) = filter.start {
            sql.push_str(&format!(" AND t.date >= ?{}", param_values.len() + 1));
            param_values.push(Box::new(start));
        }
        if let Some(end) = filter.end {
            sql.push_str(&format!(" AND t.date <= ?{}", param_values.len() + 1));
            param_values.push(Box::new(end));
        }
        if let Some(s) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            sql.push_str(&format!(" AND t.description LIKE ?{} ESCAPE '\\'", param_values.len() + 1));
            param_values.push(Box::new(format!("%{}%", escape_like(s))));
        }
        if let Some((date, id)) = from {
            sql.push_str(&format!(
                " AND (t.date < ?{0} OR (t.date = ?{0} AND t.id <= ?{1}))",
                param_values.len() + 1,
                param_values.len() + 2
            ));
            param_values.push(Box::new(date));
            param_values.push(Box::new(id));
        }

        sql.push_str(" ORDER BY t.date DESC, t.id DESC");

        if let Some(l) = limit {
            sql.push_str(&format!(" LIMIT {l}"));
        }

        let params_ref: Vec<&dyn ToSql> = param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), row_to_transaction)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn update_transaction(&self, txn: &Transaction) -> Result<()> {
        self.conn.execute(
            "UPDATE transactions
             SET category_id = ?1, kind = ?2, amount_cents = ?3, description = ?4, date = ?5
             WHERE id = ?6 AND user_id = ?7",
            params![
                txn.category_id,
                txn.kind,
                to_cents(txn.amount),
                txn.description,
                txn.date,
                txn.id,
                txn.user_id,
            ],
        )?;
        Ok(())
    }

    pub(crate) fn delete_transaction(&self, user_id: i64, id: i64) -> Result<usize> {
        Ok(self.conn.execute(
            "DELETE FROM transactions WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?)
    }

    /// Number of surplus rows across groups of identical transactions.
    pub(crate) fn count_duplicate_transactions(&self, user_id: i64) -> Result<i64> {
        Ok(self.conn.query_row(
            "SELECT COALESCE(SUM(n - 1), 0) FROM (
                 SELECT COUNT(*) AS n FROM transactions
                 WHERE user_id = ?1
                 GROUP BY description, amount_cents, kind, category_id, date
                 HAVING COUNT(*) > 1
             )",
            params![user_id],
            |row| row.get(0),
        )?)
    }

    /// Delete every duplicate but the oldest row of each group.
    pub(crate) fn delete_duplicate_transactions(&mut self, user_id: i64) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute(
            "DELETE FROM transactions
             WHERE user_id = ?1 AND id NOT IN (
                 SELECT MIN(id) FROM transactions
                 WHERE user_id = ?1
                 GROUP BY description, amount_cents, kind, category_id, date
             )",
            params![user_id],
        )?;
        tx.commit()?;
        Ok(deleted)
    }
}

/// Match `%`, `_` and `\` literally in a `LIKE ... ESCAPE '\'` pattern.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
