use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::transactions::{find_duplicate_on, insert_transaction_on};
use super::{from_cents, to_cents, Database};
use crate::error::Result;
use crate::models::{RecurringTransaction, Transaction};

const RECURRING_COLUMNS: &str = "r.id, r.user_id, r.category_id, r.kind, r.amount_cents, r.description,
     r.frequency, r.start_date, r.end_date, r.next_occurrence, r.is_active, r.created_at";

fn row_to_recurring(row: &Row<'_>) -> rusqlite::Result<RecurringTransaction> {
    Ok(RecurringTransaction {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        kind: row.get(3)?,
        amount: from_cents(row.get(4)?),
        description: row.get(5)?,
        frequency: row.get(6)?,
        start_date: row.get(7)?,
        end_date: row.get(8)?,
        next_occurrence: row.get(9)?,
        is_active: row.get(10)?,
        created_at: row.get(11)?,
    })
}

impl Database {
    // ── Recurring transactions ────────────────────────────────

    pub(crate) fn insert_recurring(&self, rec: &RecurringTransaction) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO recurring_transactions
                (user_id, category_id, kind, amount_cents, description, frequency,
                 start_date, end_date, next_occurrence, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                rec.user_id,
                rec.category_id,
                rec.kind,
                to_cents(rec.amount),
                rec.description,
                rec.frequency,
                rec.start_date,
                rec.end_date,
                rec.next_occurrence,
                rec.is_active,
                rec.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_recurring(&self, user_id: i64, id: i64) -> Result<Option<RecurringTransaction>> {
        Ok(self
            .conn
            .query_row(
                &format!(
                    "SELECT {RECURRING_COLUMNS} FROM recurring_transactions r
                     WHERE r.id = ?1 AND r.user_id = ?2"
                ),
                params![id, user_id],
                row_to_recurring,
            )
            .optional()?)
    }

    /// Soonest first.
    pub(crate) fn get_recurring_list(
        &self,
        user_id: i64,
        active: Option<bool>,
    ) -> Result<Vec<RecurringTransaction>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECURRING_COLUMNS} FROM recurring_transactions r
             WHERE r.user_id = ?1 AND (?2 IS NULL OR r.is_active = ?2)
             ORDER BY r.next_occurrence, r.id"
        ))?;
        let rows = stmt.query_map(params![user_id, active], row_to_recurring)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn update_recurring(&self, rec: &RecurringTransaction) -> Result<()> {
        self.conn.execute(
            "UPDATE recurring_transactions
             SET category_id = ?1, kind = ?2, amount_cents = ?3, description = ?4,
                 frequency = ?5, start_date = ?6, end_date = ?7, next_occurrence = ?8,
                 is_active = ?9
             WHERE id = ?10 AND user_id = ?11",
            params![
                rec.category_id,
                rec.kind,
                to_cents(rec.amount),
                rec.description,
                rec.frequency,
                rec.start_date,
                rec.end_date,
                rec.next_occurrence,
                rec.is_active,
                rec.id,
                rec.user_id,
            ],
        )?;
        Ok(())
    }

    pub(crate) fn delete_recurring(&self, user_id: i64, id: i64) -> Result<usize> {
        Ok(self.conn.execute(
            "DELETE FROM recurring_transactions WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?)
    }

    /// Active definitions firing on `as_of`, each paired with whether its
    /// category still exists. Rows that fail to decode come back as errors
    /// in place so the caller can skip them individually.
    pub(crate) fn get_due_recurring(
        &self,
        user_id: i64,
        as_of: NaiveDate,
    ) -> Result<Vec<rusqlite::Result<(RecurringTransaction, bool)>>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECURRING_COLUMNS}, c.id IS NOT NULL
             FROM recurring_transactions r
             LEFT JOIN categories c ON c.id = r.category_id
             WHERE r.user_id = ?1
               AND r.is_active = 1
               AND r.next_occurrence = ?2
               AND (r.end_date IS NULL OR r.end_date >= ?2)
             ORDER BY r.id"
        ))?;
        let rows = stmt.query_map(params![user_id, as_of], |row| {
            Ok((row_to_recurring(row)?, row.get(12)?))
        })?;
        Ok(rows.collect())
    }

    /// Create the occurrence for `as_of` unless an identical transaction is
    /// already there, then move the schedule pointer to `next`. Both writes
    /// commit together. Returns the created transaction, if any.
    pub(crate) fn materialize_occurrence(
        &mut self,
        rec: &RecurringTransaction,
        as_of: NaiveDate,
        next: NaiveDate,
    ) -> Result<Option<Transaction>> {
        let tx = self.conn.transaction()?;

        let mut txn = rec.materialize(as_of);
        let created = match find_duplicate_on(&tx, &txn)? {
            Some(existing) => {
                tracing::debug!(
                    recurring_id = ?rec.id,
                    transaction_id = existing,
                    "occurrence already recorded"
                );
                None
            }
            None => {
                txn.id = Some(insert_transaction_on(&tx, &txn)?);
                Some(txn)
            }
        };

        tx.execute(
            "UPDATE recurring_transactions SET next_occurrence = ?1
             WHERE id = ?2 AND user_id = ?3 AND next_occurrence <= ?1",
            params![next, rec.id, rec.user_id],
        )?;
        tx.commit()?;
        Ok(created)
    }
}
