use chrono::NaiveDate;
use rust_decimal::Decimal;
use rusqlite::params;

use super::categories::{row_to_category, CATEGORY_COLUMNS};
use super::{from_cents, Database};
use crate::error::Result;
use crate::models::{CategoryTotal, EntryKind};

impl Database {
    // ── Analytics ─────────────────────────────────────────────

    /// Sum and count of one kind over an inclusive date range.
    pub(crate) fn get_kind_totals(
        &self,
        user_id: i64,
        kind: EntryKind,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(Decimal, i64)> {
        let (cents, count): (i64, i64) = self.conn.query_row(
            "SELECT COALESCE(SUM(amount_cents), 0), COUNT(*) FROM transactions
             WHERE user_id = ?1 AND kind = ?2 AND date >= ?3 AND date <= ?4",
            params![user_id, kind, start, end],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok((from_cents(cents), count))
    }

    /// Totals per category, largest first. Inner join drops groups whose
    /// category row is gone.
    pub(crate) fn get_category_totals(
        &self,
        user_id: i64,
        kind: Option<EntryKind>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<CategoryTotal>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CATEGORY_COLUMNS}, SUM(t.amount_cents), COUNT(t.id)
             FROM transactions t
             JOIN categories c ON c.id = t.category_id
             WHERE t.user_id = ?1
               AND (?2 IS NULL OR t.kind = ?2)
               AND (?3 IS NULL OR t.date >= ?3)
               AND (?4 IS NULL OR t.date <= ?4)
             GROUP BY t.category_id
             ORDER BY SUM(t.amount_cents) DESC, c.name"
        ))?;
        let rows = stmt.query_map(params![user_id, kind, start, end], |row| {
            Ok(CategoryTotal {
                category: row_to_category(row)?,
                total_amount: from_cents(row.get(6)?),
                transaction_count: row.get(7)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Sum and count for one category, optionally bounded by date.
    pub(crate) fn get_category_stats(
        &self,
        user_id: i64,
        category_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<(Decimal, i64)> {
        let (cents, count): (i64, i64) = self.conn.query_row(
            "SELECT COALESCE(SUM(amount_cents), 0), COUNT(*) FROM transactions
             WHERE user_id = ?1 AND category_id = ?2
               AND (?3 IS NULL OR date >= ?3)
               AND (?4 IS NULL OR date <= ?4)",
            params![user_id, category_id, start, end],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok((from_cents(cents), count))
    }
}
