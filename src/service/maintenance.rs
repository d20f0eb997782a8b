use super::Session;
use crate::db::Database;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CleanupOutcome {
    /// Surplus rows found: for each group of identical transactions, all
    /// but the oldest.
    pub(crate) duplicates: i64,
    pub(crate) deleted: usize,
}

/// Remove the caller's duplicate transactions, keeping the oldest of each
/// group. Transactions are duplicates when description, amount, type,
/// category and date all match. With `dry_run` nothing is deleted.
pub(crate) fn cleanup_duplicates(
    db: &mut Database,
    session: &Session,
    dry_run: bool,
) -> Result<CleanupOutcome> {
    let duplicates = db.count_duplicate_transactions(session.user_id())?;
    if dry_run || duplicates == 0 {
        return Ok(CleanupOutcome {
            duplicates,
            deleted: 0,
        });
    }

    let deleted = db.delete_duplicate_transactions(session.user_id())?;
    tracing::info!(user_id = session.user_id(), deleted, "removed duplicate transactions");
    Ok(CleanupOutcome { duplicates, deleted })
}

#[cfg(test)]
#[path = "maintenance_tests.rs"]
mod tests;
