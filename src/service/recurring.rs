use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::categories::{check_kind, visible_category};
use super::{validate, Session};
use crate::calendar;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{EntryKind, Frequency, RecurringTransaction, Transaction};

#[derive(Debug, Clone)]
pub(crate) struct NewRecurring {
    pub(crate) amount: Decimal,
    pub(crate) description: String,
    pub(crate) kind: EntryKind,
    pub(crate) frequency: Frequency,
    pub(crate) start_date: NaiveDate,
    pub(crate) end_date: Option<NaiveDate>,
    pub(crate) category_id: i64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RecurringPatch {
    pub(crate) amount: Option<Decimal>,
    pub(crate) description: Option<String>,
    pub(crate) kind: Option<EntryKind>,
    pub(crate) frequency: Option<Frequency>,
    pub(crate) start_date: Option<NaiveDate>,
    pub(crate) end_date: Option<NaiveDate>,
    pub(crate) category_id: Option<i64>,
    pub(crate) is_active: Option<bool>,
}

/// Result of one materialization run.
#[derive(Debug, Clone, Default)]
pub(crate) struct ProcessOutcome {
    /// Due definitions handled, whether or not they produced a transaction.
    pub(crate) processed: usize,
    /// Due definitions left untouched because they could not be read or
    /// their category is gone.
    pub(crate) skipped: usize,
    pub(crate) transactions: Vec<Transaction>,
}

impl ProcessOutcome {
    pub(crate) fn created(&self) -> usize {
        self.transactions.len()
    }
}

/// Soonest first, optionally only active or only paused definitions.
pub(crate) fn list_recurring(
    db: &Database,
    session: &Session,
    active: Option<bool>,
) -> Result<Vec<RecurringTransaction>> {
    db.get_recurring_list(session.user_id(), active)
}

pub(crate) fn create_recurring(
    db: &Database,
    session: &Session,
    new: NewRecurring,
) -> Result<RecurringTransaction> {
    let amount = validate::amount(new.amount)?;
    let description = validate::description(&new.description)?;
    validate::date_range(Some(new.start_date), new.end_date)?;
    let category = visible_category(db, session, new.category_id)?;
    check_kind(&category, new.kind)?;

    let mut rec = RecurringTransaction::new(
        session.user_id(),
        new.category_id,
        new.kind,
        amount,
        description,
        new.frequency,
        new.start_date,
        new.end_date,
    );
    rec.id = Some(db.insert_recurring(&rec)?);
    tracing::info!(
        user_id = session.user_id(),
        recurring_id = ?rec.id,
        frequency = %rec.frequency,
        next = %rec.next_occurrence,
        "created recurring transaction"
    );
    Ok(rec)
}

/// Apply `patch`. Changing the frequency or start date resets the schedule
/// to the first occurrence.
pub(crate) fn update_recurring(
    db: &Database,
    session: &Session,
    id: i64,
    patch: RecurringPatch,
) -> Result<RecurringTransaction> {
    let amount = patch.amount.map(validate::amount).transpose()?;
    let description = patch
        .description
        .as_deref()
        .map(validate::description)
        .transpose()?;

    let mut rec = db
        .get_recurring(session.user_id(), id)?
        .ok_or(Error::NotFound("recurring transaction"))?;

    if let Some(category_id) = patch.category_id {
        visible_category(db, session, category_id)?;
        rec.category_id = category_id;
    }
    if let Some(amount) = amount {
        rec.amount = amount;
    }
    if let Some(description) = description {
        rec.description = description;
    }
    if let Some(kind) = patch.kind {
        rec.kind = kind;
    }
    if let Some(end_date) = patch.end_date {
        rec.end_date = Some(end_date);
    }
    if let Some(is_active) = patch.is_active {
        rec.is_active = is_active;
    }
    if patch.frequency.is_some() || patch.start_date.is_some() {
        rec.frequency = patch.frequency.unwrap_or(rec.frequency);
        rec.start_date = patch.start_date.unwrap_or(rec.start_date);
        rec.next_occurrence = calendar::first_occurrence(rec.start_date);
    }

    validate::date_range(Some(rec.start_date), rec.end_date)?;
    if patch.kind.is_some() || patch.category_id.is_some() {
        let category = visible_category(db, session, rec.category_id)?;
        check_kind(&category, rec.kind)?;
    }

    db.update_recurring(&rec)?;
    tracing::info!(user_id = session.user_id(), recurring_id = id, "updated recurring transaction");
    Ok(rec)
}

pub(crate) fn delete_recurring(db: &Database, session: &Session, id: i64) -> Result<()> {
    if db.delete_recurring(session.user_id(), id)? == 0 {
        return Err(Error::NotFound("recurring transaction"));
    }
    tracing::info!(user_id = session.user_id(), recurring_id = id, "deleted recurring transaction");
    Ok(())
}

pub(crate) fn toggle_active(db: &Database, session: &Session, id: i64) -> Result<RecurringTransaction> {
    let mut rec = db
        .get_recurring(session.user_id(), id)?
        .ok_or(Error::NotFound("recurring transaction"))?;
    rec.is_active = !rec.is_active;
    db.update_recurring(&rec)?;
    tracing::info!(
        user_id = session.user_id(),
        recurring_id = id,
        active = rec.is_active,
        "toggled recurring transaction"
    );
    Ok(rec)
}

/// Materialize every definition of the caller that is due on `as_of`
/// (today when `None`).
///
/// Each due definition yields at most one transaction for the day: an
/// identical existing transaction suppresses creation. The schedule pointer
/// advances either way, in the same database transaction as the insert.
/// Definitions that cannot be read or whose category has disappeared are
/// logged and skipped without touching the rest of the batch.
pub(crate) fn process_recurring(
    db: &mut Database,
    session: &Session,
    as_of: Option<NaiveDate>,
) -> Result<ProcessOutcome> {
    let as_of = as_of.unwrap_or_else(|| chrono::Local::now().date_naive());
    let due = db.get_due_recurring(session.user_id(), as_of)?;
    let mut outcome = ProcessOutcome::default();

    for row in due {
        let (rec, has_category) = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable recurring transaction");
                outcome.skipped += 1;
                continue;
            }
        };
        if !has_category {
            tracing::warn!(
                recurring_id = ?rec.id,
                category_id = rec.category_id,
                "skipping recurring transaction whose category no longer exists"
            );
            outcome.skipped += 1;
            continue;
        }

        let next = calendar::next_occurrence(rec.next_occurrence, rec.frequency);
        if let Some(txn) = db.materialize_occurrence(&rec, as_of, next)? {
            outcome.transactions.push(txn);
        }
        outcome.processed += 1;
    }

    tracing::info!(
        user_id = session.user_id(),
        %as_of,
        processed = outcome.processed,
        created = outcome.created(),
        skipped = outcome.skipped,
        "processed recurring transactions"
    );
    Ok(outcome)
}

#[cfg(test)]
#[path = "recurring_tests.rs"]
mod tests;
