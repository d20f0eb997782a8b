use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::categories::{check_kind, visible_category};
use super::{validate, Session};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{EntryKind, Transaction, TransactionFilter};

pub(crate) const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone)]
pub(crate) struct NewTransaction {
    pub(crate) amount: Decimal,
    pub(crate) description: String,
    pub(crate) kind: EntryKind,
    pub(crate) date: NaiveDate,
    pub(crate) category_id: i64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct TransactionPatch {
    pub(crate) amount: Option<Decimal>,
    pub(crate) description: Option<String>,
    pub(crate) kind: Option<EntryKind>,
    pub(crate) date: Option<NaiveDate>,
    pub(crate) category_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub(crate) struct TransactionPage {
    pub(crate) transactions: Vec<Transaction>,
    /// Id of the first transaction of the next page.
    pub(crate) next_cursor: Option<i64>,
}

/// One page of the caller's transactions, newest first.
pub(crate) fn list_transactions(
    db: &Database,
    session: &Session,
    filter: &TransactionFilter,
    limit: u32,
    cursor: Option<i64>,
) -> Result<TransactionPage> {
    let limit = validate::in_range("limit", limit, 1..=100)?;
    validate::date_range(filter.start, filter.end)?;

    let from = match cursor {
        Some(id) => {
            let at = db
                .get_transaction(session.user_id(), id)?
                .ok_or(Error::NotFound("cursor transaction"))?;
            Some((at.date, id))
        }
        None => None,
    };
    tracing::debug!(user_id = session.user_id(), limit, ?cursor, ?filter, "listing transactions");

    let mut transactions = db.get_transactions(session.user_id(), filter, Some(limit + 1), from)?;
    let next_cursor = if transactions.len() > limit as usize {
        transactions.pop().and_then(|t| t.id)
    } else {
        None
    };
    Ok(TransactionPage {
        transactions,
        next_cursor,
    })
}

pub(crate) fn recent_transactions(
    db: &Database,
    session: &Session,
    limit: u32,
) -> Result<Vec<Transaction>> {
    let limit = validate::in_range("limit", limit, 1..=20)?;
    db.get_transactions(session.user_id(), &TransactionFilter::default(), Some(limit), None)
}

pub(crate) fn create_transaction(
    db: &Database,
    session: &Session,
    new: NewTransaction,
) -> Result<Transaction> {
    let amount = validate::amount(new.amount)?;
    let description = validate::description(&new.description)?;
    let category = visible_category(db, session, new.category_id)?;
    check_kind(&category, new.kind)?;

    let mut txn = Transaction::new(
        session.user_id(),
        new.category_id,
        new.kind,
        amount,
        description,
        new.date,
    );
    txn.id = Some(db.insert_transaction(&txn)?);
    tracing::info!(
        user_id = session.user_id(),
        transaction_id = ?txn.id,
        kind = %txn.kind,
        amount = %txn.amount,
        "created transaction"
    );
    Ok(txn)
}

pub(crate) fn update_transaction(
    db: &Database,
    session: &Session,
    id: i64,
    patch: TransactionPatch,
) -> Result<Transaction> {
    let amount = patch.amount.map(validate::amount).transpose()?;
    let description = patch
        .description
        .as_deref()
        .map(validate::description)
        .transpose()?;

    let mut txn = db
        .get_transaction(session.user_id(), id)?
        .ok_or(Error::NotFound("transaction"))?;

    if let Some(category_id) = patch.category_id {
        visible_category(db, session, category_id)?;
        txn.category_id = category_id;
    }
    if let Some(amount) = amount {
        txn.amount = amount;
    }
    if let Some(description) = description {
        txn.description = description;
    }
    if let Some(kind) = patch.kind {
        txn.kind = kind;
    }
    if let Some(date) = patch.date {
        txn.date = date;
    }
    if patch.kind.is_some() || patch.category_id.is_some() {
        let category = visible_category(db, session, txn.category_id)?;
        check_kind(&category, txn.kind)?;
    }

    db.update_transaction(&txn)?;
    tracing::info!(user_id = session.user_id(), transaction_id = id, "updated transaction");
    Ok(txn)
}

pub(crate) fn delete_transaction(db: &Database, session: &Session, id: i64) -> Result<()> {
    if db.delete_transaction(session.user_id(), id)? == 0 {
        return Err(Error::NotFound("transaction"));
    }
    tracing::info!(user_id = session.user_id(), transaction_id = id, "deleted transaction");
    Ok(())
}

#[cfg(test)]
#[path = "transactions_tests.rs"]
mod tests;
