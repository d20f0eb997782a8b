//! Operations the front end calls. Each one takes the caller's [`Session`]
//! and only ever touches that user's rows.

mod analytics;
mod categories;
mod maintenance;
mod recurring;
mod transactions;
mod users;
mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub(crate) use analytics::{category_breakdown, category_stats, monthly_stats, monthly_trends};
pub(crate) use categories::{
    create_category, delete_category, list_categories, update_category, CategoryPatch,
};
pub(crate) use maintenance::{cleanup_duplicates, CleanupOutcome};
pub(crate) use recurring::{
    create_recurring, delete_recurring, list_recurring, process_recurring, toggle_active,
    update_recurring, NewRecurring, ProcessOutcome, RecurringPatch,
};
pub(crate) use transactions::{
    create_transaction, delete_transaction, list_transactions, recent_transactions,
    update_transaction, NewTransaction, TransactionPage, TransactionPatch, DEFAULT_PAGE_SIZE,
};
pub(crate) use users::{list_users, profile, register_user, update_profile, ProfilePatch};
pub(crate) use validate::parse_amount;

use crate::db::Database;
use crate::error::{Error, Result};

/// The authenticated caller. Obtained from [`Session::authenticate`] and
/// passed explicitly into every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Session {
    user_id: i64,
}

impl Session {
    /// Resolve the acting user by email. Credentials are checked upstream;
    /// an unknown or missing identity is `Unauthorized`.
    pub(crate) fn authenticate(db: &Database, email: Option<&str>) -> Result<Self> {
        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(Error::Unauthorized)?;
        let user = db.get_user_by_email(email)?.ok_or(Error::Unauthorized)?;
        let user_id = user.id.ok_or(Error::Unauthorized)?;
        tracing::debug!(user_id, "session resolved");
        Ok(Self { user_id })
    }

    pub(crate) fn user_id(&self) -> i64 {
        self.user_id
    }
}
