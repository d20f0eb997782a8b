//! Fixtures shared by the service tests.
#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;

use super::{register_user, Session};
use crate::db::Database;
use crate::models::EntryKind;

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn sign_up(db: &Database, email: &str) -> Session {
    register_user(db, email, "Test User").unwrap();
    Session::authenticate(db, Some(email)).unwrap()
}

/// Fresh database with one signed-up user.
pub(crate) fn setup() -> (Database, Session) {
    let db = Database::open_in_memory().unwrap();
    let session = sign_up(&db, "demo@example.com");
    (db, session)
}

pub(crate) fn default_category(db: &Database, session: &Session, name: &str, kind: EntryKind) -> i64 {
    db.get_categories(session.user_id(), Some(kind))
        .unwrap()
        .into_iter()
        .find(|c| c.name == name && c.is_default)
        .and_then(|c| c.id)
        .unwrap()
}
