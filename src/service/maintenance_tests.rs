#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::models::{EntryKind, Transaction, TransactionFilter};
use crate::service::testing::{date, default_category, setup, sign_up};

fn insert_copies(db: &Database, session: &Session, description: &str, copies: usize) {
    let category_id = default_category(db, session, "Groceries", EntryKind::Expense);
    for _ in 0..copies {
        let txn = Transaction::new(
            session.user_id(),
            category_id,
            EntryKind::Expense,
            dec!(12.50),
            description.into(),
            date(2024, 3, 4),
        );
        db.insert_transaction(&txn).unwrap();
    }
}

fn ids(db: &Database, session: &Session) -> Vec<i64> {
    let mut ids: Vec<i64> = db
        .get_transactions(session.user_id(), &TransactionFilter::default(), None, None)
        .unwrap()
        .into_iter()
        .filter_map(|t| t.id)
        .collect();
    ids.sort_unstable();
    ids
}

#[test]
fn test_cleanup_keeps_oldest() {
    let (mut db, session) = setup();
    insert_copies(&db, &session, "Market", 3);
    insert_copies(&db, &session, "Bakery", 1);
    let before = ids(&db, &session);

    let outcome = cleanup_duplicates(&mut db, &session, false).unwrap();
    assert_eq!(outcome.duplicates, 2);
    assert_eq!(outcome.deleted, 2);
    assert_eq!(ids(&db, &session), vec![before[0], before[3]]);
}

#[test]
fn test_cleanup_dry_run_deletes_nothing() {
    let (mut db, session) = setup();
    insert_copies(&db, &session, "Market", 2);

    let outcome = cleanup_duplicates(&mut db, &session, true).unwrap();
    assert_eq!(outcome.duplicates, 1);
    assert_eq!(outcome.deleted, 0);
    assert_eq!(ids(&db, &session).len(), 2);
}

#[test]
fn test_cleanup_without_duplicates() {
    let (mut db, session) = setup();
    insert_copies(&db, &session, "Market", 1);
    let outcome = cleanup_duplicates(&mut db, &session, false).unwrap();
    assert_eq!(outcome, CleanupOutcome { duplicates: 0, deleted: 0 });
}

#[test]
fn test_cleanup_leaves_other_users_alone() {
    let (mut db, session) = setup();
    let other = sign_up(&db, "other@example.com");
    insert_copies(&db, &other, "Market", 2);

    let outcome = cleanup_duplicates(&mut db, &session, false).unwrap();
    assert_eq!(outcome.deleted, 0);
    assert_eq!(ids(&db, &other).len(), 2);
}
