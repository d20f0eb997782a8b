#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::error::ErrorKind;
use crate::models::TransactionFilter;
use crate::service::testing::{date, default_category, setup, sign_up};

fn rent(db: &Database, session: &Session) -> NewRecurring {
    NewRecurring {
        amount: dec!(100),
        description: "Rent".into(),
        kind: EntryKind::Expense,
        frequency: Frequency::Monthly,
        start_date: date(2024, 1, 15),
        end_date: None,
        category_id: default_category(db, session, "Housing", EntryKind::Expense),
    }
}

fn all_transactions(db: &Database, session: &Session) -> Vec<Transaction> {
    db.get_transactions(session.user_id(), &TransactionFilter::default(), None, None)
        .unwrap()
}

// ── create / update / delete / toggle ─────────────────────────

#[test]
fn test_create_sets_first_occurrence() {
    let (db, session) = setup();
    let rec = create_recurring(&db, &session, rent(&db, &session)).unwrap();
    assert!(rec.id.is_some());
    assert!(rec.is_active);
    assert_eq!(rec.next_occurrence, date(2024, 1, 15));
}

#[test]
fn test_create_validates() {
    let (db, session) = setup();

    let mut bad = rent(&db, &session);
    bad.amount = dec!(-1);
    assert_eq!(create_recurring(&db, &session, bad).unwrap_err().kind(), ErrorKind::Validation);

    let mut bad = rent(&db, &session);
    bad.description = String::new();
    assert_eq!(create_recurring(&db, &session, bad).unwrap_err().kind(), ErrorKind::Validation);

    let mut bad = rent(&db, &session);
    bad.end_date = Some(date(2024, 1, 1));
    assert_eq!(create_recurring(&db, &session, bad).unwrap_err().kind(), ErrorKind::Validation);

    let mut bad = rent(&db, &session);
    bad.category_id = 4242;
    assert_eq!(
        create_recurring(&db, &session, bad).unwrap_err().kind(),
        ErrorKind::InvalidReference
    );

    assert!(list_recurring(&db, &session, None).unwrap().is_empty());
}

#[test]
fn test_update_recomputes_schedule_on_frequency_change() {
    let (mut db, session) = setup();
    let rec = create_recurring(&db, &session, rent(&db, &session)).unwrap();
    let id = rec.id.unwrap();
    process_recurring(&mut db, &session, Some(date(2024, 1, 15))).unwrap();

    let updated = update_recurring(
        &db,
        &session,
        id,
        RecurringPatch {
            frequency: Some(Frequency::Weekly),
            start_date: Some(date(2024, 3, 1)),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(updated.frequency, Frequency::Weekly);
    assert_eq!(updated.next_occurrence, date(2024, 3, 1));
}

#[test]
fn test_update_without_schedule_change_keeps_pointer() {
    let (mut db, session) = setup();
    let rec = create_recurring(&db, &session, rent(&db, &session)).unwrap();
    let id = rec.id.unwrap();
    process_recurring(&mut db, &session, Some(date(2024, 1, 15))).unwrap();

    let updated = update_recurring(
        &db,
        &session,
        id,
        RecurringPatch {
            amount: Some(dec!(1200)),
            description: Some("New lease".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(updated.amount, dec!(1200));
    assert_eq!(updated.next_occurrence, date(2024, 2, 15));
}

#[test]
fn test_update_end_before_start_rejected() {
    let (db, session) = setup();
    let rec = create_recurring(&db, &session, rent(&db, &session)).unwrap();
    let err = update_recurring(
        &db,
        &session,
        rec.id.unwrap(),
        RecurringPatch {
            end_date: Some(date(2023, 12, 31)),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_toggle_active() {
    let (db, session) = setup();
    let rec = create_recurring(&db, &session, rent(&db, &session)).unwrap();
    let id = rec.id.unwrap();
    assert!(!toggle_active(&db, &session, id).unwrap().is_active);
    assert_eq!(list_recurring(&db, &session, Some(true)).unwrap().len(), 0);
    assert!(toggle_active(&db, &session, id).unwrap().is_active);
    assert_eq!(list_recurring(&db, &session, Some(true)).unwrap().len(), 1);
}

#[test]
fn test_delete_and_ownership() {
    let (db, session) = setup();
    let other = sign_up(&db, "other@example.com");
    let rec = create_recurring(&db, &session, rent(&db, &session)).unwrap();
    let id = rec.id.unwrap();

    assert_eq!(delete_recurring(&db, &other, id).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(toggle_active(&db, &other, id).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(
        update_recurring(&db, &other, id, RecurringPatch::default())
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );

    delete_recurring(&db, &session, id).unwrap();
    assert_eq!(delete_recurring(&db, &session, id).unwrap_err().kind(), ErrorKind::NotFound);
}

// ── process_recurring ─────────────────────────────────────────

#[test]
fn test_monthly_rent_scenario() {
    let (mut db, session) = setup();
    let rec = create_recurring(&db, &session, rent(&db, &session)).unwrap();

    let outcome = process_recurring(&mut db, &session, Some(date(2024, 1, 15))).unwrap();
    assert_eq!(outcome.processed, 1);
    assert_eq!(outcome.created(), 1);
    let txn = &outcome.transactions[0];
    assert_eq!(txn.date, date(2024, 1, 15));
    assert_eq!(txn.amount, dec!(100));
    assert_eq!(txn.kind, EntryKind::Expense);

    let rec = db.get_recurring(session.user_id(), rec.id.unwrap()).unwrap().unwrap();
    assert_eq!(rec.next_occurrence, date(2024, 2, 15));
}

#[test]
fn test_process_twice_same_day_creates_once() {
    let (mut db, session) = setup();
    create_recurring(&db, &session, rent(&db, &session)).unwrap();

    let first = process_recurring(&mut db, &session, Some(date(2024, 1, 15))).unwrap();
    let second = process_recurring(&mut db, &session, Some(date(2024, 1, 15))).unwrap();
    assert_eq!(first.created(), 1);
    assert_eq!(second.created(), 0);
    assert_eq!(all_transactions(&db, &session).len(), 1);
}

#[test]
fn test_existing_identical_transaction_suppresses_creation() {
    let (mut db, session) = setup();
    let new = rent(&db, &session);
    let rec = create_recurring(&db, &session, new.clone()).unwrap();
    crate::service::create_transaction(
        &db,
        &session,
        crate::service::NewTransaction {
            amount: new.amount,
            description: new.description.clone(),
            kind: new.kind,
            date: date(2024, 1, 15),
            category_id: new.category_id,
        },
    )
    .unwrap();

    let outcome = process_recurring(&mut db, &session, Some(date(2024, 1, 15))).unwrap();
    assert_eq!(outcome.processed, 1);
    assert_eq!(outcome.created(), 0);
    assert_eq!(all_transactions(&db, &session).len(), 1);
    let rec = db.get_recurring(session.user_id(), rec.id.unwrap()).unwrap().unwrap();
    assert_eq!(rec.next_occurrence, date(2024, 2, 15));
}

#[test]
fn test_consecutive_months() {
    let (mut db, session) = setup();
    create_recurring(&db, &session, rent(&db, &session)).unwrap();
    for month in 1..=3 {
        let outcome = process_recurring(&mut db, &session, Some(date(2024, month, 15))).unwrap();
        assert_eq!(outcome.created(), 1);
    }
    assert_eq!(all_transactions(&db, &session).len(), 3);
}

#[test]
fn test_not_due_today_is_ignored() {
    let (mut db, session) = setup();
    create_recurring(&db, &session, rent(&db, &session)).unwrap();
    let outcome = process_recurring(&mut db, &session, Some(date(2024, 1, 14))).unwrap();
    assert_eq!(outcome.processed, 0);
    assert_eq!(outcome.created(), 0);
}

#[test]
fn test_inactive_and_ended_are_ignored() {
    let (mut db, session) = setup();
    let paused = create_recurring(&db, &session, rent(&db, &session)).unwrap();
    toggle_active(&db, &session, paused.id.unwrap()).unwrap();

    let mut ended = rent(&db, &session);
    ended.description = "Old lease".into();
    ended.start_date = date(2023, 12, 15);
    ended.end_date = Some(date(2024, 1, 10));
    let ended = create_recurring(&db, &session, ended).unwrap();
    // Force the pointer onto the processing day to exercise the end-date guard
    let mut stored = db.get_recurring(session.user_id(), ended.id.unwrap()).unwrap().unwrap();
    stored.next_occurrence = date(2024, 1, 15);
    db.update_recurring(&stored).unwrap();

    let outcome = process_recurring(&mut db, &session, Some(date(2024, 1, 15))).unwrap();
    assert_eq!(outcome.processed, 0);
    assert!(all_transactions(&db, &session).is_empty());
}

#[test]
fn test_end_date_on_processing_day_still_fires() {
    let (mut db, session) = setup();
    let mut new = rent(&db, &session);
    new.end_date = Some(date(2024, 1, 15));
    create_recurring(&db, &session, new).unwrap();
    let outcome = process_recurring(&mut db, &session, Some(date(2024, 1, 15))).unwrap();
    assert_eq!(outcome.created(), 1);
}

#[test]
fn test_only_callers_definitions_processed() {
    let (mut db, session) = setup();
    let other = sign_up(&db, "other@example.com");
    create_recurring(&db, &other, rent(&db, &other)).unwrap();

    let outcome = process_recurring(&mut db, &session, Some(date(2024, 1, 15))).unwrap();
    assert_eq!(outcome.processed, 0);
    let outcome = process_recurring(&mut db, &other, Some(date(2024, 1, 15))).unwrap();
    assert_eq!(outcome.created(), 1);
}

#[test]
fn test_orphaned_definition_is_skipped() {
    let (mut db, session) = setup();
    let cat = crate::service::create_category(&db, &session, "Storage", EntryKind::Expense, None)
        .unwrap()
        .id
        .unwrap();
    let mut orphan = rent(&db, &session);
    orphan.category_id = cat;
    orphan.description = "Storage unit".into();
    let orphan = create_recurring(&db, &session, orphan).unwrap();
    create_recurring(&db, &session, rent(&db, &session)).unwrap();

    db.conn()
        .execute_batch(&format!(
            "PRAGMA foreign_keys=OFF; DELETE FROM categories WHERE id = {cat}; PRAGMA foreign_keys=ON;"
        ))
        .unwrap();

    let outcome = process_recurring(&mut db, &session, Some(date(2024, 1, 15))).unwrap();
    assert_eq!(outcome.processed, 1);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.created(), 1);
    assert_eq!(outcome.transactions[0].description, "Rent");

    let orphan = db.get_recurring(session.user_id(), orphan.id.unwrap()).unwrap().unwrap();
    assert_eq!(orphan.next_occurrence, date(2024, 1, 15));
}

#[test]
fn test_unreadable_definition_is_skipped() {
    let (mut db, session) = setup();
    let broken = create_recurring(&db, &session, rent(&db, &session)).unwrap();
    let mut ok = rent(&db, &session);
    ok.description = "Parking".into();
    create_recurring(&db, &session, ok).unwrap();

    db.conn()
        .execute_batch(&format!(
            "PRAGMA ignore_check_constraints=ON;
             UPDATE recurring_transactions SET frequency = 'HOURLY' WHERE id = {};
             PRAGMA ignore_check_constraints=OFF;",
            broken.id.unwrap()
        ))
        .unwrap();

    let outcome = process_recurring(&mut db, &session, Some(date(2024, 1, 15))).unwrap();
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.created(), 1);
    assert_eq!(outcome.transactions[0].description, "Parking");
}
