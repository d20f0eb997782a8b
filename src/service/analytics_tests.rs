#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::error::ErrorKind;
use crate::service::testing::{date, default_category, setup, sign_up};
use crate::service::{create_transaction, NewTransaction};

fn add(db: &Database, session: &Session, kind: EntryKind, category: &str, amount: Decimal, on: NaiveDate) {
    let category_id = default_category(db, session, category, kind);
    create_transaction(
        db,
        session,
        NewTransaction {
            amount,
            description: format!("{category} {on}"),
            kind,
            date: on,
            category_id,
        },
    )
    .unwrap();
}

/// January and February 2024 with a mix of income and expenses.
fn seed(db: &Database, session: &Session) {
    add(db, session, EntryKind::Income, "Salary", dec!(3000), date(2024, 1, 1));
    add(db, session, EntryKind::Expense, "Housing", dec!(1200), date(2024, 1, 3));
    add(db, session, EntryKind::Expense, "Groceries", dec!(85.40), date(2024, 1, 12));
    add(db, session, EntryKind::Expense, "Groceries", dec!(64.60), date(2024, 1, 31));
    add(db, session, EntryKind::Income, "Salary", dec!(3000), date(2024, 2, 1));
    add(db, session, EntryKind::Expense, "Groceries", dec!(42), date(2024, 2, 29));
}

// ── monthly_stats ─────────────────────────────────────────────

#[test]
fn test_monthly_stats() {
    let (db, session) = setup();
    seed(&db, &session);

    let jan = monthly_stats(&db, &session, 2024, 0).unwrap();
    assert_eq!(jan.total_income, dec!(3000));
    assert_eq!(jan.total_expenses, dec!(1350));
    assert_eq!(jan.net_income, dec!(1650));
    assert_eq!(jan.income_count, 1);
    assert_eq!(jan.expense_count, 3);
    assert_eq!(jan.total_transactions, 4);

    let feb = monthly_stats(&db, &session, 2024, 1).unwrap();
    assert_eq!(feb.total_expenses, dec!(42));
    assert_eq!(feb.net_income, feb.total_income - feb.total_expenses);
}

#[test]
fn test_monthly_stats_empty_month_is_zero() {
    let (db, session) = setup();
    seed(&db, &session);
    assert_eq!(monthly_stats(&db, &session, 2023, 11).unwrap(), MonthlyStats::default());
}

#[test]
fn test_monthly_stats_rejects_bad_month() {
    let (db, session) = setup();
    let err = monthly_stats(&db, &session, 2024, 12).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_monthly_stats_scoped_to_caller() {
    let (db, session) = setup();
    seed(&db, &session);
    let other = sign_up(&db, "other@example.com");
    assert_eq!(monthly_stats(&db, &other, 2024, 0).unwrap(), MonthlyStats::default());
}

// ── category_breakdown ────────────────────────────────────────

#[test]
fn test_breakdown_sorted_by_total() {
    let (db, session) = setup();
    seed(&db, &session);

    let rows = category_breakdown(
        &db,
        &session,
        Some(EntryKind::Expense),
        Some(date(2024, 1, 1)),
        Some(date(2024, 1, 31)),
    )
    .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].category.name, "Housing");
    assert_eq!(rows[0].total_amount, dec!(1200));
    assert_eq!(rows[1].category.name, "Groceries");
    assert_eq!(rows[1].total_amount, dec!(150));
    assert_eq!(rows[1].transaction_count, 2);
}

#[test]
fn test_breakdown_matches_monthly_totals() {
    let (db, session) = setup();
    seed(&db, &session);

    for month0 in 0..2 {
        let (start, end) = calendar::month_bounds(2024, month0).unwrap();
        let stats = monthly_stats(&db, &session, 2024, month0).unwrap();
        for (kind, total, count) in [
            (EntryKind::Income, stats.total_income, stats.income_count),
            (EntryKind::Expense, stats.total_expenses, stats.expense_count),
        ] {
            let rows = category_breakdown(&db, &session, Some(kind), Some(start), Some(end)).unwrap();
            let sum: Decimal = rows.iter().map(|r| r.total_amount).sum();
            let n: i64 = rows.iter().map(|r| r.transaction_count).sum();
            assert_eq!(sum, total, "{kind} total for month {month0}");
            assert_eq!(n, count, "{kind} count for month {month0}");
        }
    }
}

#[test]
fn test_breakdown_without_filters_covers_everything() {
    let (db, session) = setup();
    seed(&db, &session);
    let rows = category_breakdown(&db, &session, None, None, None).unwrap();
    let n: i64 = rows.iter().map(|r| r.transaction_count).sum();
    assert_eq!(n, 6);
}

#[test]
fn test_breakdown_drops_deleted_category() {
    let (db, session) = setup();
    let storage = crate::service::create_category(&db, &session, "Storage", EntryKind::Expense, None).unwrap();
    let cat = storage.id.unwrap();
    create_transaction(
        &db,
        &session,
        NewTransaction {
            amount: dec!(10),
            description: "Storage unit".into(),
            kind: EntryKind::Expense,
            date: date(2024, 1, 5),
            category_id: cat,
        },
    )
    .unwrap();
    add(&db, &session, EntryKind::Expense, "Groceries", dec!(5), date(2024, 1, 6));

    db.conn()
        .execute_batch(&format!(
            "PRAGMA foreign_keys=OFF; DELETE FROM categories WHERE id = {cat}; PRAGMA foreign_keys=ON;"
        ))
        .unwrap();

    let rows = category_breakdown(&db, &session, Some(EntryKind::Expense), None, None).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category.name, "Groceries");
    assert_eq!(rows[0].total_amount, dec!(5));

    // Month totals still count the orphaned row.
    let jan = monthly_stats(&db, &session, 2024, 0).unwrap();
    assert_eq!(jan.total_expenses, dec!(15));
    assert_eq!(jan.expense_count, 2);
}

#[test]
fn test_breakdown_rejects_inverted_range() {
    let (db, session) = setup();
    let err = category_breakdown(&db, &session, None, Some(date(2024, 2, 1)), Some(date(2024, 1, 1)))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

// ── monthly_trends ────────────────────────────────────────────

#[test]
fn test_trends_length_and_order() {
    let (db, session) = setup();
    seed(&db, &session);

    let points = monthly_trends(&db, &session, 6, date(2024, 2, 10)).unwrap();
    assert_eq!(points.len(), 6);
    let keys: Vec<(i32, u32)> = points.iter().map(|p| (p.year, p.month)).collect();
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(keys.first(), Some(&(2023, 8)));
    assert_eq!(keys.last(), Some(&(2024, 1)));

    let feb = points.last().unwrap();
    assert_eq!(feb.month_name, "Feb");
    assert_eq!(feb.income, dec!(3000));
    assert_eq!(feb.expenses, dec!(42));
    assert_eq!(feb.net, dec!(2958));

    let sep = &points[0];
    assert_eq!(sep.month_name, "Sep");
    assert_eq!(sep.net, Decimal::ZERO);
}

#[test]
fn test_trends_bounds() {
    let (db, session) = setup();
    assert_eq!(monthly_trends(&db, &session, 1, date(2024, 1, 1)).unwrap().len(), 1);
    assert_eq!(monthly_trends(&db, &session, 24, date(2024, 1, 1)).unwrap().len(), 24);
    for bad in [0, 25] {
        let err = monthly_trends(&db, &session, bad, date(2024, 1, 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}

// ── category_stats ────────────────────────────────────────────

#[test]
fn test_category_stats() {
    let (db, session) = setup();
    seed(&db, &session);
    let groceries = default_category(&db, &session, "Groceries", EntryKind::Expense);

    let (total, count) = category_stats(&db, &session, groceries, None, None).unwrap();
    assert_eq!(total, dec!(192));
    assert_eq!(count, 3);

    let (total, count) =
        category_stats(&db, &session, groceries, Some(date(2024, 2, 1)), None).unwrap();
    assert_eq!(total, dec!(42));
    assert_eq!(count, 1);
}

#[test]
fn test_category_stats_unknown_category() {
    let (db, session) = setup();
    let err = category_stats(&db, &session, 9999, None, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidReference);
}
