use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::categories::visible_category;
use super::{validate, Session};
use crate::calendar;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{CategoryTotal, EntryKind, MonthlyStats, TrendPoint};

pub(crate) const MAX_TREND_MONTHS: u32 = 24;

/// Income and expense totals for one calendar month. `month0` is
/// zero-based.
pub(crate) fn monthly_stats(
    db: &Database,
    session: &Session,
    year: i32,
    month0: u32,
) -> Result<MonthlyStats> {
    let month0 = validate::in_range("month", month0, 0..=11)?;
    let (start, end) = calendar::month_bounds(year, month0)
        .ok_or_else(|| Error::validation("year", format!("{year} is out of range")))?;

    let (income, income_count) = db.get_kind_totals(session.user_id(), EntryKind::Income, start, end)?;
    let (expenses, expense_count) =
        db.get_kind_totals(session.user_id(), EntryKind::Expense, start, end)?;
    tracing::debug!(user_id = session.user_id(), %start, %end, "monthly stats");
    Ok(MonthlyStats::new(income, income_count, expenses, expense_count))
}

/// Totals per category, largest first. Both bounds are inclusive.
pub(crate) fn category_breakdown(
    db: &Database,
    session: &Session,
    kind: Option<EntryKind>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Vec<CategoryTotal>> {
    validate::date_range(start, end)?;
    db.get_category_totals(session.user_id(), kind, start, end)
}

/// One point per month for the `month_count` months ending with the month
/// of `today`, oldest first.
pub(crate) fn monthly_trends(
    db: &Database,
    session: &Session,
    month_count: u32,
    today: NaiveDate,
) -> Result<Vec<TrendPoint>> {
    let month_count = validate::in_range("months", month_count, 1..=MAX_TREND_MONTHS)?;

    calendar::trailing_months(today, month_count)
        .into_iter()
        .map(|(year, month0)| {
            let stats = monthly_stats(db, session, year, month0)?;
            Ok(TrendPoint {
                year,
                month: month0,
                month_name: calendar::month_name(year, month0),
                income: stats.total_income,
                expenses: stats.total_expenses,
                net: stats.net_income,
            })
        })
        .collect()
}

/// Total amount and number of the caller's transactions in one category.
pub(crate) fn category_stats(
    db: &Database,
    session: &Session,
    category_id: i64,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(Decimal, i64)> {
    validate::date_range(start, end)?;
    visible_category(db, session, category_id)?;
    db.get_category_stats(session.user_id(), category_id, start, end)
}

#[cfg(test)]
#[path = "analytics_tests.rs"]
mod tests;
