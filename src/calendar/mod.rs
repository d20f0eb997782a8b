//! Calendar arithmetic for recurring schedules and monthly reports.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::models::Frequency;

/// The date one `frequency` period after `current`.
///
/// Month steps clamp to the last day of the target month, so Jan 31 is
/// followed by Feb 29 (or 28) and Feb 29 plus a year is Feb 28. A step past
/// the representable range leaves the date unchanged.
pub(crate) fn next_occurrence(current: NaiveDate, frequency: Frequency) -> NaiveDate {
    let next = match frequency {
        Frequency::Daily => current.checked_add_days(Days::new(1)),
        Frequency::Weekly => current.checked_add_days(Days::new(7)),
        Frequency::Monthly => current.checked_add_months(Months::new(1)),
        Frequency::Yearly => current.checked_add_months(Months::new(12)),
    };
    next.unwrap_or(current)
}

/// Initial schedule pointer for a definition starting on `start_date`.
pub(crate) fn first_occurrence(start_date: NaiveDate) -> NaiveDate {
    start_date
}

/// First and last day of a month. `month0` is zero-based.
pub(crate) fn month_bounds(year: i32, month0: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)?;
    let last = first
        .checked_add_months(Months::new(1))?
        .pred_opt()?;
    Some((first, last))
}

/// The `count` months ending with the month of `today`, oldest first, as
/// `(year, month0)` pairs.
pub(crate) fn trailing_months(today: NaiveDate, count: u32) -> Vec<(i32, u32)> {
    let current = today.year() * 12 + today.month0() as i32;
    (0..count as i32)
        .rev()
        .map(|back| {
            let index = current - back;
            (index.div_euclid(12), index.rem_euclid(12) as u32)
        })
        .collect()
}

/// Parse a `YYYY-MM` month key into `(year, month0)`.
pub(crate) fn parse_month(s: &str) -> Option<(i32, u32)> {
    let (year, month) = s.trim().split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((year, month - 1))
}

/// Short month label such as "Jan".
pub(crate) fn month_name(year: i32, month0: u32) -> String {
    NaiveDate::from_ymd_opt(year, month0 + 1, 1)
        .map(|d| d.format("%b").to_string())
        .unwrap_or_default()
}
