//! CSV export of a user's transactions.

use std::path::Path;

use crate::calendar;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Category, TransactionFilter};
use crate::service::Session;

const HEADER: [&str; 6] = ["Date", "Type", "Category", "Description", "Amount", "Signed Amount"];

/// Write the caller's transactions to `path`, newest first, optionally
/// only those in one `(year, month0)`. Returns the number of rows written.
pub(crate) fn export_csv(
    db: &Database,
    session: &Session,
    path: &Path,
    month: Option<(i32, u32)>,
) -> Result<usize> {
    let mut filter = TransactionFilter::default();
    if let Some((year, month0)) = month {
        let (start, end) = calendar::month_bounds(year, month0)
            .ok_or_else(|| Error::validation("month", format!("{year}-{} is not a month", month0 + 1)))?;
        filter.start = Some(start);
        filter.end = Some(end);
    }

    let transactions = db.get_transactions(session.user_id(), &filter, None, None)?;
    let categories = db.get_categories(session.user_id(), None)?;

    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(HEADER)?;
    for txn in &transactions {
        let category = Category::find_by_id(&categories, txn.category_id)
            .map(|c| c.name.as_str())
            .unwrap_or_default();
        wtr.write_record([
            txn.date.format("%Y-%m-%d").to_string(),
            txn.kind.to_string(),
            category.to_string(),
            txn.description.clone(),
            format!("{:.2}", txn.amount),
            format!("{:.2}", txn.signed_amount()),
        ])?;
    }
    wtr.flush()?;

    tracing::info!(
        user_id = session.user_id(),
        path = %path.display(),
        rows = transactions.len(),
        "exported transactions"
    );
    Ok(transactions.len())
}
