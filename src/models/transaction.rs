use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::EntryKind;

#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Option<i64>,
    pub user_id: i64,
    pub category_id: i64,
    pub kind: EntryKind,
    /// Always positive; `kind` carries the sign.
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub created_at: String,
}

impl Transaction {
    pub fn new(
        user_id: i64,
        category_id: i64,
        kind: EntryKind,
        amount: Decimal,
        description: String,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            user_id,
            category_id,
            kind,
            amount,
            description,
            date,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Contribution to net income.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            EntryKind::Income => self.amount,
            EntryKind::Expense => -self.amount,
        }
    }
}

/// Optional narrowing applied when listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<EntryKind>,
    pub category_id: Option<i64>,
    /// Inclusive.
    pub start: Option<NaiveDate>,
    /// Inclusive.
    pub end: Option<NaiveDate>,
    pub search: Option<String>,
}
