use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{EntryKind, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Some(Self::Daily),
            "weekly" | "week" => Some(Self::Weekly),
            "monthly" | "month" => Some(Self::Monthly),
            "yearly" | "year" | "annual" | "annually" => Some(Self::Yearly),
            _ => None,
        }
    }

    pub fn all() -> &'static [Frequency] {
        &[Self::Daily, Self::Weekly, Self::Monthly, Self::Yearly]
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A template that produces a [`Transaction`] each time it comes due.
#[derive(Debug, Clone)]
pub struct RecurringTransaction {
    pub id: Option<i64>,
    pub user_id: i64,
    pub category_id: i64,
    pub kind: EntryKind,
    pub amount: Decimal,
    pub description: String,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Next calendar date on which this definition fires.
    pub next_occurrence: NaiveDate,
    pub is_active: bool,
    pub created_at: String,
}

impl RecurringTransaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: i64,
        category_id: i64,
        kind: EntryKind,
        amount: Decimal,
        description: String,
        frequency: Frequency,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: None,
            user_id,
            category_id,
            kind,
            amount,
            description,
            frequency,
            start_date,
            end_date,
            next_occurrence: crate::calendar::first_occurrence(start_date),
            is_active: true,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Whether this definition should fire on `as_of`.
    pub fn is_due(&self, as_of: NaiveDate) -> bool {
        self.is_active
            && self.next_occurrence == as_of
            && self.end_date.map_or(true, |end| end >= as_of)
    }

    /// The concrete transaction this definition produces on `date`.
    pub fn materialize(&self, date: NaiveDate) -> Transaction {
        Transaction::new(
            self.user_id,
            self.category_id,
            self.kind,
            self.amount,
            self.description.clone(),
            date,
        )
    }
}
