use rust_decimal::Decimal;

use super::Category;

/// Totals for one calendar month.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthlyStats {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_income: Decimal,
    pub income_count: i64,
    pub expense_count: i64,
    pub total_transactions: i64,
}

impl MonthlyStats {
    pub fn new(
        total_income: Decimal,
        income_count: i64,
        total_expenses: Decimal,
        expense_count: i64,
    ) -> Self {
        Self {
            total_income,
            total_expenses,
            net_income: total_income - total_expenses,
            income_count,
            expense_count,
            total_transactions: income_count + expense_count,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CategoryTotal {
    pub category: Category,
    pub total_amount: Decimal,
    pub transaction_count: i64,
}

/// One month of a trend series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendPoint {
    pub year: i32,
    /// Zero-based, January = 0.
    pub month: u32,
    pub month_name: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}
