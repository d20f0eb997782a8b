mod category;
mod kind;
mod recurring;
mod report;
mod transaction;
mod user;

pub use category::{Category, DEFAULT_COLOR};
pub use kind::EntryKind;
pub use recurring::{Frequency, RecurringTransaction};
pub use report::{CategoryTotal, MonthlyStats, TrendPoint};
pub use transaction::{Transaction, TransactionFilter};
pub use user::User;
