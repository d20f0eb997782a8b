use crate::models::EntryKind;

pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    email           TEXT NOT NULL UNIQUE COLLATE NOCASE,
    name            TEXT NOT NULL,
    credential_hash TEXT,
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    kind       TEXT NOT NULL CHECK (kind IN ('INCOME', 'EXPENSE')),
    color      TEXT NOT NULL DEFAULT '#3B82F6',
    is_default BOOLEAN NOT NULL DEFAULT 0,
    user_id    INTEGER REFERENCES users(id) ON DELETE CASCADE
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_categories_owner_name
    ON categories(COALESCE(user_id, 0), name, kind);

CREATE TABLE IF NOT EXISTS transactions (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id      INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    category_id  INTEGER NOT NULL REFERENCES categories(id),
    kind         TEXT NOT NULL CHECK (kind IN ('INCOME', 'EXPENSE')),
    amount_cents INTEGER NOT NULL CHECK (amount_cents > 0),
    description  TEXT NOT NULL,
    date         TEXT NOT NULL,
    created_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date);
CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category_id);

CREATE TABLE IF NOT EXISTS recurring_transactions (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id         INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    category_id     INTEGER NOT NULL REFERENCES categories(id),
    kind            TEXT NOT NULL CHECK (kind IN ('INCOME', 'EXPENSE')),
    amount_cents    INTEGER NOT NULL CHECK (amount_cents > 0),
    description     TEXT NOT NULL,
    frequency       TEXT NOT NULL CHECK (frequency IN ('DAILY', 'WEEKLY', 'MONTHLY', 'YEARLY')),
    start_date      TEXT NOT NULL,
    end_date        TEXT,
    next_occurrence TEXT NOT NULL,
    is_active       BOOLEAN NOT NULL DEFAULT 1,
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_recurring_user_next ON recurring_transactions(user_id, next_occurrence);
CREATE INDEX IF NOT EXISTS idx_recurring_category ON recurring_transactions(category_id);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];

/// Seeded once; shared by every user and never editable.
pub(crate) const DEFAULT_CATEGORIES: &[(&str, EntryKind, &str)] = &[
    ("Salary", EntryKind::Income, "#10B981"),
    ("Freelance", EntryKind::Income, "#06B6D4"),
    ("Investments", EntryKind::Income, "#8B5CF6"),
    ("Gifts", EntryKind::Income, "#EC4899"),
    ("Other Income", EntryKind::Income, "#6B7280"),
    ("Bills & Utilities", EntryKind::Expense, "#EF4444"),
    ("Education", EntryKind::Expense, "#0EA5E9"),
    ("Entertainment", EntryKind::Expense, "#A855F7"),
    ("Food & Dining", EntryKind::Expense, "#F59E0B"),
    ("Groceries", EntryKind::Expense, "#84CC16"),
    ("Health & Fitness", EntryKind::Expense, "#14B8A6"),
    ("Housing", EntryKind::Expense, "#F97316"),
    ("Insurance", EntryKind::Expense, "#64748B"),
    ("Personal Care", EntryKind::Expense, "#D946EF"),
    ("Shopping", EntryKind::Expense, "#3B82F6"),
    ("Subscriptions", EntryKind::Expense, "#6366F1"),
    ("Transportation", EntryKind::Expense, "#22C55E"),
    ("Travel", EntryKind::Expense, "#0891B2"),
    ("Other Expenses", EntryKind::Expense, "#6B7280"),
];
