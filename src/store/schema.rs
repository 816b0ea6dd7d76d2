pub const SCHEMA: &str = r#"
-- Accounts; emails are stored trimmed and lowercased
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password_hash TEXT NOT NULL,           -- argon2id PHC string
    created_at TEXT DEFAULT (datetime('now'))
);

-- One monthly budget per user, replaced on every save
CREATE TABLE IF NOT EXISTS budgets (
    user_id INTEGER PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
    amount REAL NOT NULL CHECK (amount >= 0),
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL CHECK (length(name) > 0),
    created_at TEXT DEFAULT (datetime('now')),

    UNIQUE(user_id, name)
);

-- Expenses go away with their category (deletion is guarded at the API)
CREATE TABLE IF NOT EXISTS expenses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    note TEXT NOT NULL,
    amount REAL NOT NULL CHECK (amount > 0),
    spent_at TEXT NOT NULL,                -- YYYY-MM-DD
    created_at TEXT DEFAULT (datetime('now'))
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_categories_user ON categories(user_id, created_at);
CREATE INDEX IF NOT EXISTS idx_expenses_user_spent ON expenses(user_id, spent_at);
CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category_id);
"#;
