use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn get_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

fn map_unique(err: rusqlite::Error) -> Error {
    if is_unique_violation(&err) {
        Error::AlreadyExists
    } else {
        Error::from(err)
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
    })
}

fn budget_from_row(row: &Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        user_id: row.get(0)?,
        amount: row.get(1)?,
        updated_at: parse_datetime(&row.get::<_, String>(2)?),
    })
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
    })
}

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        note: row.get(3)?,
        amount: row.get(4)?,
        spent_at: get_date(row, 5)?,
        created_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // User operations

    fn create_user(&self, email: &str, password_hash: &str) -> Result<User> {
        self.conn()
            .query_row(
                "INSERT INTO users (email, password_hash, created_at) VALUES (?1, ?2, ?3)
                 RETURNING id, email, password_hash, created_at",
                params![email, password_hash, format_datetime(&Utc::now())],
                user_from_row,
            )
            .map_err(map_unique)
    }

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = ?1",
            params![id],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = ?1",
            params![email],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn update_user_password(&self, id: i64, password_hash: &str) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE users SET password_hash = ?1 WHERE id = ?2",
            params![password_hash, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // Budget operations

    fn upsert_budget(&self, user_id: i64, amount: f64) -> Result<Budget> {
        self.conn()
            .query_row(
                "INSERT INTO budgets (user_id, amount, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT (user_id) DO UPDATE SET
                    amount = excluded.amount,
                    updated_at = excluded.updated_at
                 RETURNING user_id, amount, updated_at",
                params![user_id, amount, format_datetime(&Utc::now())],
                budget_from_row,
            )
            .map_err(Error::from)
    }

    fn get_budget(&self, user_id: i64) -> Result<Option<Budget>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT user_id, amount, updated_at FROM budgets WHERE user_id = ?1",
            params![user_id],
            budget_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    // Category operations

    fn create_category(&self, user_id: i64, name: &str) -> Result<Category> {
        self.conn()
            .query_row(
                "INSERT INTO categories (user_id, name, created_at) VALUES (?1, ?2, ?3)
                 RETURNING id, user_id, name, created_at",
                params![user_id, name, format_datetime(&Utc::now())],
                category_from_row,
            )
            .map_err(map_unique)
    }

    fn get_category(&self, user_id: i64, id: i64) -> Result<Option<Category>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, user_id, name, created_at FROM categories WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
            category_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_categories(&self, user_id: i64) -> Result<Vec<Category>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, name, created_at
             FROM categories WHERE user_id = ?1 ORDER BY created_at ASC, id ASC",
        )?;

        let rows = stmt.query_map(params![user_id], category_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn rename_category(&self, user_id: i64, id: i64, name: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute(
                "UPDATE categories SET name = ?1 WHERE id = ?2 AND user_id = ?3",
                params![name, id, user_id],
            )
            .map_err(map_unique)?;
        Ok(rows > 0)
    }

    fn delete_category(&self, user_id: i64, id: i64, force: bool) -> Result<bool> {
        // The expense check and the delete are one statement so an expense
        // recorded concurrently is never cascaded away without `force`.
        let rows = self.conn().execute(
            "DELETE FROM categories
             WHERE id = ?1 AND user_id = ?2
               AND (?3 OR NOT EXISTS (SELECT 1 FROM expenses WHERE category_id = ?1))",
            params![id, user_id, force],
        )?;
        Ok(rows > 0)
    }

    // Expense operations

    fn create_expense(&self, user_id: i64, input: &ExpenseInput) -> Result<Expense> {
        // The category must belong to the same user; otherwise nothing is inserted.
        self.conn()
            .query_row(
                "INSERT INTO expenses (user_id, category_id, note, amount, spent_at, created_at)
                 SELECT ?1, c.id, ?3, ?4, ?5, ?6 FROM categories c
                 WHERE c.id = ?2 AND c.user_id = ?1
                 RETURNING id, user_id, category_id, note, amount, spent_at, created_at",
                params![
                    user_id,
                    input.category_id,
                    input.note,
                    input.amount,
                    format_date(&input.spent_at),
                    format_datetime(&Utc::now()),
                ],
                expense_from_row,
            )
            .optional()?
            .ok_or(Error::NotFound)
    }

    fn list_expenses(&self, user_id: i64, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, category_id, note, amount, spent_at, created_at
             FROM expenses
             WHERE user_id = ?1
               AND (?2 IS NULL OR category_id = ?2)
               AND spent_at >= ?3 AND spent_at <= ?4
             ORDER BY spent_at DESC, id DESC",
        )?;

        let rows = stmt.query_map(
            params![
                user_id,
                filter.category_id,
                format_date(&filter.range.first_day()),
                format_date(&filter.range.last_day()),
            ],
            expense_from_row,
        )?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_expense(&self, user_id: i64, id: i64, input: &ExpenseInput) -> Result<bool> {
        let rows = self.conn().execute(
            "UPDATE expenses SET category_id = ?1, note = ?2, amount = ?3, spent_at = ?4
             WHERE id = ?5 AND user_id = ?6
               AND EXISTS (SELECT 1 FROM categories WHERE id = ?1 AND user_id = ?6)",
            params![
                input.category_id,
                input.note,
                input.amount,
                format_date(&input.spent_at),
                id,
                user_id,
            ],
        )?;
        Ok(rows > 0)
    }

    fn delete_expense(&self, user_id: i64, id: i64) -> Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM expenses WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }

    // Aggregation

    fn sum_expenses(&self, user_id: i64, range: &DateRange) -> Result<f64> {
        let conn = self.conn();
        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM expenses
             WHERE user_id = ?1 AND spent_at >= ?2 AND spent_at <= ?3",
            params![
                user_id,
                format_date(&range.first_day()),
                format_date(&range.last_day()),
            ],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    fn category_sums(&self, user_id: i64, range: &DateRange) -> Result<Vec<CategorySum>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT c.id, c.name, COALESCE(SUM(e.amount), 0.0) AS sum
             FROM categories c
             LEFT JOIN expenses e
               ON e.category_id = c.id AND e.user_id = c.user_id
              AND e.spent_at >= ?2 AND e.spent_at <= ?3
             WHERE c.user_id = ?1
             GROUP BY c.id, c.name
             ORDER BY c.created_at ASC, c.id ASC",
        )?;

        let rows = stmt.query_map(
            params![
                user_id,
                format_date(&range.first_day()),
                format_date(&range.last_day()),
            ],
            |row| {
                Ok(CategorySum {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    sum: row.get(2)?,
                })
            },
        )?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}
