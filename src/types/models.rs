use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::DateRange;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub user_id: i64,
    pub amount: f64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(skip)]
    pub user_id: i64,
    pub name: String,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    #[serde(skip)]
    pub user_id: i64,
    pub category_id: i64,
    pub note: String,
    pub amount: f64,
    #[serde(with = "calendar_date")]
    pub spent_at: NaiveDate,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

/// Validated fields for creating or replacing an expense.
#[derive(Debug, Clone)]
pub struct ExpenseInput {
    pub category_id: i64,
    pub note: String,
    pub amount: f64,
    pub spent_at: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct ExpenseFilter {
    pub category_id: Option<i64>,
    pub range: DateRange,
}

/// Spending attributed to one category over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySum {
    pub id: i64,
    pub name: String,
    pub sum: f64,
}

/// Calendar dates on the wire and in the database: exactly `YYYY-MM-DD`.
///
/// Dates are stored and compared as text, so only the fixed-width form with
/// a four-digit year is accepted.
pub mod calendar_date {
    use chrono::{Datelike, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d";

    /// Parses a strict `YYYY-MM-DD` date. Signed or extended years and
    /// unpadded fields are rejected, as is year zero.
    #[must_use]
    pub fn parse(s: &str) -> Option<NaiveDate> {
        let fixed_width = s.len() == 10
            && s.bytes().enumerate().all(|(i, b)| match i {
                4 | 7 => b == b'-',
                _ => b.is_ascii_digit(),
            });
        if !fixed_width {
            return None;
        }

        NaiveDate::parse_from_str(s, FORMAT)
            .ok()
            .filter(|date| date.year() >= 1)
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {s}")))
    }
}
