use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{CategorySum, DateRange};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct SetBudgetRequest {
    #[serde(default)]
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct BudgetSummaryResponse {
    pub budget: f64,
    pub spent: f64,
    pub remaining: f64,
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteCategoryParams {
    #[serde(default)]
    pub force: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ExpenseRequest {
    #[serde(default)]
    pub category_id: i64,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub spent_at: String,
}

/// `?range=today|week|month` or `?start=YYYY-MM-DD&end=YYYY-MM-DD`.
#[derive(Debug, Default, Deserialize)]
pub struct RangeParams {
    pub range: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl RangeParams {
    #[must_use]
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        DateRange::resolve(
            self.range.as_deref(),
            self.start.as_deref(),
            self.end.as_deref(),
            today,
        )
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListExpensesParams {
    pub category_id: Option<i64>,
    pub range: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl ListExpensesParams {
    #[must_use]
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        DateRange::resolve(
            self.range.as_deref(),
            self.start.as_deref(),
            self.end.as_deref(),
            today,
        )
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub total: f64,
    pub categories: Vec<CategorySum>,
}
