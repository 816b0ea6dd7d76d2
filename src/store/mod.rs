mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
///
/// Every category, budget and expense operation takes the owning user id;
/// rows belonging to another user behave as if they did not exist.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // User operations
    fn create_user(&self, email: &str, password_hash: &str) -> Result<User>;
    fn get_user(&self, id: i64) -> Result<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    fn update_user_password(&self, id: i64, password_hash: &str) -> Result<()>;

    // Budget operations (one row per user)
    fn upsert_budget(&self, user_id: i64, amount: f64) -> Result<Budget>;
    fn get_budget(&self, user_id: i64) -> Result<Option<Budget>>;

    // Category operations
    fn create_category(&self, user_id: i64, name: &str) -> Result<Category>;
    fn get_category(&self, user_id: i64, id: i64) -> Result<Option<Category>>;
    fn list_categories(&self, user_id: i64) -> Result<Vec<Category>>;
    fn rename_category(&self, user_id: i64, id: i64, name: &str) -> Result<bool>;
    /// Deletes a category. Unless `force` is set, a category that still has
    /// expenses is left alone and `false` is returned. With `force`, its
    /// expenses go with it.
    fn delete_category(&self, user_id: i64, id: i64, force: bool) -> Result<bool>;

    // Expense operations
    fn create_expense(&self, user_id: i64, input: &ExpenseInput) -> Result<Expense>;
    fn list_expenses(&self, user_id: i64, filter: &ExpenseFilter) -> Result<Vec<Expense>>;
    fn update_expense(&self, user_id: i64, id: i64, input: &ExpenseInput) -> Result<bool>;
    fn delete_expense(&self, user_id: i64, id: i64) -> Result<bool>;

    // Aggregation
    fn sum_expenses(&self, user_id: i64, range: &DateRange) -> Result<f64>;
    fn category_sums(&self, user_id: i64, range: &DateRange) -> Result<Vec<CategorySum>>;

    fn close(&self) -> Result<()>;
}
