mod account;
mod budget;
mod categories;
mod expenses;
mod summary;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, put},
};

use crate::server::AppState;

pub fn user_router() -> Router<Arc<AppState>> {
    Router::new()
        // Profile
        .route("/me", get(account::me))
        .route("/auth/password", put(account::change_password))
        // Budget (one per user)
        .route("/budget", get(budget::get_budget).post(budget::set_budget))
        // Categories
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/{id}",
            put(categories::rename_category).delete(categories::delete_category),
        )
        // Aggregates
        .route("/summary", get(summary::get_summary))
        // Expenses
        .route(
            "/expenses",
            get(expenses::list_expenses).post(expenses::create_expense),
        )
        .route(
            "/expenses/{id}",
            put(expenses::update_expense).delete(expenses::delete_expense),
        )
}
