use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::{BudgetSummaryResponse, SetBudgetRequest};
use crate::server::extract::ApiJson;
use crate::server::response::{ApiError, StoreResultExt, message};
use crate::server::validation::validate_budget_amount;
use crate::types::{DateRange, today};

/// Budget versus spending for the current month.
///
/// The two reads are independent; either failing counts as zero rather than
/// failing the request.
pub async fn get_budget(auth: RequireUser, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = state.store.as_ref();
    let month = DateRange::month_of(today());

    let spent = store.sum_expenses(auth.user_id, &month).unwrap_or_else(|e| {
        tracing::warn!("Failed to sum expenses for user {}: {e}", auth.user_id);
        0.0
    });

    let budget = match store.get_budget(auth.user_id) {
        Ok(budget) => budget.map_or(0.0, |b| b.amount),
        Err(e) => {
            tracing::warn!("Failed to load budget for user {}: {e}", auth.user_id);
            0.0
        }
    };

    Json(BudgetSummaryResponse {
        budget,
        spent,
        remaining: budget - spent,
    })
}

pub async fn set_budget(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SetBudgetRequest>,
) -> impl IntoResponse {
    let amount = validate_budget_amount(req.amount)?;

    state
        .store
        .upsert_budget(auth.user_id, amount)
        .api_err("db error")?;

    Ok::<_, ApiError>(message("saved"))
}
