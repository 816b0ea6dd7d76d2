use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireUser;
use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{ExpenseRequest, ListExpensesParams};
use crate::server::extract::{ApiJson, ApiQuery};
use crate::server::response::{ApiError, StoreResultExt, message};
use crate::server::validation::{parse_id, validate_expense};
use crate::types::{ExpenseFilter, today};

const UNKNOWN_CATEGORY: &str = "category not found";

pub async fn list_expenses(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListExpensesParams>,
) -> impl IntoResponse {
    let filter = ExpenseFilter {
        category_id: params.category_id,
        range: params.resolve(today()),
    };

    let expenses = state
        .store
        .list_expenses(auth.user_id, &filter)
        .api_err("db error")?;

    Ok::<_, ApiError>(Json(expenses))
}

pub async fn create_expense(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ExpenseRequest>,
) -> impl IntoResponse {
    let input = validate_expense(req)?;

    let expense = match state.store.create_expense(auth.user_id, &input) {
        Ok(expense) => expense,
        Err(Error::NotFound) => return Err(ApiError::bad_request(UNKNOWN_CATEGORY)),
        Err(e) => {
            tracing::error!("Failed to create expense: {e}");
            return Err(ApiError::internal("db error"));
        }
    };

    Ok::<_, ApiError>((StatusCode::CREATED, Json(expense)))
}

pub async fn update_expense(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ExpenseRequest>,
) -> impl IntoResponse {
    let id = parse_id(&id)?;
    let input = validate_expense(req)?;
    let store = state.store.as_ref();

    if store
        .get_category(auth.user_id, input.category_id)
        .api_err("db error")?
        .is_none()
    {
        return Err(ApiError::bad_request(UNKNOWN_CATEGORY));
    }

    if !store
        .update_expense(auth.user_id, id, &input)
        .api_err("db error")?
    {
        return Err(ApiError::not_found("not found"));
    }

    Ok::<_, ApiError>(message("updated"))
}

pub async fn delete_expense(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id = parse_id(&id)?;

    if !state
        .store
        .delete_expense(auth.user_id, id)
        .api_err("db error")?
    {
        return Err(ApiError::not_found("not found"));
    }

    Ok::<_, ApiError>(message("deleted"))
}
