use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::{RangeParams, SummaryResponse};
use crate::server::extract::ApiQuery;
use crate::server::response::{ApiError, StoreResultExt};
use crate::types::today;

pub async fn get_summary(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<RangeParams>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let range = params.resolve(today());

    let total = store.sum_expenses(auth.user_id, &range).unwrap_or_else(|e| {
        tracing::warn!("Failed to sum expenses for user {}: {e}", auth.user_id);
        0.0
    });

    let categories = store
        .category_sums(auth.user_id, &range)
        .api_err("db error")?;

    Ok::<_, ApiError>(Json(SummaryResponse { total, categories }))
}
