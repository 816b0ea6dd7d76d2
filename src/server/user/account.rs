use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::{ChangePasswordRequest, ProfileResponse};
use crate::server::extract::ApiJson;
use crate::server::response::{ApiError, StoreResultExt, message};
use crate::server::validation::validate_password;

pub async fn me(auth: RequireUser, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let user = state
        .store
        .get_user(auth.user_id)
        .api_err("db error")?
        .ok_or_else(|| ApiError::internal("db error"))?;

    Ok::<_, ApiError>(Json(ProfileResponse { email: user.email }))
}

pub async fn change_password(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> impl IntoResponse {
    validate_password(&req.new_password)?;

    let user = state
        .store
        .get_user(auth.user_id)
        .api_err("db error")?
        .ok_or_else(|| ApiError::internal("db error"))?;

    let matches = state
        .hasher
        .verify(&req.old_password, &user.password_hash)
        .map_err(|e| {
            tracing::error!("Stored hash for user {} is unusable: {e}", user.id);
            ApiError::internal("hash error")
        })?;
    if !matches {
        return Err(ApiError::unauthorized("wrong password"));
    }

    let new_hash = state.hasher.hash(&req.new_password).map_err(|e| {
        tracing::error!("Failed to hash password: {e}");
        ApiError::internal("hash error")
    })?;

    state
        .store
        .update_user_password(user.id, &new_hash)
        .api_err("db error")?;

    tracing::info!(user_id = user.id, "Password changed");

    Ok::<_, ApiError>(message("password updated"))
}
