use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::error::Error;
use crate::server::AppState;
use crate::server::dto::{LoginRequest, LoginResponse, RegisterRequest};
use crate::server::extract::ApiJson;
use crate::server::response::{ApiError, StoreResultExt, message};
use crate::server::validation::{normalize_email, validate_password};

const INVALID_CREDENTIALS: &str = "invalid credentials";

pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> impl IntoResponse {
    let email = normalize_email(&req.email)?;
    validate_password(&req.password)?;

    let password_hash = state.hasher.hash(&req.password).map_err(|e| {
        tracing::error!("Failed to hash password: {e}");
        ApiError::internal("hash error")
    })?;

    match state.store.create_user(&email, &password_hash) {
        Ok(user) => {
            tracing::info!(user_id = user.id, "Registered user");
            Ok::<_, ApiError>((StatusCode::CREATED, message("registered")))
        }
        Err(Error::AlreadyExists) => Err(ApiError::conflict("email already exists")),
        Err(e) => {
            tracing::error!("Failed to create user: {e}");
            Err(ApiError::internal("db error"))
        }
    }
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> impl IntoResponse {
    let email = normalize_email(&req.email)?;

    let Some(user) = state
        .store
        .get_user_by_email(&email)
        .api_err("db error")?
    else {
        state.hasher.verify_dummy(&req.password);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let valid = state
        .hasher
        .verify(&req.password, &user.password_hash)
        .map_err(|e| {
            tracing::error!("Stored hash for user {} is unusable: {e}", user.id);
            ApiError::internal("hash error")
        })?;

    if !valid {
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = state.tokens.issue(user.id).map_err(|e| {
        tracing::error!("Failed to sign token: {e}");
        ApiError::internal("token error")
    })?;

    Ok::<_, ApiError>(Json(LoginResponse { token }))
}
