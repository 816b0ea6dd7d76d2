use std::sync::Arc;

use super::middleware::AuthError;
use crate::error::Error;
use crate::server::AppState;

/// Extracts the token from an `Authorization: Bearer <token>` header value.
/// Any other scheme, or an empty token, yields `None`.
#[must_use]
pub fn extract_bearer_token(auth_header: Option<&str>) -> Option<&str> {
    let token = auth_header?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

/// Verifies a raw token and confirms its subject still exists.
pub fn authenticate(state: &Arc<AppState>, raw_token: &str) -> Result<i64, AuthError> {
    let user_id = state.tokens.verify(raw_token).map_err(|e| match e {
        Error::TokenExpired => AuthError::TokenExpired,
        _ => AuthError::InvalidToken,
    })?;

    let user = state.store.get_user(user_id).map_err(|e| {
        tracing::error!("Failed to load user {user_id} for token: {e}");
        AuthError::InternalError
    })?;

    if user.is_none() {
        tracing::warn!("Rejected token for unknown user {user_id}");
        return Err(AuthError::InvalidToken);
    }

    Ok(user_id)
}
