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
use crate::server::dto::{CategoryRequest, DeleteCategoryParams};
use crate::server::extract::{ApiJson, ApiQuery};
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt, message};
use crate::server::validation::{parse_id, validate_category_name};

pub async fn list_categories(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let categories = state
        .store
        .list_categories(auth.user_id)
        .api_err("db error")?;

    Ok::<_, ApiError>(Json(categories))
}

pub async fn create_category(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> impl IntoResponse {
    let name = validate_category_name(&req.name)?;

    let category = match state.store.create_category(auth.user_id, &name) {
        Ok(category) => category,
        Err(Error::AlreadyExists) => return Err(ApiError::conflict("category exists")),
        Err(e) => {
            tracing::error!("Failed to create category: {e}");
            return Err(ApiError::internal("db error"));
        }
    };

    Ok::<_, ApiError>((StatusCode::CREATED, Json(category)))
}

pub async fn rename_category(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> impl IntoResponse {
    let id = parse_id(&id)?;
    let name = validate_category_name(&req.name)?;

    match state.store.rename_category(auth.user_id, id, &name) {
        Ok(true) => {}
        Ok(false) => return Err(ApiError::not_found("not found")),
        Err(Error::AlreadyExists) => return Err(ApiError::conflict("category exists")),
        Err(e) => {
            tracing::error!("Failed to rename category {id}: {e}");
            return Err(ApiError::internal("db error"));
        }
    }

    Ok::<_, ApiError>(message("updated"))
}

/// Deletes a category. One that still has expenses is only removed, along
/// with its expenses, when `?force=true` is given.
pub async fn delete_category(
    auth: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiQuery(params): ApiQuery<DeleteCategoryParams>,
) -> impl IntoResponse {
    let id = parse_id(&id)?;
    let store = state.store.as_ref();
    let force = params.force == Some(true);

    if !store
        .delete_category(auth.user_id, id, force)
        .api_err("db error")?
    {
        // Nothing was deleted: either the category is not ours, or it still
        // has expenses and `force` was not given.
        store
            .get_category(auth.user_id, id)
            .api_err("db error")?
            .or_not_found("not found")?;

        return Err(ApiError::conflict(
            "category has expenses. Use ?force=true to delete them too",
        ));
    }

    Ok::<_, ApiError>(message("deleted"))
}
