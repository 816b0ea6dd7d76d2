mod accounts;

use std::sync::Arc;

use axum::{Router, routing::post};

use crate::server::AppState;

pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(accounts::register))
        .route("/auth/login", post(accounts::login))
}
