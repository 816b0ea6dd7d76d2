use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::http::{Method, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::get};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use super::public::public_router;
use super::user::user_router;
use crate::auth::{CredentialHasher, TokenIssuer};
use crate::store::Store;

const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenIssuer,
    pub hasher: CredentialHasher,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn Store>, jwt_secret: &str) -> Self {
        Self {
            store,
            tokens: TokenIssuer::new(jwt_secret.as_bytes()),
            hasher: CredentialHasher::new(),
        }
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(CORS_MAX_AGE)
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(public_router())
        .merge(user_router())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(log_request))
                .layer(cors_layer()),
        )
        .with_state(state)
}
