use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use spendwise::server::{AppState, create_router};
use spendwise::store::{SqliteStore, Store};

pub const TEST_SECRET: &str = "test-secret";
pub const PASSWORD: &str = "correct horse";

pub struct TestServer {
    pub temp_dir: TempDir,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestServer {
    pub fn start() -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let store = SqliteStore::new(temp_dir.path().join("spendwise.db")).expect("open store");
        store.initialize().expect("initialize store");

        let state = Arc::new(AppState::new(Arc::new(store), TEST_SECRET));

        Self {
            temp_dir,
            router: create_router(state),
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json).expect("serialize body"))
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).expect("build request")).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    pub async fn register(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/auth/register",
            None,
            Some(serde_json::json!({ "email": email, "password": password })),
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        self.request(
            Method::POST,
            "/auth/login",
            None,
            Some(serde_json::json!({ "email": email, "password": password })),
        )
        .await
    }

    /// Registers a user and returns a session token for them.
    pub async fn user_token(&self, email: &str) -> String {
        let resp = self.register(email, PASSWORD).await;
        assert_eq!(resp.status, StatusCode::CREATED, "register {email}");

        let resp = self.login(email, PASSWORD).await;
        assert_eq!(resp.status, StatusCode::OK, "login {email}");
        resp.body["token"].as_str().expect("token").to_string()
    }

    /// Creates a category and returns its id.
    pub async fn category(&self, token: &str, name: &str) -> i64 {
        let resp = self
            .post("/categories", token, serde_json::json!({ "name": name }))
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "create category {name}");
        resp.body["id"].as_i64().expect("category id")
    }

    /// Records an expense and returns its id.
    pub async fn expense(
        &self,
        token: &str,
        category_id: i64,
        note: &str,
        amount: f64,
        spent_at: &str,
    ) -> i64 {
        let resp = self
            .post(
                "/expenses",
                token,
                serde_json::json!({
                    "category_id": category_id,
                    "note": note,
                    "amount": amount,
                    "spent_at": spent_at,
                }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED, "create expense {note}");
        resp.body["id"].as_i64().expect("expense id")
    }
}
