use super::mocks::MockGenerativeClient;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use datagen_gemini::{
    llm::GenerativeClient,
    pool::ClientPool,
    server::{AppState, SharedClientPool, build_router},
};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tower::ServiceExt; // for `oneshot`

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Pool whose factory hands out clones of `mock`, warmed with one client.
pub fn create_test_pool(mock: &MockGenerativeClient) -> SharedClientPool {
    let mock = mock.clone();
    let pool = ClientPool::new(move || Ok(Box::new(mock.clone()) as Box<dyn GenerativeClient>));
    pool.warm(1).unwrap();
    Arc::new(pool)
}

pub fn create_test_app(mock: &MockGenerativeClient, timeout: Duration) -> (Router, SharedClientPool) {
    let pool = create_test_pool(mock);
    let state = AppState {
        pool: Arc::clone(&pool),
        context_timeout: timeout,
    };
    (build_router(state), pool)
}

pub fn json_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

/// Sends a request and returns the status with the decoded JSON body.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

/// Same as [`send`] but keeps the raw body text.
pub async fn send_raw(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}
