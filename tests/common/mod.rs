// Shared fixtures for the integration tests

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response};
use prepwise_session::records::User;
use prepwise_session::{create_router, AppState, MemoryStore, PagePaths, TokenIssuer};
use serde_json::Value;

pub const API_KEY: &str = "devkey";
pub const API_SECRET: &str = "devsecret-for-integration-tests";
pub const SESSION: &str = "session-ada";

pub fn issuer() -> TokenIssuer {
    TokenIssuer::new(Some(API_KEY.to_string()), Some(API_SECRET.to_string()))
}

pub fn ada() -> User {
    User {
        id: "user-ada".to_string(),
        name: "Ada".to_string(),
    }
}

pub async fn store_with_ada() -> MemoryStore {
    let store = MemoryStore::new();
    store.add_session(SESSION, ada()).await;
    store
}

pub fn router(issuer: TokenIssuer, store: MemoryStore) -> axum::Router {
    create_router(AppState::in_memory(issuer, store, PagePaths::default()))
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str, session: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(session) = session {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", session));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
