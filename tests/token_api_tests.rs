// Integration tests for POST /api/livekit/token
//
// Tokens are verified with the LiveKit SDK's own verifier so the checks
// cover what a LiveKit server would see.

mod common;

use axum::http::StatusCode;
use common::*;
use livekit_api::access_token::TokenVerifier;
use prepwise_session::{MemoryStore, SessionMetadata, TokenIssuer};
use tower::ServiceExt;

fn verifier() -> TokenVerifier {
    TokenVerifier::with_api_key(API_KEY, API_SECRET)
}

#[tokio::test]
async fn test_valid_request_returns_token() {
    let app = router(issuer(), MemoryStore::new());

    let response = app
        .oneshot(post_json("/api/livekit/token", r#"{"roomName":"r1","userId":"u1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let token = body["token"].as_str().unwrap();
    assert!(!token.is_empty());

    let claims = verifier().verify(token).unwrap();
    assert_eq!(claims.sub, "u1");
    assert_eq!(claims.video.room, "r1");
    assert!(claims.video.room_join);
    assert!(claims.video.can_publish);
    assert!(claims.video.can_subscribe);
}

#[tokio::test]
async fn test_token_lives_thirty_minutes() {
    let app = router(issuer(), MemoryStore::new());

    let response = app
        .oneshot(post_json("/api/livekit/token", r#"{"roomName":"r1","userId":"u1"}"#))
        .await
        .unwrap();
    let body = json_body(response).await;

    let claims = verifier().verify(body["token"].as_str().unwrap()).unwrap();
    // nbf and exp are whole seconds, so allow the clock to tick once
    assert!(claims.exp.abs_diff(claims.nbf + 30 * 60) <= 1);
}

#[tokio::test]
async fn test_metadata_mode_defaults_to_create() {
    let app = router(issuer(), MemoryStore::new());

    let response = app
        .oneshot(post_json("/api/livekit/token", r#"{"roomName":"r1","userId":"u1"}"#))
        .await
        .unwrap();
    let body = json_body(response).await;

    let claims = verifier().verify(body["token"].as_str().unwrap()).unwrap();
    let metadata: SessionMetadata = serde_json::from_str(&claims.metadata).unwrap();
    assert_eq!(metadata.mode, prepwise_session::Mode::Create);
    assert_eq!(metadata.user_id.as_deref(), Some("u1"));
    assert_eq!(metadata.interview_id, None);
}

#[tokio::test]
async fn test_metadata_carries_conduct_mode_and_interview() {
    let app = router(issuer(), MemoryStore::new());

    let response = app
        .oneshot(post_json(
            "/api/livekit/token",
            r#"{"roomName":"r2","userId":"u1","mode":"conduct","interviewId":"i-9"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    let claims = verifier().verify(body["token"].as_str().unwrap()).unwrap();
    let metadata: serde_json::Value = serde_json::from_str(&claims.metadata).unwrap();
    assert_eq!(metadata["mode"], "conduct");
    assert_eq!(metadata["interviewId"], "i-9");
    assert_eq!(metadata["userId"], "u1");
}

#[tokio::test]
async fn test_empty_room_name_is_rejected() {
    let app = router(issuer(), MemoryStore::new());

    let response = app
        .oneshot(post_json("/api/livekit/token", r#"{"roomName":"","userId":"u1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body, serde_json::json!({ "error": "roomName and userId are required" }));
}

#[tokio::test]
async fn test_missing_user_id_is_rejected() {
    let app = router(issuer(), MemoryStore::new());

    let response = app
        .oneshot(post_json("/api/livekit/token", r#"{"roomName":"r1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn test_malformed_body_is_client_error() {
    let app = router(issuer(), MemoryStore::new());

    let response = app
        .oneshot(post_json("/api/livekit/token", "not json"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_api_key_fails_before_validation() {
    let app = router(
        TokenIssuer::new(None, Some(API_SECRET.to_string())),
        MemoryStore::new(),
    );

    // The body is invalid too; the configuration error must win
    let response = app
        .oneshot(post_json("/api/livekit/token", r#"{"roomName":""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "LIVEKIT_API_KEY is not configured");
}

#[tokio::test]
async fn test_missing_api_secret_is_server_error() {
    let app = router(
        TokenIssuer::new(Some(API_KEY.to_string()), None),
        MemoryStore::new(),
    );

    let response = app
        .oneshot(post_json("/api/livekit/token", r#"{"roomName":"r1","userId":"u1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_health() {
    let app = router(issuer(), MemoryStore::new());
    let response = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
