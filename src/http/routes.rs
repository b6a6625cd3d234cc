use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session tokens
        .route("/api/livekit/token", post(handlers::issue_token))
        // Interview pages
        .route("/interview", get(handlers::create_interview_page))
        .route("/interview/:interview_id", get(handlers::conduct_interview_page))
        .route(
            "/interview/:interview_id/feedback",
            get(handlers::feedback_page).post(handlers::submit_feedback),
        )
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
