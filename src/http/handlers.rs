use super::state::AppState;
use crate::pages::{FeedbackSubmission, PageOutcome};
use crate::records::{StoreError, User};
use crate::token::CredentialRequest;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponseBody {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

fn store_failure(e: StoreError) -> Response {
    match e {
        StoreError::FeedbackNotFound(_) => {
            warn!("{}", e);
            error_response(StatusCode::NOT_FOUND, e.to_string())
        }
        StoreError::Unavailable(_) => {
            error!("Record store failure: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn render<T: Serialize>(outcome: PageOutcome<T>) -> Response {
    match outcome {
        PageOutcome::Render(page) => (StatusCode::OK, Json(page)).into_response(),
        PageOutcome::Redirect(to) => Redirect::to(&to).into_response(),
    }
}

/// Session credential from `Authorization: Bearer` or the `session` cookie
fn session_credential(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_string());
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == "session")
        .map(|(_, value)| value.to_string())
}

async fn current_user(state: &AppState, headers: &HeaderMap) -> Result<Option<User>, StoreError> {
    let session = session_credential(headers);
    state.users.current_user(session.as_deref()).await
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/livekit/token
/// Issue an access token for one room
pub async fn issue_token(
    State(state): State<AppState>,
    payload: Result<Json<CredentialRequest>, JsonRejection>,
) -> Response {
    // Configuration errors take precedence over anything in the body
    if let Err(e) = state.issuer.credentials() {
        error!("Token service misconfigured: {}", e);
        return error_response(e.status_code(), e.to_string());
    }

    let Json(req) = match payload {
        Ok(req) => req,
        Err(rejection) => {
            warn!("Rejecting malformed token request: {}", rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    match state.issuer.issue(&req) {
        Ok(issued) => (
            StatusCode::OK,
            Json(TokenResponseBody {
                token: issued.token,
            }),
        )
            .into_response(),
        Err(e) => {
            if !e.is_client_error() {
                error!("Failed to issue token: {}", e);
            }
            error_response(e.status_code(), e.to_string())
        }
    }
}

/// GET /interview
/// Create-flow page
pub async fn create_interview_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match current_user(&state, &headers).await {
        Ok(user) => render(state.pages.create_page(user)),
        Err(e) => store_failure(e),
    }
}

/// GET /interview/:interview_id
/// Conduct-flow page
pub async fn conduct_interview_page(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let user = match current_user(&state, &headers).await {
        Ok(user) => user,
        Err(e) => return store_failure(e),
    };

    match state.pages.conduct_page(user, &interview_id).await {
        Ok(outcome) => render(outcome),
        Err(e) => store_failure(e),
    }
}

/// POST /interview/:interview_id/feedback
/// Record feedback, then redirect to the feedback view
pub async fn submit_feedback(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
    headers: HeaderMap,
    submission: Option<Json<FeedbackSubmission>>,
) -> Response {
    let user = match current_user(&state, &headers).await {
        Ok(user) => user,
        Err(e) => return store_failure(e),
    };

    info!("Feedback submitted for interview {}", interview_id);

    let submission = submission.map(|Json(s)| s).unwrap_or_default();
    match state
        .pages
        .submit_feedback(user, &interview_id, submission)
        .await
    {
        Ok(outcome) => render(outcome),
        Err(e) => store_failure(e),
    }
}

/// GET /interview/:interview_id/feedback
/// Feedback view
pub async fn feedback_page(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let user = match current_user(&state, &headers).await {
        Ok(user) => user,
        Err(e) => return store_failure(e),
    };

    match state.pages.feedback_page(user, &interview_id).await {
        Ok(outcome) => render(outcome),
        Err(e) => store_failure(e),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
