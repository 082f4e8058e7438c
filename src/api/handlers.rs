//! HTTP request handlers

use super::assets::{serve_page, serve_static};
use super::types::{
    CheckRequest, CreateSessionResponse, ErrorResponse, SessionResponse, StatusResponse,
    SuccessResponse, VerseRequest,
};
use super::AppState;
use crate::llm::LlmError;
use crate::session::SessionHandle;
use crate::shell::{Outcome, Shell};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

const CONFIG_HINT: &str = "Please make sure you have a .env file with your GEMINI_API_KEY.";

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_page))
        .route("/assets/*path", get(serve_static))
        .route("/api/status", get(get_status))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(end_session))
        .route("/api/sessions/:id/verse", post(get_verse_and_explanation))
        .route("/api/sessions/:id/check", post(check_explanation))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Status and sessions
// ============================================================

async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(match &state.shell {
        Ok(shell) => StatusResponse {
            ready: true,
            model: Some(shell.model_id().to_string()),
            error: None,
            hint: None,
        },
        Err(e) => StatusResponse {
            ready: false,
            model: None,
            error: Some(format!("Error configuring the Gemini API: {e}")),
            hint: Some(CONFIG_HINT.to_string()),
        },
    })
}

async fn create_session(State(state): State<AppState>) -> Json<CreateSessionResponse> {
    let (session_id, created_at) = state.sessions.create().await;
    Json(CreateSessionResponse {
        session_id,
        created_at,
        idle_ttl_secs: state.sessions.idle_ttl().as_secs(),
    })
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let handle = lookup(&state, id).await?;
    let ctx = handle.lock().await;
    Ok(Json(SessionResponse {
        session_id: id,
        created_at: state.sessions.created_at(&id).await,
        verse_text: ctx.verse_text.clone(),
        explanation: ctx.explanation.clone(),
    }))
}

async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuccessResponse>, AppError> {
    if state.sessions.remove(&id).await {
        Ok(Json(SuccessResponse { success: true }))
    } else {
        Err(AppError::NotFound(format!("Unknown session {id}")))
    }
}

// ============================================================
// Actions
// ============================================================

async fn get_verse_and_explanation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    req: Result<Json<VerseRequest>, JsonRejection>,
) -> Result<Json<Outcome>, AppError> {
    let Json(req) = req?;
    let shell = configured(&state)?;
    let handle = lookup(&state, id).await?;
    let mut ctx = handle.lock().await;

    let outcome = shell
        .get_verse_and_explanation(&mut ctx, &req.reference)
        .await?;
    log_outcome(id, "verse", &outcome);
    Ok(Json(outcome))
}

async fn check_explanation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    req: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Json<Outcome>, AppError> {
    let Json(req) = req?;
    let shell = configured(&state)?;
    let handle = lookup(&state, id).await?;
    let mut ctx = handle.lock().await;

    let outcome = shell
        .check_explanation(&mut ctx, &req.reference, &req.explanation)
        .await?;
    log_outcome(id, "check", &outcome);
    Ok(Json(outcome))
}

fn configured(state: &AppState) -> Result<&Shell, AppError> {
    state
        .shell
        .as_ref()
        .map_err(|e| AppError::Unavailable(format!("Error configuring the Gemini API: {e}")))
}

async fn lookup(state: &AppState, id: Uuid) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Unknown session {id}")))
}

fn log_outcome(id: Uuid, action: &str, outcome: &Outcome) {
    match outcome {
        Outcome::Warning { message } => {
            tracing::info!(session_id = %id, action, warning = %message, "Action rejected");
        }
        Outcome::Verse { .. } | Outcome::Verdict { .. } => {
            tracing::info!(session_id = %id, action, "Action completed");
        }
    }
}

async fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
    Unavailable(String),
    Upstream(LlmError),
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::Upstream(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::new(msg)),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::new(msg)),
            AppError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, ErrorResponse::new(msg))
            }
            AppError::Upstream(e) => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse::new(e.message).with_kind(e.kind.as_str()),
            ),
        };

        (status, Json(body)).into_response()
    }
}
