//! Axum route handlers for the Session API.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Html,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeFormat, UploadedFile, ADVERTISED_MAX_BYTES};
use crate::sessions::{submit, Session};
use crate::state::AppState;
use crate::view::page::render_page;
use crate::view::SessionView;
use crate::workspace::notifications::Notification;

/// Multipart field carrying the resume.
const RESUME_FIELD: &str = "resume";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub name: String,
    pub format: ResumeFormat,
    pub content_type: &'static str,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct JobDescriptionRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct MatchAccepted {
    pub session_id: Uuid,
    pub status: &'static str,
}

async fn find_session(state: &AppState, id: Uuid) -> Result<Arc<Session>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session = state.sessions.create().await;
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: session.id,
        }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = find_session(&state, id).await?;
    let ws = session.workspace().await;
    Ok(Json(SessionView::new(id, &ws)))
}

/// DELETE /api/v1/sessions/:id
///
/// Tears the session down. A match still running for it is cancelled.
pub async fn handle_dispose_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.dispose(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}

/// POST /api/v1/sessions/:id/resume
///
/// Accepts a multipart `resume` field. The part's declared content type must
/// be PDF, DOCX or plain text; anything else leaves the stored file alone.
/// The advertised 10MB limit is not enforced. The body is counted as it
/// streams in and then discarded; only the file's metadata is kept.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let session = find_session(&state, id).await?;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or(RESUME_FIELD).to_string();
        let content_type = field.content_type().unwrap_or("").to_string();
        let mut size_bytes: u64 = 0;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?
        {
            size_bytes += chunk.len() as u64;
        }

        let mut ws = session.workspace().await;
        return match UploadedFile::new(name, &content_type, size_bytes) {
            Ok(file) => {
                if file.exceeds_advertised_limit() {
                    warn!(
                        session_id = %id,
                        size_bytes = file.size_bytes,
                        limit = ADVERTISED_MAX_BYTES,
                        "Accepting resume above advertised size limit"
                    );
                }
                info!(session_id = %id, resume = %file.name, "Resume selected");
                let response = UploadResponse {
                    name: file.name.clone(),
                    format: file.format,
                    content_type: file.format.mime(),
                    size_bytes: file.size_bytes,
                    uploaded_at: file.uploaded_at,
                };
                ws.select_file(file);
                Ok(Json(response))
            }
            Err(rejected) => {
                info!(session_id = %id, content_type = %content_type, "Resume rejected");
                ws.reject_file();
                Err(rejected.into())
            }
        };
    }

    Err(AppError::Validation(format!(
        "Missing '{RESUME_FIELD}' file field"
    )))
}

/// PUT /api/v1/sessions/:id/job-description
pub async fn handle_set_job_description(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<JobDescriptionRequest>,
) -> Result<StatusCode, AppError> {
    let session = find_session(&state, id).await?;
    session.workspace().await.set_job_description(request.text);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/sessions/:id/match
///
/// Starts a match and returns immediately. Poll the session view or the
/// notifications endpoint for the outcome.
pub async fn handle_start_match(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<MatchAccepted>), AppError> {
    let session = find_session(&state, id).await?;
    // The join handle is dropped; the session keeps the abort handle.
    let _ = submit(&session, state.matcher.clone()).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(MatchAccepted {
            session_id: id,
            status: "matching",
        }),
    ))
}

/// GET /api/v1/sessions/:id/notifications
///
/// Returns and clears the session's pending notifications, oldest first.
pub async fn handle_drain_notifications(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let session = find_session(&state, id).await?;
    let drained = session.workspace().await.drain_notifications();
    Ok(Json(drained))
}

/// GET /sessions/:id
pub async fn handle_session_page(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let session = find_session(&state, id).await?;
    let view = SessionView::new(id, &*session.workspace().await);
    let html = render_page(&view).map_err(|e| AppError::Internal(e.into()))?;
    Ok(Html(html))
}
