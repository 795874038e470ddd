use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::matching::MatchError;
use crate::models::resume::UploadRejected;
use crate::workspace::SubmitRejected;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Matching error: {0}")]
    Matching(#[from] MatchError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<UploadRejected> for AppError {
    fn from(_: UploadRejected) -> Self {
        AppError::UnsupportedMediaType("Please upload a PDF, DOCX, or TXT file".to_string())
    }
}

impl From<SubmitRejected> for AppError {
    fn from(e: SubmitRejected) -> Self {
        match e {
            SubmitRejected::MissingInformation => AppError::Validation(e.to_string()),
            SubmitRejected::InProgress => AppError::Conflict(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                msg.clone(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Matching(e) => {
                tracing::error!("Matching error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MATCHING_ERROR",
                    "Analysis failed. Please try again later".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_rejections_map_to_status() {
        let missing: AppError = SubmitRejected::MissingInformation.into();
        assert_eq!(missing.into_response().status(), StatusCode::BAD_REQUEST);

        let busy: AppError = SubmitRejected::InProgress.into();
        assert_eq!(busy.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_upload_rejection_is_415() {
        let err: AppError = UploadRejected::InvalidType("image/png".to_string()).into();
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let err = AppError::Internal(anyhow::anyhow!("secret detail"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
