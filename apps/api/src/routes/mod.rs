pub mod health;
pub mod sessions;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Session API
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(sessions::handle_get_session).delete(sessions::handle_dispose_session),
        )
        .route(
            "/api/v1/sessions/:id/resume",
            post(sessions::handle_upload_resume),
        )
        .route(
            "/api/v1/sessions/:id/job-description",
            put(sessions::handle_set_job_description),
        )
        .route(
            "/api/v1/sessions/:id/match",
            post(sessions::handle_start_match),
        )
        .route(
            "/api/v1/sessions/:id/notifications",
            get(sessions::handle_drain_notifications),
        )
        // Server-rendered page
        .route("/sessions/:id", get(sessions::handle_session_page))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
