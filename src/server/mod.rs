//! HTTP API over the vocabulary store.
//!
//! Handlers are thin: each resolves its request into typed arguments, runs one
//! blocking store call on the blocking thread pool, and maps the outcome to
//! JSON.

mod extract;
mod handlers;

use crate::error::PortalError;
use crate::store::Database;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

/// Shared application state.
pub struct AppState {
    pub db: Database,
}

/// Build the API router for `db`.
pub fn router(db: Database, cors: bool) -> Router {
    let state = Arc::new(AppState { db });

    let api = Router::new()
        .route("/words", get(handlers::list_words))
        .route("/words/{id}", get(handlers::get_word))
        .route("/groups", get(handlers::list_groups))
        .route("/groups/{id}", get(handlers::get_group))
        .route("/groups/{id}/words/raw", get(handlers::group_words_raw))
        .route("/study_activities", get(handlers::list_activities))
        .route("/study_activities/{id}", get(handlers::get_activity))
        .route(
            "/study_activities/{id}/sessions",
            get(handlers::activity_sessions),
        )
        .route(
            "/study_sessions",
            get(handlers::list_sessions).post(handlers::create_session),
        )
        .route("/study_sessions/{id}", get(handlers::get_session))
        .route("/study_sessions/{id}/review", post(handlers::record_review))
        .route("/dashboard/last_study_session", get(handlers::last_session))
        .route("/dashboard/study_progress", get(handlers::study_progress))
        .route("/dashboard/quick_stats", get(handlers::quick_stats));

    let app = Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors {
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        app
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// An error on its way to becoming an HTTP response.
#[derive(Debug)]
pub enum ApiError {
    /// A store operation failed.
    Store(PortalError),
    /// The request could not be decoded; keeps axum's status and message.
    Rejected { status: StatusCode, message: String },
}

impl From<PortalError> for ApiError {
    fn from(err: PortalError) -> Self {
        Self::Store(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Store(err) => {
                let status = match &err {
                    PortalError::NotFound { .. } => StatusCode::NOT_FOUND,
                    PortalError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                    other => {
                        error!("Request failed: {}", other);
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.to_string())
            }
            ApiError::Rejected { status, message } => (status, message),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Run a store call on the blocking pool.
async fn blocking<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db = state.db.clone();
    let result = tokio::task::spawn_blocking(move || f(&db))
        .await
        .map_err(|e| PortalError::Internal(e.to_string()))?;
    Ok(result?)
}
