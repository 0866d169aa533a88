use std::sync::Arc;

use axum::{
    Json, Router,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use serde::Serialize;
use zenban_core::BoardError;

use crate::state::AppState;

mod columns;
mod tasks;

/// Shared state handle passed to every handler.
pub type SharedState = Arc<AppState>;

/// REST API routes.
///
///   GET    /                             -> API status
///   GET    /api/columns                  -> all columns, by position
///   POST   /api/columns                  -> create column at the end
///   PUT    /api/columns/{id}             -> update title/color/slider
///   DELETE /api/columns/{id}             -> delete, tasks move to lowest-id survivor
///   PUT    /api/columns/{id}/move        -> move to `{position}`
///   GET    /api/tasks                    -> all tasks, in board order
///   POST   /api/tasks                    -> create task at the end of its column
///   GET    /api/tasks/column/{column_id} -> one column's tasks, by position
///   PUT    /api/tasks/{id}               -> update content fields
///   DELETE /api/tasks/{id}               -> delete and compact its column
///   PUT    /api/tasks/{id}/move          -> move to `{columnId, position}`
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(status))
        .route(
            "/api/columns",
            get(columns::list_columns).post(columns::create_column),
        )
        .route(
            "/api/columns/{id}",
            put(columns::update_column).delete(columns::delete_column),
        )
        .route(
            "/api/columns/{id}/move",
            put(columns::move_column),
        )
        .route("/api/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route("/api/tasks/column/{column_id}", get(tasks::list_tasks_in_column))
        .route(
            "/api/tasks/{id}",
            put(tasks::update_task).delete(tasks::delete_task),
        )
        .route("/api/tasks/{id}/move", put(tasks::move_task))
}

async fn status() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Kanban API is running" }))
}

// ── Errors ──────────────────────────────────────────────────────────────

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Errors returned by request handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be decoded or failed validation.
    #[error("{message}: {}", .errors.join("; "))]
    BadRequest {
        message: &'static str,
        errors: Vec<String>,
    },
    /// The board rejected the operation.
    #[error(transparent)]
    Board(#[from] BoardError),
}

impl ApiError {
    fn bad_request(message: &'static str, error: impl ToString) -> Self {
        Self::BadRequest {
            message,
            errors: vec![error.to_string()],
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Board(e) => match e {
                BoardError::Validation(_) | BoardError::InvalidPosition { .. } => {
                    StatusCode::BAD_REQUEST
                }
                BoardError::ColumnNotFound(_) | BoardError::TaskNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                BoardError::LastColumnHasTasks { .. } => StatusCode::CONFLICT,
                BoardError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "request failed");
        } else {
            tracing::warn!(status = %status, error = %self, "request rejected");
        }

        let body = match self {
            Self::BadRequest { message, errors } => ErrorResponse {
                message: message.to_string(),
                errors,
            },
            Self::Board(e) if !e.is_client_error() => ErrorResponse {
                message: "Internal server error".to_string(),
                errors: Vec::new(),
            },
            Self::Board(e) => ErrorResponse {
                message: e.to_string(),
                errors: Vec::new(),
            },
        };
        (status, Json(body)).into_response()
    }
}

// ── Extraction helpers ──────────────────────────────────────────────────

/// Unwraps a JSON body, turning any rejection into a 400 with `message`.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>, message: &'static str) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::bad_request(message, rejection.body_text()))
}

/// Unwraps a path parameter, turning any rejection into a 400.
fn path_param<T>(
    param: Result<axum::extract::Path<T>, PathRejection>,
) -> Result<T, ApiError> {
    param
        .map(|axum::extract::Path(value)| value)
        .map_err(|rejection| ApiError::bad_request("Invalid id", rejection.body_text()))
}
