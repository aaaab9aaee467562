use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use vendorhub_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses
/// of the form `{ "error", "code", "title" }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `vendorhub_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, title, message) = match &self {
            AppError::Core(core) => {
                let (status, code) = match core {
                    CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                    CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                    CoreError::Storage(_) => (StatusCode::BAD_GATEWAY, "STORAGE_ERROR"),
                    CoreError::Upload(_) => (StatusCode::BAD_GATEWAY, "UPLOAD_ERROR"),
                    CoreError::Internal(msg) => {
                        tracing::error!(error = %msg, "Internal core error");
                        return internal_response();
                    }
                };
                if status.is_server_error() {
                    tracing::error!(error = %core, "Request failed");
                }
                (status, code, core.title(), core.detail())
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                "Bad request",
                msg.clone(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                return internal_response();
            }
        };

        let body = json!({
            "error": message,
            "code": code,
            "title": title,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 500 with a sanitized message.
fn internal_response() -> Response {
    let body = json!({
        "error": "An internal error occurred",
        "code": "INTERNAL_ERROR",
        "title": "Something went wrong",
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
}
