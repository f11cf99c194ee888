use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use postforge_core::error::CoreError;
use postforge_db::error::StorageError;
use serde_json::json;

use crate::lifecycle::LifecycleError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StorageError`] for persistence
/// failures. Implements [`IntoResponse`] to produce consistent JSON error
/// responses of the form `{"error": ..., "code": ...}`; validation failures
/// add a `details` list of `{field, message}` objects.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `postforge_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A classified persistence error from `postforge_db`.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Invalid(errors) => AppError::Core(CoreError::InvalidSubmission(errors)),
            LifecycleError::NotFound(id) => AppError::Core(CoreError::NotFound {
                entity: "Campaign",
                id,
            }),
            LifecycleError::CreationFailed(err) | LifecycleError::Storage(err) => {
                AppError::Storage(err)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details = None;

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::InvalidSubmission(errors) => {
                    details = Some(json!(errors));
                    (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "VALIDATION_ERROR",
                        "Campaign submission is invalid".to_string(),
                    )
                }
            },

            // --- Storage errors ---
            AppError::Storage(err) => classify_storage_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Map a storage error onto an HTTP status, error code, and message.
///
/// - Missing references and CHECK violations are client errors (422).
/// - Unique violations map to 409.
/// - An unreachable database maps to 503 with a generic message.
/// - Everything else maps to 500 with a sanitized message.
fn classify_storage_error(err: &StorageError) -> (StatusCode, &'static str, String) {
    match err {
        StorageError::MissingReference { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            err.to_string(),
        ),
        StorageError::Constraint(constraint) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            format!("Value rejected by constraint {constraint}"),
        ),
        StorageError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        StorageError::Unavailable(source) => {
            tracing::error!(error = %source, "Storage unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "STORAGE_UNAVAILABLE",
                "Storage is temporarily unavailable".to_string(),
            )
        }
        StorageError::Corrupt { .. } | StorageError::Query(_) => {
            tracing::error!(error = %err, "Database error");
            internal()
        }
    }
}
