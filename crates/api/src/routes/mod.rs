//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::AppState;
use fitbase_core::account::AccountError;
use fitbase_core::storage::StorageError;
use fitbase_core::upload::UploadError;

pub mod coaches;
pub mod health;
pub mod users;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(users::routes())
        .merge(coaches::routes())
}

/// Map an account error onto an HTTP response.
///
/// Adapter causes are logged at the call site; the bodies here stay generic
/// so internals never leak to the caller.
pub(crate) fn error_response(err: &AccountError) -> Response {
    match err {
        AccountError::NotFound(_) | AccountError::EmailNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Account not found"
            })),
        )
            .into_response(),
        AccountError::AlreadyExists(_) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "email_taken",
                "message": "Email is already registered"
            })),
        )
            .into_response(),
        AccountError::InvalidInput(msg) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_input",
                "message": msg
            })),
        )
            .into_response(),
        AccountError::Unauthenticated => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "invalid_credentials",
                "message": "Invalid user id or password"
            })),
        )
            .into_response(),
        AccountError::Upload(UploadError::InvalidMetadata(msg)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_metadata",
                "message": msg
            })),
        )
            .into_response(),
        AccountError::Upload(UploadError::StreamRead(_)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_request_stream",
                "message": "Failed to read request stream"
            })),
        )
            .into_response(),
        AccountError::Storage(StorageError::PhotoTooLarge { .. }) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "photo_too_large",
                "message": err.to_string()
            })),
        )
            .into_response(),
        AccountError::Storage(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "storage_error",
                "message": "Storage operation failed"
            })),
        )
            .into_response(),
        AccountError::PhotoCleanupFailed { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "photo_cleanup_failed",
                "message": "Account deleted but its photo could not be removed"
            })),
        )
            .into_response(),
        AccountError::Repository(_) | AccountError::Password(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "internal_error",
                "message": "An error occurred"
            })),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (AccountError::NotFound(Uuid::new_v4()), StatusCode::NOT_FOUND),
            (
                AccountError::EmailNotFound("a@b.c".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                AccountError::AlreadyExists("a@b.c".into()),
                StatusCode::CONFLICT,
            ),
            (
                AccountError::invalid_input("name is required"),
                StatusCode::BAD_REQUEST,
            ),
            (AccountError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (
                AccountError::Upload(UploadError::invalid_metadata("bad json")),
                StatusCode::BAD_REQUEST,
            ),
            (
                AccountError::Upload(UploadError::stream_read("reset")),
                StatusCode::BAD_REQUEST,
            ),
            (
                AccountError::Storage(StorageError::photo_too_large(10, 5)),
                StatusCode::BAD_REQUEST,
            ),
            (
                AccountError::Storage(StorageError::operation("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AccountError::repository("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AccountError::PhotoCleanupFailed {
                    id: Uuid::new_v4(),
                    key: "user/x".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(error_response(&err).status(), expected, "{err}");
        }
    }
}
