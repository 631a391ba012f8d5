//! Error types and handling
//!
//! Every failing operation surfaces one of these variants directly to the
//! caller; the HTTP layer converts them to a consistent JSON response.
//! The only exception is audit-log writes, which are best-effort and never
//! abort the action they describe.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Application error taxonomy
#[derive(Debug, Error)]
pub enum AppError {
    /// Password or identifier does not match an account (401)
    #[error("Invalid credentials")]
    InvalidCredential,

    /// Account holds a temporary credential and the supplied password does
    /// not match it, or it has expired (401)
    #[error("Invalid temporary password")]
    InvalidTemporaryCredential,

    /// Login attempted against a suspended or deleted dealer (403)
    #[error("Dealer account is not active")]
    DealerNotActive,

    /// Suspend/activate attempted on a deleted dealer (409)
    #[error("Dealer has been deleted")]
    DealerDeleted,

    /// Delete attempted on an already-deleted dealer (409)
    #[error("Dealer is already deleted")]
    AlreadyDeleted,

    /// Identity-number or username collision, including race losers
    /// surfaced by a storage-layer unique constraint (409)
    #[error("Duplicate identity: {0}")]
    DuplicateIdentity(String),

    /// Record id does not resolve (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Cross-tenant write attempt or insufficient role (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Missing or malformed required field (422)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Missing or invalid session (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True when `err`'s chain bottoms out in a storage-layer unique
    /// constraint violation.
    pub fn is_unique_violation(err: &anyhow::Error) -> bool {
        err.chain()
            .any(|cause| cause.to_string().contains("UNIQUE constraint failed"))
    }

    /// Translate a repository error, mapping unique-constraint violations
    /// (race losers included) to the given duplicate error.
    pub fn from_repo(err: anyhow::Error, on_duplicate: AppError) -> AppError {
        if Self::is_unique_violation(&err) {
            on_duplicate
        } else {
            AppError::Database(format!("{:#}", err))
        }
    }
}

/// Error response body
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, should_log) = match &self {
            AppError::InvalidCredential => (StatusCode::UNAUTHORIZED, "invalid_credential", false),
            AppError::InvalidTemporaryCredential => (
                StatusCode::UNAUTHORIZED,
                "invalid_temporary_credential",
                false,
            ),
            AppError::DealerNotActive => (StatusCode::FORBIDDEN, "dealer_not_active", false),
            AppError::DealerDeleted => (StatusCode::CONFLICT, "dealer_deleted", false),
            AppError::AlreadyDeleted => (StatusCode::CONFLICT, "already_deleted", false),
            AppError::DuplicateIdentity(_) => (StatusCode::CONFLICT, "duplicate_identity", false),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", false),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden", true),
            AppError::ValidationError(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", false)
            }
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized", false),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error", true),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", true),
        };

        // Log server errors
        if should_log {
            error!(error = %self, error_type = error_type, "Request error");
        }

        let body = ErrorResponse::new(error_type, self.to_string());

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{:#}", err))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.message().contains("UNIQUE constraint failed") {
                    AppError::DuplicateIdentity("Record already exists".to_string())
                } else {
                    AppError::Database(db_err.to_string())
                }
            }
            _ => AppError::Database(err.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
