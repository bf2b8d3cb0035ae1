//! Application error type and its HTTP rendering.
//!
//! Handlers turn the recoverable kinds (not found, denied, invalid,
//! conflicting) into flash redirects; anything left reaches the client
//! as a JSON error body with internals hidden.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

use crate::domain::Denial;

#[derive(Error, Debug)]
pub enum AppError {
    /// An access policy denial. The text doubles as the flash message.
    #[error("Unauthorised Access")]
    Forbidden,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Resource not found")]
    NotFound,

    /// Unique constraint hit; carries what already exists.
    #[error("{0} already exists")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error")]
    Database(DbErr),

    #[error("Session token error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Internal server error")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl AppError {
    pub fn conflict(what: impl Into<String>) -> Self {
        AppError::Conflict(what.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Jwt(_) => "SESSION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text safe to show the client. Server-side failures are logged
    /// here and replaced with a generic line.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Jwt(e) => {
                tracing::error!("Session token error: {:?}", e);
                "Invalid or expired session".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code(),
                message: self.user_message(),
            },
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Unique violations surface as conflicts so callers can treat
/// a lost check-then-insert race like the pre-checked duplicate.
impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::debug!("Unique constraint violated: {}", detail);
                AppError::Conflict(conflicting_field(&detail).to_string())
            }
            _ => AppError::Database(err),
        }
    }
}

impl From<Denial> for AppError {
    fn from(_: Denial) -> Self {
        AppError::Forbidden
    }
}

/// Best-effort name of the column behind a unique violation.
fn conflicting_field(detail: &str) -> &'static str {
    if detail.contains("serial_number") {
        "An asset with this serial number"
    } else if detail.contains("username") {
        "A user with this name"
    } else if detail.contains("name") {
        "A department with this name"
    } else {
        "Record"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_message_matches_flash_text() {
        assert_eq!(AppError::Forbidden.to_string(), "Unauthorised Access");
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_conflict_message() {
        let err = AppError::conflict("A user with this name");
        assert_eq!(err.user_message(), "A user with this name already exists");
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_conflicting_field_from_constraint_detail() {
        assert_eq!(
            conflicting_field("UNIQUE constraint failed: assets.serial_number"),
            "An asset with this serial number"
        );
        assert_eq!(
            conflicting_field("duplicate key value violates unique constraint \"users_username_key\""),
            "A user with this name"
        );
        assert_eq!(
            conflicting_field("UNIQUE constraint failed: departments.name"),
            "A department with this name"
        );
    }

    #[test]
    fn test_database_error_hides_details() {
        let err = AppError::from(DbErr::Custom("connection reset".into()));
        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(err.user_message(), "A database error occurred");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
