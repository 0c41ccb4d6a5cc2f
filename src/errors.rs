//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Password policy violations raised by the credential flows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("New password and confirmation password do not match")]
    ConfirmationMismatch,

    #[error("Old password is incorrect")]
    WrongOldPassword,

    #[error("New password must differ from the old password")]
    Unchanged,

    #[error("Administrator password is incorrect")]
    WrongAdminPassword,
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Request payload is invalid")]
    InvalidFields(ValidationErrors),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    // External service errors
    #[error("Database error")]
    Database(#[from] DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, Vec<String>>>,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::NotFound => "NOT_FOUND",
            AppError::Validation(_) | AppError::InvalidFields(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Credential(_) => "CREDENTIAL_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Jwt(_) => "AUTH_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::Jwt(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_)
            | AppError::InvalidFields(_)
            | AppError::BadRequest(_)
            | AppError::Credential(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),

            // Hide details for internal/security errors
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Jwt(e) => {
                tracing::error!("JWT error: {:?}", e);
                "Invalid or expired token".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }

    /// Per-field messages for payload violations.
    fn field_messages(&self) -> Option<BTreeMap<String, Vec<String>>> {
        let AppError::InvalidFields(errors) = self else {
            return None;
        };

        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{} is invalid", field))
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        Some(fields)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
                fields: self.field_messages(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Translates storage constraint violations on write paths into a
/// user-facing bad request. Anything else stays a database error.
pub trait DbResultExt<T> {
    /// Same message for unique and foreign-key violations.
    fn or_bad_request(self, message: &str) -> AppResult<T>;

    /// Separate messages for unique and foreign-key violations.
    fn or_constraint(self, unique: &str, foreign_key: &str) -> AppResult<T>;
}

impl<T> DbResultExt<T> for Result<T, DbErr> {
    fn or_bad_request(self, message: &str) -> AppResult<T> {
        self.or_constraint(message, message)
    }

    fn or_constraint(self, unique: &str, foreign_key: &str) -> AppResult<T> {
        self.map_err(|err| translate_write_error(err, unique, foreign_key))
    }
}

fn translate_write_error(err: DbErr, unique: &str, foreign_key: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!("Unique constraint violation: {}", detail);
            AppError::BadRequest(unique.to_string())
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            tracing::debug!("Foreign key violation: {}", detail);
            AppError::BadRequest(foreign_key.to_string())
        }
        _ => AppError::Database(err),
    }
}

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::from(CredentialError::Unchanged).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::bad_request("Username is already taken").status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_non_constraint_db_error_stays_database() {
        let result: Result<(), DbErr> = Err(DbErr::Custom("connection reset".into()));
        let err = result.or_bad_request("Username is already taken").unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_field_messages_collects_every_field() {
        let mut errors = ValidationErrors::new();
        let mut from = ValidationError::new("range");
        from.message = Some("from must not be greater than 8".into());
        errors.add("from", from);
        let mut name = ValidationError::new("required");
        name.message = Some("name should not be empty".into());
        errors.add("name", name);

        let fields = AppError::InvalidFields(errors).field_messages().unwrap();

        assert_eq!(fields.len(), 2);
        assert_eq!(fields["from"], vec!["from must not be greater than 8"]);
        assert_eq!(fields["name"], vec!["name should not be empty"]);
    }

    #[test]
    fn test_credential_error_message_is_user_facing() {
        let err = AppError::from(CredentialError::ConfirmationMismatch);
        assert_eq!(
            err.user_message(),
            "New password and confirmation password do not match"
        );
    }
}
