//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion into the failure envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Request field name
    #[schema(example = "license_document_url")]
    pub field: String,
    /// Human readable message
    #[schema(example = "License document is required")]
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
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

    #[error("Account is {0}")]
    AccountInactive(String),

    #[error("Doctor verification has not been approved")]
    VerificationRequired,

    // Resource errors
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Validation failed")]
    InvalidFields(Vec<FieldError>),

    #[error("Uploaded file is too large")]
    PayloadTooLarge,

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Failure envelope, the error half of the shared response shape
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always false
    pub success: bool,
    /// User-facing message
    pub message: String,
    /// Stable machine-readable error code
    #[schema(example = "VALIDATION_ERROR")]
    pub code: String,
    /// Field-level validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::AccountInactive(_) => "ACCOUNT_INACTIVE",
            AppError::VerificationRequired => "VERIFICATION_REQUIRED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) | AppError::InvalidFields(_) => "VALIDATION_ERROR",
            AppError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
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
            AppError::Forbidden | AppError::AccountInactive(_) | AppError::VerificationRequired => {
                StatusCode::FORBIDDEN
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) | AppError::InvalidFields(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Conflict(msg) => msg.clone(),

            // Hide details for internal/security errors
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Jwt(e) => {
                tracing::debug!("JWT error: {:?}", e);
                "Invalid or expired token".to_string()
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
        let status = self.status();
        let code = self.code().to_string();
        let message = self.user_message();
        let errors = match self {
            AppError::InvalidFields(fields) => Some(fields),
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            message,
            code,
            errors,
        };

        (status, Json(body)).into_response()
    }
}

/// Failed `validator` rules become field-level errors, sorted by field.
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field));
                    FieldError::new(field.to_string(), message)
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::InvalidFields(fields)
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, resource: &'static str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, resource: &'static str) -> AppResult<T> {
        self.ok_or(AppError::NotFound(resource))
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        AppError::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::InvalidFields(vec![FieldError::new(field, message)])
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Map a unique-constraint failure on insert to a conflict.
    pub fn on_unique_violation(err: sea_orm::DbErr, msg: &str) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => AppError::conflict(msg),
            _ => AppError::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::AccountInactive("suspended".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::NotFound("Doctor").status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::field("reason", "required").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let err = AppError::internal("connection refused at 10.0.0.3");
        assert_eq!(err.user_message(), "An internal error occurred");
    }

    #[test]
    fn test_validation_errors_carry_field_names() {
        use validator::Validate;

        #[derive(Validate)]
        struct Sample {
            #[validate(email(message = "Invalid email format"))]
            email: String,
            #[validate(length(min = 8))]
            password: String,
        }

        let sample = Sample {
            email: "nope".into(),
            password: "short".into(),
        };
        let err = AppError::from(sample.validate().unwrap_err());

        match err {
            AppError::InvalidFields(fields) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].field, "email");
                assert_eq!(fields[0].message, "Invalid email format");
                assert_eq!(fields[1].field, "password");
                assert_eq!(fields[1].message, "password is invalid");
            }
            other => panic!("expected field errors, got {:?}", other),
        }
    }

    #[test]
    fn test_not_found_names_resource() {
        assert_eq!(
            AppError::NotFound("Verification").to_string(),
            "Verification not found"
        );
    }
}
