//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is temporarily locked")]
    AccountLocked,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Session not found or expired")]
    SessionInvalid,

    #[error("Session fingerprint mismatch")]
    SessionFingerprintMismatch,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Missing required header: {0}")]
    MissingHeader(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::SessionInvalid
            | AuthError::SessionFingerprintMismatch => ErrorKind::Unauthorized,
            AuthError::AccountLocked | AuthError::AccountDisabled | AuthError::Forbidden => {
                ErrorKind::Forbidden
            }
            AuthError::MissingHeader(_) | AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AccountLocked => {
                tracing::warn!("Login attempt on locked account");
            }
            AuthError::SessionFingerprintMismatch => {
                tracing::warn!("Session fingerprint mismatch detected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest | ErrorKind::UnprocessableEntity => {
                AuthError::Validation(err.to_string())
            }
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<platform::client::FingerprintError> for AuthError {
    fn from(err: platform::client::FingerprintError) -> Self {
        match err {
            platform::client::FingerprintError::MissingHeader(header) => {
                AuthError::MissingHeader(header)
            }
        }
    }
}
