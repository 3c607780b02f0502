//! Auth Error Types
//!
//! Internally every failure is distinguishable. On the way out, variants that
//! would help an attacker (which token check failed, whether a user exists)
//! collapse into the same client-facing message.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordHashError;
use thiserror::Error;

use crate::application::token::TokenError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or empty input
    #[error("Validation failed: {0}")]
    Validation(String),

    /// User name already exists
    #[error("User name already taken")]
    UserNameTaken,

    /// Store lookup miss. Login reports this as `InvalidCredentials`.
    #[error("User not found")]
    UserNotFound,

    /// Unknown user or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No `Authorization: Bearer <token>` header
    #[error("Missing or malformed Authorization header")]
    MissingBearer,

    /// Token rejected by the codec
    #[error("Invalid token: {0}")]
    InvalidToken(TokenError),

    /// Identity context absent where one is required
    #[error("Request is not authenticated")]
    Unauthenticated,

    /// Authenticated, but the role does not match
    #[error("Role '{actual}' does not satisfy required role '{required}'")]
    Forbidden { required: String, actual: String },

    /// Password hashing infrastructure failure
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordHashError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            // Duplicate names stay 400 for client compatibility
            AuthError::Validation(_) | AuthError::UserNameTaken => ErrorKind::BadRequest,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::InvalidCredentials
            | AuthError::MissingBearer
            | AuthError::InvalidToken(_)
            | AuthError::Unauthenticated => ErrorKind::Unauthorized,
            AuthError::Forbidden { .. } => ErrorKind::Forbidden,
            AuthError::PasswordHash(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Message safe to send to the client
    fn public_message(&self) -> String {
        match self {
            AuthError::Validation(msg) => msg.clone(),
            AuthError::InvalidToken(_) => "Invalid token".to_string(),
            AuthError::Unauthenticated => "Unauthorized".to_string(),
            AuthError::Forbidden { .. } => "Forbidden: insufficient role".to_string(),
            AuthError::PasswordHash(_) | AuthError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.public_message())
    }

    fn challenges_bearer(&self) -> bool {
        matches!(
            self,
            AuthError::MissingBearer | AuthError::InvalidToken(_) | AuthError::Unauthenticated
        )
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::PasswordHash(e) => {
                tracing::error!(error = %e, "Password hashing failed");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::Forbidden { required, actual } => {
                tracing::warn!(required = %required, actual = %actual, "Role check failed");
            }
            AuthError::InvalidToken(kind) => {
                tracing::debug!(reason = %kind, "Bearer token rejected");
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
        let mut response = self.to_app_error().into_response();
        if self.challenges_bearer() {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        if err.kind() == ErrorKind::BadRequest {
            AuthError::Validation(err.message().to_string())
        } else {
            AuthError::Internal(err.to_string())
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(msg) => AuthError::Internal(msg),
            other => AuthError::InvalidToken(other),
        }
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        AuthError::Internal(format!("Blocking task failed: {err}"))
    }
}
