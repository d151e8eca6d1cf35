//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. Route handlers that don't render
//! their own fallback UI return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::backend::BackendError;
use crate::services::AuthError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend API operation failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session state could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn is_server_side(&self) -> bool {
        match self {
            Self::Session(_) | Self::Internal(_) | Self::Auth(AuthError::Session(_)) => true,
            Self::Backend(e) | Self::Auth(AuthError::Backend(e)) => {
                !e.is_auth_failure() && !e.is_not_found()
            }
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_side() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Backend(e) | Self::Auth(AuthError::Backend(e)) => {
                if e.is_auth_failure() {
                    StatusCode::UNAUTHORIZED
                } else if e.is_not_found() {
                    StatusCode::NOT_FOUND
                } else {
                    StatusCode::BAD_GATEWAY
                }
            }
            Self::Auth(AuthError::NotAuthenticated) | Self::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            Self::Auth(AuthError::Session(_)) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Backend(_) | Self::Auth(AuthError::Backend(_)) => {
                "External service error".to_string()
            }
            Self::Session(_) | Self::Auth(AuthError::Session(_)) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
            Self::Auth(AuthError::NotAuthenticated) => "Please sign in".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product p-100".to_string());
        assert_eq!(err.to_string(), "Not found: product p-100");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("x".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_backend_status_mapping() {
        fn get_status(err: BackendError) -> StatusCode {
            AppError::from(err).into_response().status()
        }

        assert_eq!(
            get_status(BackendError::Api {
                status: 401,
                message: "nope".to_string()
            }),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(BackendError::Api {
                status: 404,
                message: "missing".to_string()
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(BackendError::Api {
                status: 500,
                message: "boom".to_string()
            }),
            StatusCode::BAD_GATEWAY
        );
    }
}
