//! Authentication error types.

use thiserror::Error;

use crate::backend::BackendError;

/// Errors from the auth session controller.
#[derive(Debug, Error)]
pub enum AuthError {
    /// An operation that needs a token was called while anonymous.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Backend call failed (rejection, transport, or parse).
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Session state could not be read or written.
    #[error("session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl AuthError {
    /// Human-readable message for login/registration screens.
    ///
    /// Backend rejections surface their own message; transport failures get
    /// a generic connectivity hint rather than a reqwest debug dump.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend(BackendError::Api { message, .. }) => message.clone(),
            Self::Backend(BackendError::Http(_)) => {
                "Network error. Please check your connection.".to_string()
            }
            Self::Backend(BackendError::Parse(_)) | Self::Session(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            Self::NotAuthenticated => "Please sign in to continue.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_surfaces_backend_detail() {
        let err = AuthError::Backend(BackendError::Api {
            status: 401,
            message: "Incorrect email or password".to_string(),
        });
        assert_eq!(err.user_message(), "Incorrect email or password");
    }

    #[test]
    fn test_user_message_for_anonymous() {
        assert_eq!(
            AuthError::NotAuthenticated.user_message(),
            "Please sign in to continue."
        );
    }
}
