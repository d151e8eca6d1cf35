//! Authentication extractors for route handlers.
//!
//! Render-time counterparts to the request-time policy middleware: handlers
//! that need an identity take one of these extractors, which read the same
//! cached session user the policy reads.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};
use crate::routes::policy::{DASHBOARD_PATH, LOGIN_PATH};

/// Extractor that requires an authenticated user.
///
/// If nobody is logged in, HTML requests are redirected to the login page
/// and `/api/` requests get 401 Unauthorized.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.full_name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Error returned when authentication is required but nobody is logged in.
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = session_user(parts).await.ok_or_else(|| {
            if is_api_request(parts) {
                AuthRejection::Unauthorized
            } else {
                AuthRejection::RedirectToLogin
            }
        })?;

        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request when nobody is
/// logged in.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_user(parts).await))
    }
}

/// Extractor that requires an authenticated admin.
///
/// Anonymous HTML requests are redirected to login; authenticated
/// non-admins are redirected to the dashboard (mirroring the policy
/// middleware); `/api/` requests get 401/403 instead.
pub struct RequireAdmin(pub CurrentUser);

/// Error returned when admin access is required.
pub enum AdminRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Redirect an under-privileged user to their dashboard.
    RedirectToDashboard,
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// Forbidden - authenticated but not an admin (for API requests).
    Forbidden,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::RedirectToDashboard => Redirect::to(DASHBOARD_PATH).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "Only admins can access this resource",
            )
                .into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_api = is_api_request(parts);

        let user = session_user(parts).await.ok_or(if is_api {
            AdminRejection::Unauthorized
        } else {
            AdminRejection::RedirectToLogin
        })?;

        if !user.role.is_admin() {
            return Err(if is_api {
                AdminRejection::Forbidden
            } else {
                AdminRejection::RedirectToDashboard
            });
        }

        Ok(Self(user))
    }
}

/// Read the cached user from the session in the request extensions.
async fn session_user(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

fn is_api_request(parts: &Parts) -> bool {
    parts.uri.path().starts_with("/api/")
}
