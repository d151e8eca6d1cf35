//! Request-time enforcement of the unified route policy.
//!
//! Token presence is read from the mirror cookie so the check works without
//! a session-store lookup; the cached role is only consulted for admin
//! paths, where the session is already required anyway.

use axum::{
    extract::Request,
    http::header::COOKIE,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use circuitfab_core::UserRole;

use crate::models::{CurrentUser, session_keys};
use crate::routes::policy::{
    ADMIN_PREFIX, DASHBOARD_PATH, RouteDecision, evaluate, login_redirect_target,
};
use crate::services::token::{TokenStore, token_from_cookie_header};

/// Gate every navigation through [`crate::routes::policy::evaluate`].
pub async fn route_policy_middleware(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();

    let cookie_token = request
        .headers()
        .get(COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(token_from_cookie_header);

    let session = request.extensions().get::<Session>().cloned();

    // The mirror cookie is authoritative for presence; fall back to the
    // session for clients that dropped the mirror but kept their session.
    let authenticated = match (&cookie_token, &session) {
        (Some(_), _) => true,
        (None, Some(session)) => TokenStore::new(session).get().await.is_some(),
        (None, None) => false,
    };

    let role = if path.starts_with(ADMIN_PREFIX) {
        cached_role(session.as_ref()).await
    } else {
        None
    };

    match evaluate(&path, authenticated, role) {
        RouteDecision::Allow => next.run(request).await,
        RouteDecision::RedirectToLogin => {
            tracing::debug!(path, "unauthenticated navigation, redirecting to login");
            Redirect::to(&login_redirect_target(&path)).into_response()
        }
        RouteDecision::RedirectToDashboard => {
            tracing::debug!(path, "redirecting to dashboard");
            Redirect::to(DASHBOARD_PATH).into_response()
        }
    }
}

async fn cached_role(session: Option<&Session>) -> Option<UserRole> {
    let session = session?;
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
        .map(|user| user.role)
}
