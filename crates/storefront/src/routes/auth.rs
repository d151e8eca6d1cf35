//! Authentication route handlers.
//!
//! Login, registration, logout, and the session-expiry monitor fragment.
//! The rendered page polls `GET /session/status` every 60 seconds while a
//! user is present; polling stops when the page is unloaded, exactly like a
//! client-side interval would.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::backend::types::RegisterRequest;
use crate::filters;
use crate::routes::policy::safe_redirect;
use crate::services::expiry::{SessionHealth, session_health};
use crate::services::token::{expired_mirror_cookie, mirror_cookie};
use crate::services::AuthSession;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub redirect: Option<String>,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub company: Option<String>,
    pub phone: Option<String>,
}

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
    pub redirect: Option<String>,
}

/// Query parameters for the register page.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub redirect: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

/// Session-expiry warning fragment (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/session_status.html")]
pub struct SessionWarningTemplate {
    pub minutes_left: i64,
}

// =============================================================================
// Login / Registration Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<LoginQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error,
        redirect: query.redirect,
    }
}

/// Handle login form submission.
///
/// On success the session holds the token, cached user, and session-start
/// timestamp, the mirror cookie is attached, and the client is sent to the
/// redirect hint (or the dashboard). On failure nothing is stored and the
/// login page re-renders with the backend's message.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = AuthSession::new(&session, state.backend());

    match auth.login(&form.email, &form.password).await {
        Ok(success) => (
            AppendHeaders([("set-cookie", mirror_cookie(&success.token))]),
            Redirect::to(&safe_redirect(form.redirect.as_deref())),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "login failed");
            Redirect::to(&login_error_target(&e.user_message(), form.redirect.as_deref()))
                .into_response()
        }
    }
}

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate { error: query.error }
}

/// Handle registration form submission.
///
/// Same contract as login: the account is created on the backend and the
/// session is established in one flow.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password.len() < 8 {
        return Redirect::to(&register_error_target(
            "Password must be at least 8 characters",
        ))
        .into_response();
    }

    let request = RegisterRequest {
        email: form.email,
        password: form.password,
        full_name: form.full_name,
        company: none_if_empty(form.company),
        phone: none_if_empty(form.phone),
    };

    let auth = AuthSession::new(&session, state.backend());

    match auth.register(&request).await {
        Ok(success) => (
            AppendHeaders([("set-cookie", mirror_cookie(&success.token))]),
            Redirect::to(&safe_redirect(None)),
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "registration failed");
            Redirect::to(&register_error_target(&e.user_message())).into_response()
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Always clears the token, cached user, and session bookkeeping (cart and
/// wishlist only when configured), expires the mirror cookie, and answers
/// with a full navigation to the home route.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    let auth = AuthSession::new(&session, state.backend());

    if let Err(e) = auth
        .logout(state.config().session.clear_cart_on_logout)
        .await
    {
        tracing::error!(error = %e, "failed to clear session on logout");
    }

    (
        AppendHeaders([("set-cookie", expired_mirror_cookie())]),
        Redirect::to("/"),
    )
        .into_response()
}

// =============================================================================
// Session Monitor
// =============================================================================

/// Session-expiry monitor fragment (HTMX, polled every 60 seconds).
///
/// Anonymous sessions get an empty fragment. Expired sessions are torn down
/// and the client is hard-redirected home via `HX-Redirect`. Sessions inside
/// the warning window get a dismissible fragment with the minutes remaining.
#[instrument(skip(state, session))]
pub async fn session_status(State(state): State<AppState>, session: Session) -> Response {
    let auth = AuthSession::new(&session, state.backend());

    if auth.cached_user().await.is_none() {
        return Html(String::new()).into_response();
    }
    let Some(session_start) = auth.session_start().await else {
        return Html(String::new()).into_response();
    };

    match session_health(session_start, Utc::now().timestamp_millis()) {
        SessionHealth::Expired => {
            tracing::info!("session ceiling reached, forcing logout");
            if let Err(e) = auth
                .logout(state.config().session.clear_cart_on_logout)
                .await
            {
                tracing::error!(error = %e, "failed to clear expired session");
            }
            (
                AppendHeaders([
                    ("set-cookie", expired_mirror_cookie()),
                    ("HX-Redirect", "/".to_string()),
                ]),
                Html(String::new()),
            )
                .into_response()
        }
        SessionHealth::ExpiringSoon { minutes_left } => {
            SessionWarningTemplate { minutes_left }.into_response()
        }
        // Healthy sessions double as the periodic token check: a token the
        // backend no longer recognizes tears the session down fail-closed.
        SessionHealth::Active => match auth.verify().await {
            Ok(true) => Html(String::new()).into_response(),
            Ok(false) => (
                AppendHeaders([
                    ("set-cookie", expired_mirror_cookie()),
                    ("HX-Redirect", "/".to_string()),
                ]),
                Html(String::new()),
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, "token verification errored");
                Html(String::new()).into_response()
            }
        },
    }
}

/// Dismiss the expiry warning until the next poll.
pub async fn session_status_clear() -> impl IntoResponse {
    Html(String::new())
}

// =============================================================================
// Helpers
// =============================================================================

fn login_error_target(message: &str, redirect: Option<&str>) -> String {
    let mut target = format!("/login?error={}", urlencoding::encode(message));
    if let Some(redirect) = redirect
        && !redirect.is_empty()
    {
        target.push_str("&redirect=");
        target.push_str(&urlencoding::encode(redirect));
    }
    target
}

fn register_error_target(message: &str) -> String {
    format!("/register?error={}", urlencoding::encode(message))
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
