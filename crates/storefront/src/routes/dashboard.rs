//! Account dashboard handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::models::CurrentUser;
use crate::routes::ErrorTemplate;
use crate::routes::policy::LOGIN_PATH;
use crate::services::AuthSession;
use crate::services::token::expired_mirror_cookie;
use crate::state::AppState;

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub user: CurrentUser,
}

/// Display the account overview.
///
/// The cached user is not trusted here: the authoritative record is fetched
/// fresh so role and funnel changes made by an admin show up. A rejected
/// fetch means the session was cleared fail-closed, so the client is sent
/// back to login with the mirror cookie expired.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Response {
    let auth = AuthSession::new(&session, state.backend());

    match auth.current_user().await {
        Ok(Some(user)) => DashboardTemplate { user }.into_response(),
        Ok(None) => (
            AppendHeaders([("set-cookie", expired_mirror_cookie())]),
            Redirect::to(LOGIN_PATH),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to load dashboard");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorTemplate {
                    message: "Could not load your account right now.".to_string(),
                    retry_path: "/dashboard".to_string(),
                },
            )
                .into_response()
        }
    }
}
