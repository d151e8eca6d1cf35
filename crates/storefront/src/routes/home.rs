//! Home page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;
use crate::middleware::OptionalAuth;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub signed_in: bool,
}

/// Display the home page.
pub async fn home(OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    HomeTemplate {
        signed_in: user.is_some(),
    }
}
