//! Bearer-token persistence.
//!
//! The token lives in the session under [`session_keys::ACCESS_TOKEN`] and
//! is mirrored into a plain cookie so the request-time route guard can check
//! token presence without touching the session store. The store itself
//! enforces no expiry; expiry is advisory and computed from the separately
//! stored session-start timestamp (see [`crate::services::expiry`]).

use tower_sessions::Session;

use crate::models::session_keys;

/// Name of the mirror cookie carrying the bearer token.
pub const TOKEN_COOKIE: &str = "access_token";

/// Mirror cookie lifetime (30 days).
const TOKEN_COOKIE_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

/// Session-backed store for the bearer token.
pub struct TokenStore<'a> {
    session: &'a Session,
}

impl<'a> TokenStore<'a> {
    /// Create a token store over the given session.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Current token, or `None` when anonymous.
    pub async fn get(&self) -> Option<String> {
        self.session
            .get::<String>(session_keys::ACCESS_TOKEN)
            .await
            .ok()
            .flatten()
    }

    /// Persist a token.
    ///
    /// The caller is responsible for attaching [`mirror_cookie`] to the
    /// response so the request-time guard sees the same value.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn set(&self, token: &str) -> Result<(), tower_sessions::session::Error> {
        self.session
            .insert(session_keys::ACCESS_TOKEN, token)
            .await
    }

    /// Remove the token.
    ///
    /// The caller is responsible for attaching [`expired_mirror_cookie`] to
    /// the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn clear(&self) -> Result<(), tower_sessions::session::Error> {
        self.session
            .remove::<String>(session_keys::ACCESS_TOKEN)
            .await?;
        Ok(())
    }
}

/// Build the `Set-Cookie` value mirroring the token.
///
/// Path-scoped to `/` with a 30-day max-age, matching the session cookie's
/// reach so the request-time guard and the session never disagree on scope.
#[must_use]
pub fn mirror_cookie(token: &str) -> String {
    format!("{TOKEN_COOKIE}={token}; Path=/; Max-Age={TOKEN_COOKIE_MAX_AGE_SECS}; SameSite=Lax; HttpOnly")
}

/// Build the `Set-Cookie` value that removes the mirror cookie.
#[must_use]
pub fn expired_mirror_cookie() -> String {
    format!("{TOKEN_COOKIE}=; Path=/; Max-Age=0; SameSite=Lax; HttpOnly")
}

/// Extract the token from a request `Cookie` header value, if present.
#[must_use]
pub fn token_from_cookie_header(header: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == TOKEN_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}
