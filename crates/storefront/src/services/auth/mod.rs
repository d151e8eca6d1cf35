//! Auth session controller.
//!
//! Owns the authenticated-session state: bearer token, cached user record,
//! and session-start bookkeeping. All state lives in the caller's session;
//! this type is constructed per request over borrowed collaborators so tests
//! can instantiate isolated instances.
//!
//! Authorization failures are fail-closed: any failure verifying or fetching
//! the current user clears the stored token and cache rather than retrying,
//! forcing re-authentication.

mod error;

pub use error::AuthError;

use chrono::Utc;
use tower_sessions::Session;

use crate::backend::BackendClient;
use crate::backend::types::RegisterRequest;
use crate::models::{CurrentUser, session_keys};
use crate::services::token::TokenStore;

/// Result of a successful login or registration.
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    /// The freshly cached user record.
    pub user: CurrentUser,
    /// The issued bearer token; the route attaches its mirror cookie.
    pub token: String,
}

/// Per-request controller for the authenticated session.
pub struct AuthSession<'a> {
    session: &'a Session,
    backend: &'a BackendClient,
}

impl<'a> AuthSession<'a> {
    /// Create a controller over the given session and backend client.
    #[must_use]
    pub const fn new(session: &'a Session, backend: &'a BackendClient) -> Self {
        Self { session, backend }
    }

    /// Log in with email and password.
    ///
    /// On success the token, cached user, and session-start timestamp are
    /// all stored. On failure nothing is mutated.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Backend` when the backend rejects the credentials
    /// or is unreachable, `AuthError::Session` if the session store fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSuccess, AuthError> {
        let token = self.backend.login(email, password).await?;
        self.establish(token.access_token).await
    }

    /// Register a new account; same contract as [`Self::login`].
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Backend` when the backend rejects the
    /// registration, `AuthError::Session` if the session store fails.
    pub async fn register(&self, request: &RegisterRequest) -> Result<LoginSuccess, AuthError> {
        let token = self.backend.register(request).await?;
        self.establish(token.access_token).await
    }

    /// Store a freshly issued token plus the user record it authenticates.
    ///
    /// The user is fetched BEFORE anything is written so a half-failed login
    /// leaves no partial state behind.
    async fn establish(&self, token: String) -> Result<LoginSuccess, AuthError> {
        let user = self.backend.current_user(&token).await?;

        TokenStore::new(self.session).set(&token).await?;
        self.session
            .insert(session_keys::CURRENT_USER, &user)
            .await?;
        self.session
            .insert(session_keys::SESSION_START, Utc::now().timestamp_millis())
            .await?;

        tracing::info!(user_id = %user.id, "session established");
        Ok(LoginSuccess { user, token })
    }

    /// Current bearer token, if any.
    pub async fn token(&self) -> Option<String> {
        TokenStore::new(self.session).get().await
    }

    /// Cached user record without a backend round-trip.
    ///
    /// May be stale; use [`Self::current_user`] when authority matters.
    pub async fn cached_user(&self) -> Option<CurrentUser> {
        self.session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
    }

    /// Session-start timestamp in epoch milliseconds.
    pub async fn session_start(&self) -> Option<i64> {
        self.session
            .get::<i64>(session_keys::SESSION_START)
            .await
            .ok()
            .flatten()
    }

    /// Fetch the authoritative user record and refresh the cache.
    ///
    /// Returns `Ok(None)` when anonymous, and - fail-closed - also when the
    /// fetch fails for any reason: the token and cached user are cleared so
    /// the next request re-authenticates.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Session` only when session state itself cannot be
    /// written.
    pub async fn current_user(&self) -> Result<Option<CurrentUser>, AuthError> {
        let Some(token) = self.token().await else {
            return Ok(None);
        };

        match self.backend.current_user(&token).await {
            Ok(user) => {
                self.session
                    .insert(session_keys::CURRENT_USER, &user)
                    .await?;
                Ok(Some(user))
            }
            Err(e) => {
                tracing::warn!(error = %e, "current-user fetch failed, clearing session");
                self.clear_auth_state().await?;
                Ok(None)
            }
        }
    }

    /// Lightweight token check.
    ///
    /// Any failure clears the token (fail-closed) and reports `false`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Session` only when session state cannot be
    /// written.
    pub async fn verify(&self) -> Result<bool, AuthError> {
        let Some(token) = self.token().await else {
            return Ok(false);
        };

        match self.backend.verify_token(&token).await {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::warn!(error = %e, "token verification failed, clearing session");
                self.clear_auth_state().await?;
                Ok(false)
            }
        }
    }

    /// Clear the authenticated session.
    ///
    /// Always removes token, cached user, and session-start bookkeeping.
    /// Cart and wishlist are cleared only when the configured policy says
    /// so - they are otherwise independent of the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Session` if the session store fails.
    pub async fn logout(&self, clear_collections: bool) -> Result<(), AuthError> {
        self.clear_auth_state().await?;

        if clear_collections {
            self.session
                .remove::<serde_json::Value>(session_keys::CART)
                .await?;
            self.session
                .remove::<serde_json::Value>(session_keys::WISHLIST)
                .await?;
        }

        tracing::info!("session cleared");
        Ok(())
    }

    async fn clear_auth_state(&self) -> Result<(), AuthError> {
        TokenStore::new(self.session).clear().await?;
        self.session
            .remove::<CurrentUser>(session_keys::CURRENT_USER)
            .await?;
        self.session
            .remove::<i64>(session_keys::SESSION_START)
            .await?;
        Ok(())
    }
}
