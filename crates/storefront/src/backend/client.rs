//! Backend API client implementation.
//!
//! Thin request/response plumbing over `reqwest`: build the URL from the
//! configured base, attach the bearer token when one is supplied, normalize
//! non-success statuses into [`BackendError::Api`]. Exactly one attempt per
//! call.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use circuitfab_core::{FabricationStatus, ProductId, UserId};

use super::BackendError;
use super::types::{
    BackendUser, FabricationStatusUpdate, LoginRequest, Product, ProductsEnvelope,
    RegisterRequest, TokenResponse, UsersEnvelope,
};
use crate::config::BackendConfig;

/// Client for the CircuitFab backend API.
///
/// Cheaply cloneable via `Arc`. Holds no per-user state: the bearer token is
/// passed per call because it belongs to the caller's session, not to the
/// process.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a new backend API client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Send a request and normalize the response.
    ///
    /// Non-2xx responses are read as text first so the error message can be
    /// pulled from the backend's JSON `detail` field with the raw body still
    /// available for diagnostics.
    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(path, error = %e, "backend request failed");
            BackendError::Http(e)
        })?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = extract_detail(&response_text)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            tracing::warn!(
                path,
                status = status.as_u16(),
                body = %response_text.chars().take(500).collect::<String>(),
                "backend returned non-success status"
            );
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                path,
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "failed to parse backend response"
            );
            BackendError::Parse(e)
        })
    }

    // =========================================================================
    // Auth endpoints
    // =========================================================================

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Api` with the backend's message (e.g.
    /// "Incorrect email or password") on rejection.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, BackendError> {
        let path = "/auth/login";
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send(path, self.inner.client.post(self.url(path)).json(&body))
            .await
    }

    /// Register a new account and receive a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Api` when the backend rejects the registration
    /// (e.g. email already registered).
    pub async fn register(&self, request: &RegisterRequest) -> Result<TokenResponse, BackendError> {
        let path = "/auth/register";
        self.send(path, self.inner.client.post(self.url(path)).json(request))
            .await
    }

    /// Fetch the authoritative record for the token's user.
    ///
    /// # Errors
    ///
    /// Returns an auth-failure `BackendError::Api` when the token is rejected.
    pub async fn current_user(&self, token: &str) -> Result<BackendUser, BackendError> {
        let path = "/auth/me";
        self.send(
            path,
            self.inner.client.get(self.url(path)).bearer_auth(token),
        )
        .await
    }

    /// Lightweight token existence check.
    ///
    /// The response body carries no information beyond success/failure.
    ///
    /// # Errors
    ///
    /// Returns an auth-failure `BackendError::Api` when the token is rejected.
    pub async fn verify_token(&self, token: &str) -> Result<(), BackendError> {
        let path = "/auth/verify";
        let _: Value = self
            .send(
                path,
                self.inner.client.get(self.url(path)).bearer_auth(token),
            )
            .await?;
        Ok(())
    }

    // =========================================================================
    // Admin endpoints
    // =========================================================================

    /// Update a single user's fabrication status (admin only).
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Api` when the caller is not an admin or the
    /// user does not exist.
    pub async fn update_fabrication_status(
        &self,
        token: &str,
        user_id: &UserId,
        status: FabricationStatus,
    ) -> Result<(), BackendError> {
        let path = "/auth/fabrication-status";
        let body = FabricationStatusUpdate {
            user_id: user_id.clone(),
            status,
        };
        let _: Value = self
            .send(
                path,
                self.inner
                    .client
                    .put(self.url(path))
                    .bearer_auth(token)
                    .json(&body),
            )
            .await?;
        Ok(())
    }

    /// List all users at the given fabrication-funnel stage (admin only).
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Api` when the caller is not an admin.
    pub async fn users_by_fabrication_status(
        &self,
        token: &str,
        status: FabricationStatus,
    ) -> Result<Vec<BackendUser>, BackendError> {
        let path = format!(
            "/auth/users-by-fabrication-status?status={}",
            status.as_u8()
        );
        let envelope: UsersEnvelope = self
            .send(
                &path,
                self.inner.client.get(self.url(&path)).bearer_auth(token),
            )
            .await?;
        Ok(envelope.users)
    }

    // =========================================================================
    // Public catalog endpoints
    // =========================================================================

    /// Fetch the full product catalog.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport or API failure.
    pub async fn products(&self) -> Result<Vec<Product>, BackendError> {
        let path = "/public/products?skip=0&limit=1000";
        let envelope: ProductsEnvelope =
            self.send(path, self.inner.client.get(self.url(path))).await?;
        Ok(envelope.products)
    }

    /// Fetch a single product by id.
    ///
    /// # Errors
    ///
    /// Returns a not-found `BackendError::Api` for unknown ids.
    pub async fn product(&self, id: &ProductId) -> Result<Product, BackendError> {
        let path = format!("/public/products/{id}");
        self.send(&path, self.inner.client.get(self.url(&path)))
            .await
    }
}

/// Pull the FastAPI-style `detail` message out of an error body, if any.
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(s) => Some(s.clone()),
        // Validation errors arrive as structured arrays; flatten to text.
        other => Some(other.to_string()),
    }
}
