//! CircuitFab backend API client.
//!
//! # Architecture
//!
//! - The backend is the source of truth for users, products, and the
//!   fabrication-status workflow - NO local sync, direct API calls
//! - Plain JSON over HTTP with bearer-token authentication
//! - One attempt per call: no retry, no backoff, no response caching
//!
//! # Endpoints
//!
//! - `POST /auth/login`, `POST /auth/register` - token issuance
//! - `GET /auth/me` - authoritative current-user record
//! - `GET /auth/verify` - token existence check
//! - `PUT /auth/fabrication-status` - admin single-field status update
//! - `GET /auth/users-by-fabrication-status?status=N` - admin funnel list
//! - `GET /public/products`, `GET /public/products/{id}` - catalog
//!
//! # Example
//!
//! ```rust,ignore
//! use circuitfab_storefront::backend::BackendClient;
//!
//! let client = BackendClient::new(&config.backend);
//!
//! let token = client.login("user@example.com", "hunter22!").await?;
//! let user = client.current_user(&token.access_token).await?;
//! ```

mod client;
pub mod types;

pub use client::BackendClient;

use thiserror::Error;

/// Errors that can occur when calling the backend API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport-level failure (connection refused, DNS, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status with a normalized message.
    ///
    /// The message comes from the backend's JSON `detail` field when one is
    /// present, falling back to a generic `HTTP <status>` string.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Human-readable message for the call site.
        message: String,
    },

    /// Response body could not be parsed as the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl BackendError {
    /// Whether this error means the bearer token was rejected.
    ///
    /// Callers treat these fail-closed: the session is cleared rather than
    /// retried.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }

    /// Whether this error is a missing-resource response.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}
