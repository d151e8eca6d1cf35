//! Admin back-office routes.
//!
//! Guarded twice with the same rules: the route-policy middleware rejects
//! non-admins before routing, and every handler takes the `RequireAdmin`
//! extractor.

pub mod customers;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the admin routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::overview))
        .route("/customers", get(customers::index))
        .route("/customers/rows", get(customers::rows))
        .route("/customers/status", post(customers::update_status))
}
