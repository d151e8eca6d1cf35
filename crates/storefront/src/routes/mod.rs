//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page
//! GET  /health                  - Health check
//! GET  /fabrication             - Fabrication service page
//! GET  /assembly                - Assembly service page
//! GET  /dashboard               - Account overview (requires auth)
//!
//! # Products
//! GET  /products                - Product listing
//! GET  /products/{id}           - Product detail
//!
//! # Cart (HTMX fragments)
//! GET  /cart                    - Cart page
//! POST /cart/add                - Add item (returns count fragment)
//! POST /cart/remove             - Remove item (returns cart_items fragment)
//! POST /cart/clear              - Empty the cart
//! POST /cart/move-to-wishlist   - Move one item to the wishlist
//! GET  /cart/count              - Cart count badge (fragment)
//!
//! # Wishlist (HTMX fragments)
//! GET  /wishlist                - Wishlist page
//! POST /wishlist/add            - Add item
//! POST /wishlist/remove         - Remove item
//! POST /wishlist/clear          - Empty the wishlist
//! POST /wishlist/move-to-cart   - Move one item to the cart
//! GET  /wishlist/count          - Wishlist count badge (fragment)
//!
//! # Auth
//! GET  /login                   - Login page
//! POST /login                   - Login action
//! GET  /register                - Register page
//! POST /register                - Register action
//! POST /logout                  - Logout action (hard redirect home)
//! GET  /session/status          - Session-expiry monitor fragment
//! GET  /session/status/clear    - Dismiss the expiry warning
//!
//! # Admin (requires admin role)
//! GET  /admin                   - Funnel overview
//! GET  /admin/customers         - Customer list by fabrication status
//! GET  /admin/customers/rows    - Filtered list rows (fragment)
//! POST /admin/customers/status  - Single-field status update
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod dashboard;
pub mod home;
pub mod pages;
pub mod policy;
pub mod products;
pub mod wishlist;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    routing::{get, post},
};
use rust_decimal::Decimal;

use crate::filters;
use crate::state::AppState;

/// Shared error page with a retry link and sign-in call to action.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub message: String,
    pub retry_path: String,
}

/// Format a decimal amount as a display price.
pub(crate) fn format_price(amount: Decimal) -> String {
    format!("${amount:.2}")
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/session/status", get(auth::session_status))
        .route("/session/status/clear", get(auth::session_status_clear))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/move-to-wishlist", post(cart::move_to_wishlist))
        .route("/count", get(cart::count))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::show))
        .route("/add", post(wishlist::add))
        .route("/remove", post(wishlist::remove))
        .route("/clear", post(wishlist::clear))
        .route("/move-to-cart", post(wishlist::move_to_cart))
        .route("/count", get(wishlist::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Liveness
        .route("/health", get(health))
        // Service pages
        .route("/fabrication", get(pages::fabrication))
        .route("/assembly", get(pages::assembly))
        // Account overview
        .route("/dashboard", get(dashboard::show))
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Wishlist routes
        .nest("/wishlist", wishlist_routes())
        // Admin back-office
        .nest("/admin", admin::routes())
        // Auth routes (top-level paths, matching the guard policy)
        .merge(auth_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_two_decimals() {
        assert_eq!(format_price(Decimal::new(4950, 2)), "$49.50");
        assert_eq!(format_price(Decimal::new(10, 0)), "$10.00");
        assert_eq!(format_price(Decimal::ZERO), "$0.00");
    }
}
