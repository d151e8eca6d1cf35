//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The collection is purely session-local: no handler here ever calls the
//! backend. Adding an id that is already present is an idempotent no-op.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    response::{AppendHeaders, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use circuitfab_core::ProductId;

use crate::filters;
use crate::routes::format_price;
use crate::stores::cart::{Cart, CartItem, load_cart, save_cart, subtotal};
use crate::stores::wishlist::{load_wishlist, save_wishlist};

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub price: String,
    pub image: String,
    pub in_stock: bool,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub count: usize,
    pub subtotal: String,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            count: cart.len(),
            subtotal: format_price(subtotal(cart)),
        }
    }
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            sku: item.sku.clone(),
            price: format_price(item.price),
            image: item.image.clone(),
            in_stock: item.in_stock,
        }
    }
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub in_stock: Option<bool>,
}

/// Remove / move form data.
#[derive(Debug, Deserialize)]
pub struct CartItemForm {
    pub id: ProductId,
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: usize,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    CartShowTemplate {
        cart: CartView::from(&cart),
    }
}

/// Add an item to the cart (HTMX).
///
/// Duplicate ids are no-ops: the first-added attributes win. Returns the
/// count badge with an `HX-Trigger` so other fragments refresh.
#[instrument(skip(session, form))]
pub async fn add(session: Session, Form(form): Form<AddToCartForm>) -> Response {
    let mut cart = load_cart(&session).await;

    let added = cart.add(CartItem {
        id: form.id,
        name: form.name,
        sku: form.sku,
        price: form.price,
        image: form.image,
        in_stock: form.in_stock.unwrap_or(true),
    });

    if added && let Err(e) = save_cart(&session, &cart).await {
        tracing::error!(error = %e, "failed to save cart");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate { count: cart.len() },
    )
        .into_response()
}

/// Remove an item from the cart (HTMX). Absent ids are no-ops.
#[instrument(skip(session, form))]
pub async fn remove(session: Session, Form(form): Form<CartItemForm>) -> Response {
    let mut cart = load_cart(&session).await;

    if cart.remove(form.id.as_str())
        && let Err(e) = save_cart(&session, &cart).await
    {
        tracing::error!(error = %e, "failed to save cart");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response()
}

/// Empty the cart (HTMX).
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Response {
    let mut cart = load_cart(&session).await;
    cart.clear();

    if let Err(e) = save_cart(&session, &cart).await {
        tracing::error!(error = %e, "failed to save cart");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response()
}

/// Move one item from the cart to the wishlist (HTMX).
///
/// Add-then-remove, deliberately not atomic: a failure between the two
/// leaves the item in both collections rather than in neither.
#[instrument(skip(session, form))]
pub async fn move_to_wishlist(session: Session, Form(form): Form<CartItemForm>) -> Response {
    let mut cart = load_cart(&session).await;

    if let Some(item) = cart.get(form.id.as_str()).cloned() {
        let mut wishlist = load_wishlist(&session).await;
        wishlist.add(item.into());
        if let Err(e) = save_wishlist(&session, &wishlist).await {
            tracing::error!(error = %e, "failed to save wishlist");
        }

        cart.remove(form.id.as_str());
        if let Err(e) = save_cart(&session, &cart).await {
            tracing::error!(error = %e, "failed to save cart");
        }
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated, wishlist-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
        .into_response()
}

/// Get the cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    CartCountTemplate { count: cart.len() }
}
