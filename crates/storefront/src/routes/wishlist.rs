//! Wishlist route handlers.
//!
//! Structurally the cart's twin: same collection contract, same HTMX
//! fragment flow, plus review metadata on the items.

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
use crate::stores::cart::{load_cart, save_cart};
use crate::stores::wishlist::{Wishlist, WishlistItem, load_wishlist, save_wishlist};

/// Wishlist item display data for templates.
#[derive(Clone)]
pub struct WishlistItemView {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub price: String,
    pub image: String,
    pub in_stock: bool,
    pub rating: f64,
    pub reviews: i64,
}

/// Wishlist display data for templates.
#[derive(Clone)]
pub struct WishlistView {
    pub items: Vec<WishlistItemView>,
    pub count: usize,
}

impl From<&Wishlist> for WishlistView {
    fn from(wishlist: &Wishlist) -> Self {
        Self {
            items: wishlist.items().iter().map(WishlistItemView::from).collect(),
            count: wishlist.len(),
        }
    }
}

impl From<&WishlistItem> for WishlistItemView {
    fn from(item: &WishlistItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            sku: item.sku.clone(),
            price: format_price(item.price),
            image: item.image.clone(),
            in_stock: item.in_stock,
            rating: item.rating,
            reviews: item.reviews,
        }
    }
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to wishlist form data.
#[derive(Debug, Deserialize)]
pub struct AddToWishlistForm {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub in_stock: Option<bool>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub reviews: Option<i64>,
}

/// Remove / move form data.
#[derive(Debug, Deserialize)]
pub struct WishlistItemForm {
    pub id: ProductId,
}

// =============================================================================
// Templates
// =============================================================================

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/show.html")]
pub struct WishlistShowTemplate {
    pub wishlist: WishlistView,
}

/// Wishlist items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/wishlist_items.html")]
pub struct WishlistItemsTemplate {
    pub wishlist: WishlistView,
}

/// Wishlist count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/wishlist_count.html")]
pub struct WishlistCountTemplate {
    pub count: usize,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the wishlist page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> impl IntoResponse {
    let wishlist = load_wishlist(&session).await;
    WishlistShowTemplate {
        wishlist: WishlistView::from(&wishlist),
    }
}

/// Add an item to the wishlist (HTMX). Duplicate ids are no-ops.
#[instrument(skip(session, form))]
pub async fn add(session: Session, Form(form): Form<AddToWishlistForm>) -> Response {
    let mut wishlist = load_wishlist(&session).await;

    let added = wishlist.add(WishlistItem {
        id: form.id,
        name: form.name,
        sku: form.sku,
        price: form.price,
        image: form.image,
        in_stock: form.in_stock.unwrap_or(true),
        rating: form.rating.unwrap_or(0.0),
        reviews: form.reviews.unwrap_or(0),
    });

    if added && let Err(e) = save_wishlist(&session, &wishlist).await {
        tracing::error!(error = %e, "failed to save wishlist");
    }

    (
        AppendHeaders([("HX-Trigger", "wishlist-updated")]),
        WishlistCountTemplate {
            count: wishlist.len(),
        },
    )
        .into_response()
}

/// Remove an item from the wishlist (HTMX). Absent ids are no-ops.
#[instrument(skip(session, form))]
pub async fn remove(session: Session, Form(form): Form<WishlistItemForm>) -> Response {
    let mut wishlist = load_wishlist(&session).await;

    if wishlist.remove(form.id.as_str())
        && let Err(e) = save_wishlist(&session, &wishlist).await
    {
        tracing::error!(error = %e, "failed to save wishlist");
    }

    (
        AppendHeaders([("HX-Trigger", "wishlist-updated")]),
        WishlistItemsTemplate {
            wishlist: WishlistView::from(&wishlist),
        },
    )
        .into_response()
}

/// Empty the wishlist (HTMX).
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Response {
    let mut wishlist = load_wishlist(&session).await;
    wishlist.clear();

    if let Err(e) = save_wishlist(&session, &wishlist).await {
        tracing::error!(error = %e, "failed to save wishlist");
    }

    (
        AppendHeaders([("HX-Trigger", "wishlist-updated")]),
        WishlistItemsTemplate {
            wishlist: WishlistView::from(&wishlist),
        },
    )
        .into_response()
}

/// Move one item from the wishlist to the cart (HTMX).
///
/// Add-then-remove, deliberately not atomic (see the cart's counterpart).
#[instrument(skip(session, form))]
pub async fn move_to_cart(session: Session, Form(form): Form<WishlistItemForm>) -> Response {
    let mut wishlist = load_wishlist(&session).await;

    if let Some(item) = wishlist.get(form.id.as_str()).cloned() {
        let mut cart = load_cart(&session).await;
        cart.add(item.into());
        if let Err(e) = save_cart(&session, &cart).await {
            tracing::error!(error = %e, "failed to save cart");
        }

        wishlist.remove(form.id.as_str());
        if let Err(e) = save_wishlist(&session, &wishlist).await {
            tracing::error!(error = %e, "failed to save wishlist");
        }
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated, wishlist-updated")]),
        WishlistItemsTemplate {
            wishlist: WishlistView::from(&wishlist),
        },
    )
        .into_response()
}

/// Get the wishlist count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let wishlist = load_wishlist(&session).await;
    WishlistCountTemplate {
        count: wishlist.len(),
    }
}
