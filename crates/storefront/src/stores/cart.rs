//! Cart collection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use circuitfab_core::ProductId;

use super::{ItemCollection, LineItem};
use crate::models::session_keys;

/// A cart line. Items carry no quantity: duplicate adds are no-ops by
/// contract, so each id appears at most once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub in_stock: bool,
}

impl LineItem for CartItem {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

/// The cart collection.
pub type Cart = ItemCollection<CartItem>;

/// Load the cart from the session (corrupt data → empty).
pub async fn load_cart(session: &Session) -> Cart {
    super::load(session, session_keys::CART).await
}

/// Persist the cart to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    super::save(session, session_keys::CART, cart).await
}

/// Sum of line prices.
#[must_use]
pub fn subtotal(cart: &Cart) -> Decimal {
    cart.items().iter().map(|item| item.price).sum()
}
