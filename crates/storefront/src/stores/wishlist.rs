//! Wishlist collection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use circuitfab_core::ProductId;

use super::cart::CartItem;
use super::{ItemCollection, LineItem};
use crate::models::session_keys;

/// A wishlist entry: the cart fields plus review metadata for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews: i64,
}

impl LineItem for WishlistItem {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl From<CartItem> for WishlistItem {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            sku: item.sku,
            price: item.price,
            image: item.image,
            in_stock: item.in_stock,
            rating: 0.0,
            reviews: 0,
        }
    }
}

impl From<WishlistItem> for CartItem {
    fn from(item: WishlistItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            sku: item.sku,
            price: item.price,
            image: item.image,
            in_stock: item.in_stock,
        }
    }
}

/// The wishlist collection.
pub type Wishlist = ItemCollection<WishlistItem>;

/// Load the wishlist from the session (corrupt data → empty).
pub async fn load_wishlist(session: &Session) -> Wishlist {
    super::load(session, session_keys::WISHLIST).await
}

/// Persist the wishlist to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_wishlist(
    session: &Session,
    wishlist: &Wishlist,
) -> Result<(), tower_sessions::session::Error> {
    super::save(session, session_keys::WISHLIST, wishlist).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_item_round_trips_through_wishlist() {
        let cart_item = CartItem {
            id: "p1".into(),
            name: "4-layer prototype".into(),
            sku: "PCB-4L".into(),
            price: Decimal::new(12950, 2),
            image: "/img/pcb.png".into(),
            in_stock: true,
        };

        let wish: WishlistItem = cart_item.clone().into();
        assert_eq!(wish.rating, 0.0);
        assert_eq!(wish.reviews, 0);

        let back: CartItem = wish.into();
        assert_eq!(back.id, cart_item.id);
        assert_eq!(back.price, cart_item.price);
    }
}
