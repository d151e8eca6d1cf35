//! Session-backed line-item collections.
//!
//! Cart and wishlist are two instances of the same structure: an ordered,
//! id-deduplicated collection serialized into the session on every mutation
//! and loaded once per request. The collections are independent of the
//! authenticated session and of the network - mutations never call the
//! backend.
//!
//! There is no coordination across concurrent clients holding the same
//! session cookie: the last write wins, silently.

pub mod cart;
pub mod wishlist;

pub use cart::{Cart, CartItem};
pub use wishlist::{WishlistItem, Wishlist};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tower_sessions::Session;

/// An item that can live in a collection, keyed by its id.
pub trait LineItem: Clone + Serialize + DeserializeOwned {
    /// The deduplication key.
    fn id(&self) -> &str;
}

/// An ordered collection of line items with unique ids.
///
/// Serializes transparently as a bare JSON array so the stored shape is
/// exactly the item list.
#[derive(Debug, Clone, Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ItemCollection<T> {
    items: Vec<T>,
}

impl<T> Default for ItemCollection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: LineItem> ItemCollection<T> {
    /// Add an item, preserving insertion order.
    ///
    /// Adding an id that is already present is a no-op returning `false`:
    /// the first-added attributes win, even if the new item differs.
    pub fn add(&mut self, item: T) -> bool {
        if self.contains(item.id()) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove at most one item with the given id.
    ///
    /// Returns `false` (and changes nothing) when the id is absent.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() < before
    }

    /// Membership predicate.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id() == id)
    }

    /// Find an item by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Empty the collection.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Load a collection from the session.
///
/// Corrupt stored data is logged and treated as an empty collection rather
/// than failing hard or surfacing to the user.
pub async fn load<T: LineItem>(session: &Session, key: &str) -> ItemCollection<T> {
    match session.get::<ItemCollection<T>>(key).await {
        Ok(Some(collection)) => collection,
        Ok(None) => ItemCollection::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "corrupt stored collection, starting empty");
            ItemCollection::default()
        }
    }
}

/// Serialize a collection back into the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save<T: LineItem>(
    session: &Session,
    key: &str,
    collection: &ItemCollection<T>,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(key, collection).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn item(id: &str, price: i64) -> CartItem {
        CartItem {
            id: id.into(),
            name: format!("Item {id}"),
            sku: format!("SKU-{id}"),
            price: Decimal::new(price, 2),
            image: String::new(),
            in_stock: true,
        }
    }

    #[test]
    fn test_duplicate_add_keeps_first_attributes() {
        let mut collection = Cart::default();

        assert!(collection.add(item("p1", 1000)));
        assert!(!collection.add(item("p1", 2500)));

        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get("p1").unwrap().price, Decimal::new(1000, 2));
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let mut collection = Cart::default();
        collection.add(item("p1", 1000));

        assert!(!collection.remove("p2"));
        assert_eq!(collection.len(), 1);

        assert!(collection.remove("p1"));
        assert!(collection.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut collection = Cart::default();
        collection.add(item("b", 1));
        collection.add(item("a", 2));
        collection.add(item("c", 3));

        let ids: Vec<&str> = collection.items().iter().map(LineItem::id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_clear_empties() {
        let mut collection = Cart::default();
        collection.add(item("p1", 1000));
        collection.add(item("p2", 2000));

        collection.clear();
        assert!(collection.is_empty());
        assert!(!collection.contains("p1"));
    }

    #[test]
    fn test_serializes_as_bare_array() {
        let mut collection = Cart::default();
        collection.add(item("p1", 1050));

        let json = serde_json::to_value(&collection).unwrap();
        assert!(json.is_array());
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["id"], "p1");
        // Price stored as a JSON float, matching the backend's wire format.
        assert_eq!(json[0]["price"], 10.5);
    }

    #[test]
    fn test_corrupt_shapes_fail_deserialization() {
        // `load` maps these failures to an empty collection.
        assert!(serde_json::from_str::<Cart>(r#"{"bogus": true}"#).is_err());
        assert!(serde_json::from_str::<Cart>(r#"[{"id": 1}]"#).is_err());
    }
}
