//! Cart persistence
//!
//! Line items under the `cart` key: product fields plus a quantity.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::kv::KeyValueStore;

const CART_KEY: &str = "cart";

/// One line in the cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub category: String,
}

/// Cart state persisted through the key-value store.
pub struct CartStore {
    kv: Arc<dyn KeyValueStore>,
}

impl CartStore {
    /// Create a cart store over the given backend
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Current line items. Corrupt content reads as empty.
    pub fn items(&self) -> Vec<CartItem> {
        let Some(raw) = self.kv.get(CART_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::debug!("discarding corrupt cart: {}", e);
                Vec::new()
            }
        }
    }

    /// Add an item; an existing line with the same id absorbs the quantity.
    pub fn add(&self, item: CartItem) -> Result<()> {
        let mut items = self.items();
        if let Some(existing) = items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity += item.quantity;
        } else {
            items.push(item);
        }
        self.save(&items)
    }

    /// Remove the line with the given id, if present.
    pub fn remove(&self, id: &str) -> Result<()> {
        let items: Vec<CartItem> = self.items().into_iter().filter(|i| i.id != id).collect();
        self.save(&items)
    }

    /// Set a line's quantity; zero removes the line.
    pub fn set_quantity(&self, id: &str, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return self.remove(id);
        }
        let mut items = self.items();
        if let Some(item) = items.iter_mut().find(|i| i.id == id) {
            item.quantity = quantity;
        }
        self.save(&items)
    }

    /// Sum of price × quantity over all lines.
    pub fn total(&self) -> f64 {
        self.items()
            .iter()
            .map(|i| i.price * i.quantity as f64)
            .sum()
    }

    /// Remove the cart key entirely.
    pub fn clear(&self) -> Result<()> {
        self.kv.remove(CART_KEY)
    }

    fn save(&self, items: &[CartItem]) -> Result<()> {
        self.kv.set(CART_KEY, &serde_json::to_string(items)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    fn cart() -> CartStore {
        CartStore::new(Arc::new(MemoryStore::new()))
    }

    fn item(id: &str, price: f64, quantity: u32) -> CartItem {
        CartItem {
            id: id.to_string(),
            name: format!("Product {}", id),
            price,
            quantity,
            category: "components".to_string(),
        }
    }

    #[test]
    fn test_add_and_total() {
        let cart = cart();
        cart.add(item("cpu-1", 250.0, 1)).unwrap();
        cart.add(item("gpu-1", 400.0, 2)).unwrap();

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.total(), 1050.0);
    }

    #[test]
    fn test_duplicate_add_merges_quantity() {
        let cart = cart();
        cart.add(item("ssd-1", 80.0, 1)).unwrap();
        cart.add(item("ssd-1", 80.0, 2)).unwrap();

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let cart = cart();
        cart.add(item("ram-1", 60.0, 2)).unwrap();
        cart.set_quantity("ram-1", 0).unwrap();
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let cart = cart();
        cart.add(item("a", 10.0, 1)).unwrap();
        cart.add(item("b", 20.0, 1)).unwrap();

        cart.remove("a").unwrap();
        assert_eq!(cart.items().len(), 1);

        cart.clear().unwrap();
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_corrupt_cart_reads_as_empty() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(CART_KEY, "not an array").unwrap();
        let cart = CartStore::new(kv);
        assert!(cart.items().is_empty());
        assert_eq!(cart.total(), 0.0);
    }
}
