//! Order persistence
//!
//! Confirmed orders live one-per-key under `order_{orderId}` and are never
//! mutated after being written. A separate `pendingOrders` map holds staged
//! order state for flows that collect payment in a later step.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::kv::KeyValueStore;

const PENDING_KEY: &str = "pendingOrders";

/// Lifecycle state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
}

/// Payment details retained with an order. Only the last four digits of the
/// card survive; the full number is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub method: String,
    pub last_four_digits: String,
}

/// One purchased item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub category: String,
    pub is_bundle: bool,
}

/// A confirmed, persisted purchase record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub status: OrderStatus,
    pub total_price: f64,
    pub items: Vec<OrderLine>,
    pub payment: PaymentRecord,
    pub created_at: DateTime<Utc>,
}

/// Order records persisted through the key-value store.
pub struct OrderStore {
    kv: Arc<dyn KeyValueStore>,
}

impl OrderStore {
    /// Create an order store over the given backend
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Persist a confirmed order under `order_{orderId}`.
    pub fn put(&self, order: &Order) -> Result<()> {
        let key = format!("order_{}", order.order_id);
        self.kv.set(&key, &serde_json::to_string(order)?)
    }

    /// Read an order back by id.
    pub fn get(&self, order_id: &str) -> Option<Order> {
        let raw = self.kv.get(&format!("order_{}", order_id))?;
        match serde_json::from_str(&raw) {
            Ok(order) => Some(order),
            Err(e) => {
                tracing::debug!("discarding corrupt order {}: {}", order_id, e);
                None
            }
        }
    }

    /// Stage a pending order in the `pendingOrders` map.
    pub fn stage_pending(&self, order: &Order) -> Result<()> {
        let mut pending = self.pending();
        pending.insert(order.order_id.clone(), order.clone());
        self.kv.set(PENDING_KEY, &serde_json::to_string(&pending)?)
    }

    /// Update the status of a staged order. Unknown ids are ignored.
    pub fn update_pending_status(&self, order_id: &str, status: OrderStatus) -> Result<()> {
        let mut pending = self.pending();
        if let Some(order) = pending.get_mut(order_id) {
            order.status = status;
            self.kv.set(PENDING_KEY, &serde_json::to_string(&pending)?)?;
        }
        Ok(())
    }

    /// The staged order map. Corrupt content reads as empty.
    pub fn pending(&self) -> HashMap<String, Order> {
        let Some(raw) = self.kv.get(PENDING_KEY) else {
            return HashMap::new();
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                tracing::debug!("discarding corrupt pending orders: {}", e);
                HashMap::new()
            }
        }
    }
}
