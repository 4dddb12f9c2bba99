//! buddy-store: session-scoped persistence
//!
//! This crate provides the key-value storage abstraction that backs the
//! conversation log, the cart, and order records, so every consumer can be
//! tested against an in-memory store.

pub mod cart;
pub mod error;
pub mod history;
pub mod kv;
pub mod orders;

pub use cart::{CartItem, CartStore};
pub use error::{Error, Result};
pub use history::{ChatRole, ChatTurn, ConversationStore, HISTORY_CAP};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use orders::{Order, OrderLine, OrderStatus, OrderStore, PaymentRecord};
