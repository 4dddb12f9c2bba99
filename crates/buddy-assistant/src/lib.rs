//! buddy-assistant: the chat pipeline
//!
//! This crate owns the request/response contract with the hosted
//! conversational-AI endpoint, the interpretation of its free-text replies,
//! and the heuristic extraction that turns those replies into a structured
//! purchase draft.

pub mod client;
pub mod error;
pub mod extract;
pub mod interpret;
pub mod types;
pub mod widget;

pub use client::{AssistantClient, AssistantTransport, Endpoint, HttpTransport};
pub use error::{Error, Result};
pub use extract::{PurchaseDraft, extract_purchase_draft};
pub use interpret::{Reply, interpret};
pub use types::{ConversationContext, HistoryMessage, HistoryRole, PredictionRequest};
pub use widget::ChatWidget;
