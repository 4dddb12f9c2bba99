//! Conversation store: the durable log of chat turns
//!
//! Persists the transcript under the `chatHistory` key so the widget can
//! re-render on reopen and the assistant client can build request history.
//! The store is the single writer of that key.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::kv::KeyValueStore;

/// Maximum retained turns (10 exchanges); oldest entries drop first.
pub const HISTORY_CAP: usize = 20;

const HISTORY_KEY: &str = "chatHistory";

/// Who produced a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message in the chat widget, tagged by sender role.
///
/// Field names match the records the storefront has always written
/// (`type` / `message` / `timestamp`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    #[serde(rename = "type")]
    pub role: ChatRole,
    #[serde(rename = "message")]
    pub text: String,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    /// Create a user turn stamped now
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    /// Create an assistant turn stamped now
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            created_at: Utc::now(),
        }
    }
}

/// Append-only (except truncation) log of chat turns.
pub struct ConversationStore {
    kv: Arc<dyn KeyValueStore>,
}

impl ConversationStore {
    /// Create a conversation store over the given backend
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Append one turn and persist immediately.
    ///
    /// If the log would exceed [`HISTORY_CAP`], the oldest entries are
    /// dropped until exactly the cap remains.
    pub fn append(&self, turn: ChatTurn) -> Result<()> {
        let mut turns = self.read_all();
        turns.push(turn);
        if turns.len() > HISTORY_CAP {
            let excess = turns.len() - HISTORY_CAP;
            turns.drain(..excess);
        }
        self.kv.set(HISTORY_KEY, &serde_json::to_string(&turns)?)
    }

    /// The full retained sequence in insertion order.
    ///
    /// Absent or corrupt content reads as empty; the error is swallowed.
    pub fn read_all(&self) -> Vec<ChatTurn> {
        let Some(raw) = self.kv.get(HISTORY_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(turns) => turns,
            Err(e) => {
                tracing::debug!("discarding corrupt chat history: {}", e);
                Vec::new()
            }
        }
    }

    /// The most recent `n` turns, in insertion order.
    pub fn last(&self, n: usize) -> Vec<ChatTurn> {
        let turns = self.read_all();
        let skip = turns.len().saturating_sub(n);
        turns.into_iter().skip(skip).collect()
    }

    /// Empty the store.
    pub fn clear(&self) -> Result<()> {
        self.kv.remove(HISTORY_KEY)
    }
}
