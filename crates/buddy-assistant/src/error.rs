//! Error types for buddy-assistant

use thiserror::Error;

/// Result type alias using buddy-assistant Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the remote assistant.
///
/// Nothing here is fatal: the client converts every failure into a visible
/// apology turn before propagating, so the widget stays usable.
#[derive(Error, Debug)]
pub enum Error {
    /// Network-level failure before a status line was received
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success transport status, with the response body attached
    #[error("assistant endpoint returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Response body was not parseable as JSON
    #[error("malformed assistant response: {0}")]
    Json(#[from] serde_json::Error),

    /// Persisting a turn failed
    #[error(transparent)]
    Store(#[from] buddy_store::Error),
}

impl Error {
    /// Create an API error from a status code and body
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// True for transport-layer failures (network or non-2xx status).
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Api { .. })
    }
}
