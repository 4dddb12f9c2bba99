//! Error types for buddy-store

use thiserror::Error;

/// Result type alias using buddy-store Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when writing to the backing store.
///
/// Reads never fail: missing or corrupt content is recovered to an empty
/// default and logged, not surfaced.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem write failed
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized
    #[error("storage serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
