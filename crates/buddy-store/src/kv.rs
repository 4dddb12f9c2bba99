//! Key-value storage abstraction
//!
//! The conversation log, the cart, and order records all persist through
//! [`KeyValueStore`]. Production code uses [`FileStore`] (one file per key
//! under the user data directory); tests inject [`MemoryStore`].

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::error::Result;

/// Minimal string-keyed storage interface.
///
/// `get` is infallible by design: a missing or unreadable value is `None`.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// File-backed store: one file per key under a storage directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Default storage directory
    pub fn storage_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("techbuddy")
            .join("storage")
    }

    /// Open a store rooted at the default storage directory.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::storage_dir())
    }

    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys like `order_ORD_...` are already filesystem-safe; anything
        // else is reduced to [A-Za-z0-9_-].
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!("unreadable storage entry {}: {}", path.display(), e);
                }
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("cart"), None);

        store.set("cart", "[]").unwrap();
        assert_eq!(store.get("cart").as_deref(), Some("[]"));

        store.remove("cart").unwrap();
        assert_eq!(store.get("cart"), None);
    }

    #[test]
    fn test_memory_store_overwrite() {
        let store = MemoryStore::new();
        store.set("k", "a").unwrap();
        store.set("k", "b").unwrap();
        assert_eq!(store.get("k").as_deref(), Some("b"));
    }

    #[test]
    fn test_remove_absent_key_is_noop() {
        let store = MemoryStore::new();
        store.remove("nothing").unwrap();

        let dir = tempfile::tempdir().unwrap();
        let file_store = FileStore::open(dir.path()).unwrap();
        file_store.remove("nothing").unwrap();
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert_eq!(store.get("chatHistory"), None);
        store.set("chatHistory", "[1,2]").unwrap();
        assert_eq!(store.get("chatHistory").as_deref(), Some("[1,2]"));
        store.remove("chatHistory").unwrap();
        assert_eq!(store.get("chatHistory"), None);
    }

    #[test]
    fn test_file_store_sanitizes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("weird/key name", "x").unwrap();
        assert_eq!(store.get("weird/key name").as_deref(), Some("x"));
        // The file itself must stay inside the storage directory.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
