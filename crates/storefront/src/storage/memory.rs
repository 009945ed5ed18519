//! In-memory persistent store.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{PersistentStore, StorageError};

/// A [`PersistentStore`] backed by a process-local map.
///
/// Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with one slot already populated.
    #[must_use]
    pub fn with_slot(key: &str, value: &str) -> Self {
        let mut slots = HashMap::new();
        slots.insert(key.to_string(), value.to_string());
        Self {
            slots: Mutex::new(slots),
        }
    }
}

impl PersistentStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self
            .slots
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_returns_none() {
        let store = MemoryStore::new();
        assert!(store.read("nothing").unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let store = MemoryStore::new();
        store.write("cart", "[]").unwrap();
        assert_eq!(store.read("cart").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_write_overwrites() {
        let store = MemoryStore::with_slot("cart", "[1]");
        store.write("cart", "[2]").unwrap();
        assert_eq!(store.read("cart").unwrap().as_deref(), Some("[2]"));
        assert!(store.read("other").unwrap().is_none());
    }
}
