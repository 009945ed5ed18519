//! Durable key-value slots for the serialized cart.
//!
//! A [`PersistentStore`] holds whole blobs under string keys. The cart is
//! written to a single slot in full after every successful mutation, so the
//! backends only need get/set of one value at a time. Writes are synchronous
//! and atomic per blob; there are no transactional or multi-writer
//! guarantees.
//!
//! # Backends
//!
//! - [`MemoryStore`] - process-local map, for tests and throwaway sessions
//! - [`FileStore`] - one JSON file per key under a directory

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors that can occur when reading or writing a persistent slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on slot {key}: {source}")]
    Io {
        /// Slot key being accessed.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The backend cannot serve requests (e.g. a poisoned lock).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A durable key-value slot holding serialized blobs.
pub trait PersistentStore: Send + Sync {
    /// Read the blob stored under `key`, or `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to read an existing slot.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob could not be written. The previous value
    /// is left intact in that case.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
