//! Key-value persistence
//!
//! Everything the notebook keeps lives in a handful of string blobs addressed
//! by fixed keys. Reads never fail: a missing or unreadable blob is `None` and
//! callers treat it as empty. Writes are last-write-wins with no retry.

mod file_storage;
mod memory;

pub use file_storage::{FileStorage, Result, StorageError};
pub use memory::MemoryStorage;

/// Minimal get/set store the notebook is persisted through
pub trait KeyValueStore {
    /// Read the raw value stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Replace the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
