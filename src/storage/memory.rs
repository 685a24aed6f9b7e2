use std::collections::HashMap;

use super::file_storage::{Result, StorageError};
use super::KeyValueStore;

/// In-memory key-value store
///
/// Used by tests and as a scratch store. `failing()` builds a store whose
/// writes always fail, for exercising the write-failure path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    fail_writes: bool,
    write_count: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Seed a raw value without counting it as a write
    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful `set` calls so far
    pub fn write_count(&self) -> usize {
        self.write_count
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(StorageError::Io(std::io::Error::other(format!(
                "write to {} refused",
                key
            ))));
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.write_count += 1;
        Ok(())
    }
}
