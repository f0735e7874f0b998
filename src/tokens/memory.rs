//! Process-local token storage. Used by tests and `--token-store memory`.

use std::collections::HashMap;
use std::sync::Mutex;

use zeroize::Zeroizing;

use super::TokenBackend;
use crate::error::StorageError;

/// Values are wiped from memory when overwritten or removed.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, Zeroizing<String>>>,
}

impl TokenBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).map(|v| v.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), Zeroizing::new(value.to_string()));
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}
