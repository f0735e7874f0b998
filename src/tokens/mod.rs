//! Persistent access/refresh token storage.
//!
//! Tokens live in two independent string entries keyed `"access"` and
//! `"refresh"`. The [`TokenStore`] facade never fails: backend errors are
//! logged and reads fall back to `None`, so callers treat storage as always
//! available.

pub mod file;
pub mod keychain;
pub mod memory;

use std::sync::RwLock;

use crate::error::StorageError;

pub use file::FileBackend;
pub use keychain::KeyringBackend;
pub use memory::MemoryBackend;

/// Storage key for the short-lived access token.
pub const ACCESS_KEY: &str = "access";

/// Storage key for the longer-lived refresh token.
pub const REFRESH_KEY: &str = "refresh";

/// A string key-value store the tokens are persisted in.
pub trait TokenBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Remove an entry. Removing a missing entry is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Access/refresh token pair held by the console session.
pub struct TokenStore {
    backend: Box<dyn TokenBackend>,
    // Held for writing across multi-entry updates so readers never observe
    // a half-cleared pair.
    lock: RwLock<()>,
}

impl TokenStore {
    pub fn new(backend: impl TokenBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            lock: RwLock::new(()),
        }
    }

    /// Store backed by process memory only.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::default())
    }

    pub fn access_token(&self) -> Option<String> {
        let _guard = self.lock.read().unwrap_or_else(|e| e.into_inner());
        self.read(ACCESS_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        let _guard = self.lock.read().unwrap_or_else(|e| e.into_inner());
        self.read(REFRESH_KEY)
    }

    /// Store the access token, or clear it when `None` or empty.
    pub fn set_access_token(&self, token: Option<&str>) {
        let _guard = self.lock.write().unwrap_or_else(|e| e.into_inner());
        self.write(ACCESS_KEY, token);
    }

    /// Store the refresh token, or clear it when `None` or empty.
    pub fn set_refresh_token(&self, token: Option<&str>) {
        let _guard = self.lock.write().unwrap_or_else(|e| e.into_inner());
        self.write(REFRESH_KEY, token);
    }

    /// Replace both tokens at once (login).
    pub fn set_pair(&self, access: Option<&str>, refresh: Option<&str>) {
        let _guard = self.lock.write().unwrap_or_else(|e| e.into_inner());
        self.write(ACCESS_KEY, access);
        self.write(REFRESH_KEY, refresh);
    }

    /// Remove both tokens.
    pub fn clear(&self) {
        let _guard = self.lock.write().unwrap_or_else(|e| e.into_inner());
        self.write(ACCESS_KEY, None);
        self.write(REFRESH_KEY, None);
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                log::warn!("Failed to read {} token: {}", key, e);
                None
            }
        }
    }

    fn write(&self, key: &str, value: Option<&str>) {
        let result = match value {
            Some(v) if !v.is_empty() => self.backend.set(key, v),
            _ => self.backend.remove(key),
        };
        if let Err(e) = result {
            log::warn!("Failed to update {} token: {}", key, e);
        }
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("has_access", &self.access_token().is_some())
            .field("has_refresh", &self.refresh_token().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backend whose every operation fails, as a locked keychain would.
    struct BrokenBackend;

    impl TokenBackend for BrokenBackend {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Keychain("locked".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Keychain("locked".into()))
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Keychain("locked".into()))
        }
    }

    #[test]
    fn test_clear_tokens_reads_back_none() {
        let store = TokenStore::in_memory();
        store.set_pair(Some("a1"), Some("r1"));
        assert_eq!(store.access_token().as_deref(), Some("a1"));
        assert_eq!(store.refresh_token().as_deref(), Some("r1"));

        store.clear();
        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token(), None);
    }

    #[test]
    fn test_set_none_or_empty_clears_entry() {
        let store = TokenStore::in_memory();
        store.set_access_token(Some("a1"));
        store.set_access_token(None);
        assert_eq!(store.access_token(), None);

        store.set_refresh_token(Some("r1"));
        store.set_refresh_token(Some(""));
        assert_eq!(store.refresh_token(), None);
    }

    #[test]
    fn test_entries_are_independent() {
        let store = TokenStore::in_memory();
        store.set_access_token(Some("a1"));
        assert_eq!(store.refresh_token(), None);

        store.set_refresh_token(Some("r1"));
        store.set_access_token(Some("a2"));
        assert_eq!(store.access_token().as_deref(), Some("a2"));
        assert_eq!(store.refresh_token().as_deref(), Some("r1"));
    }

    #[test]
    fn test_backend_failure_degrades_to_none() {
        let store = TokenStore::new(BrokenBackend);
        store.set_pair(Some("a1"), Some("r1"));
        store.clear();
        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token(), None);
    }
}
