//! Keychain-backed token storage.
//!
//! Uses the `keyring` crate so tokens land in the platform credential store
//! (macOS Keychain, Secret Service, Windows Credential Manager), never on disk.

use keyring::Entry;

use super::TokenBackend;
use crate::error::StorageError;

/// Keychain service name for console entries.
pub const SERVICE_NAME: &str = "ai.enlaight.console";

#[derive(Debug, Default)]
pub struct KeyringBackend;

impl KeyringBackend {
    pub fn new() -> Self {
        Self
    }

    fn entry(&self, key: &str) -> Result<Entry, StorageError> {
        Ok(Entry::new(SERVICE_NAME, key)?)
    }
}

impl TokenBackend for KeyringBackend {
    /// Returns `None` if no entry exists (never logged in, or logged out).
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.entry(key)?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StorageError::from(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entry(key)?.set_password(value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // already gone
            Err(e) => Err(StorageError::from(e)),
        }
    }
}
