//! Runtime configuration, read from the environment (after `.env` loading).
//!
//! | Variable                | Fallback            | Default                     |
//! |-------------------------|---------------------|-----------------------------|
//! | `ENLAIGHT_API_URL`      | `VITE_API_BASE_URL` | `http://localhost:8000/api` |
//! | `ENLAIGHT_AUTH_SCHEME`  | `VITE_AUTH_SCHEME`  | `Bearer`                    |
//! | `ENLAIGHT_REFRESH_PATH` |                     | `token/refresh/`            |
//! | `ENLAIGHT_TOKEN_STORE`  |                     | `keyring`                   |
//! | `ENLAIGHT_TOKEN_FILE`   |                     | platform data dir           |

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::api::client::{ApiClient, DEFAULT_AUTH_SCHEME, DEFAULT_REFRESH_PATH};
use crate::error::ConfigError;
use crate::tokens::{FileBackend, KeyringBackend, TokenStore};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Where the token pair is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStoreKind {
    Keyring,
    File,
    Memory,
}

impl FromStr for TokenStoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyring" | "keychain" => Ok(TokenStoreKind::Keyring),
            "file" => Ok(TokenStoreKind::File),
            "memory" => Ok(TokenStoreKind::Memory),
            _ => Err(ConfigError::Invalid {
                name: "ENLAIGHT_TOKEN_STORE",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// API base URL without trailing slash.
    pub api_base_url: String,
    pub auth_scheme: String,
    /// Refresh endpoint relative to the base URL.
    pub refresh_path: String,
    pub token_store: TokenStoreKind,
    /// Token file for [`TokenStoreKind::File`]; the platform default if unset.
    pub token_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup. Empty
    /// values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_base_url = var("ENLAIGHT_API_URL")
            .or_else(|| var("VITE_API_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_base_url = api_base_url.trim().trim_end_matches('/').to_string();
        if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                name: "ENLAIGHT_API_URL",
                value: api_base_url,
            });
        }

        let auth_scheme = var("ENLAIGHT_AUTH_SCHEME")
            .or_else(|| var("VITE_AUTH_SCHEME"))
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_AUTH_SCHEME.to_string());

        let token_store = match var("ENLAIGHT_TOKEN_STORE") {
            Some(raw) => raw.parse()?,
            None => TokenStoreKind::Keyring,
        };

        Ok(Config {
            api_base_url,
            auth_scheme,
            refresh_path: var("ENLAIGHT_REFRESH_PATH")
                .unwrap_or_else(|| DEFAULT_REFRESH_PATH.to_string()),
            token_store,
            token_file: var("ENLAIGHT_TOKEN_FILE").map(PathBuf::from),
        })
    }

    /// Open the configured token storage.
    pub fn open_token_store(&self) -> Result<TokenStore, ConfigError> {
        let store = match self.token_store {
            TokenStoreKind::Keyring => TokenStore::new(KeyringBackend::new()),
            TokenStoreKind::File => {
                let path = match &self.token_file {
                    Some(path) => path.clone(),
                    None => FileBackend::default_path()?,
                };
                log::debug!("Using token file {}", path.display());
                TokenStore::new(FileBackend::new(path))
            }
            TokenStoreKind::Memory => TokenStore::in_memory(),
        };
        Ok(store)
    }

    /// API client bound to `tokens`.
    pub fn build_client(&self, tokens: Arc<TokenStore>) -> ApiClient {
        ApiClient::new(&self.api_base_url, tokens)
            .with_auth_scheme(&self.auth_scheme)
            .with_refresh_path(&self.refresh_path)
    }
}
