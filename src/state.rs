//! Session state shared by the CLI commands.
//!
//! Holds the API client (and through it the token store) plus the entity
//! cache. Logging out clears both.

use std::sync::Arc;

use crate::api::client::ApiClient;
use crate::config::Config;
use crate::error::ConfigError;
use crate::store::Store;
use crate::tokens::TokenStore;

pub struct AppState {
    pub config: Config,
    /// HTTP client for console API communication.
    pub api: Arc<ApiClient>,
    /// Entity cache shared by feature workflows.
    pub store: Store,
}

impl AppState {
    /// Open token storage and build the API client from `config`.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let tokens = Arc::new(config.open_token_store()?);
        Ok(Self::with_tokens(config, tokens))
    }

    pub fn with_tokens(config: Config, tokens: Arc<TokenStore>) -> Self {
        let api = Arc::new(config.build_client(tokens));
        Self {
            config,
            api,
            store: Store::new(),
        }
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        self.api.tokens()
    }

    /// Drop cached entities and stored tokens without contacting the server.
    pub fn clear_session(&self) {
        self.store.reset();
        self.tokens().clear();
    }
}
