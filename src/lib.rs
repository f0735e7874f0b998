//! Client core of the enlaight admin console: token storage, an HTTP client
//! with single-flight token refresh, and an observable entity cache.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod features;
pub mod state;
pub mod store;
pub mod tokens;

pub use api::ApiClient;
pub use config::Config;
pub use error::ApiError;
pub use store::Store;
pub use tokens::TokenStore;
