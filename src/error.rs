//! Error types for the console client.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by [`ApiClient`](crate::api::client::ApiClient) and the
/// service functions built on it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (DNS, connect, TLS, reading the body).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Request failed ({status}): {body}")]
    Status { status: StatusCode, body: String },

    /// The response body did not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// A request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(String),

    /// The access token could not be refreshed; stored tokens were cleared
    /// and the user has to log in again.
    #[error("Session expired: {0}")]
    SessionExpired(String),
}

impl ApiError {
    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

/// Token storage backend failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Keychain operation failed: {0}")]
    Keychain(String),

    #[error("Token file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl From<keyring::Error> for StorageError {
    fn from(err: keyring::Error) -> Self {
        StorageError::Keychain(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("No data directory available for the token file; set ENLAIGHT_TOKEN_FILE")]
    NoDataDir,
}
