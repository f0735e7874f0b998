//! Starred chat messages.

use serde_json::json;

use super::client::ApiClient;
use super::types::Favorite;
use crate::error::ApiError;

/// GET /chat-favorites/.
pub async fn list(client: &ApiClient) -> Result<Vec<Favorite>, ApiError> {
    client.authenticated_get("chat-favorites/").await
}

/// POST /chat-favorites/.
pub async fn add(
    client: &ApiClient,
    session_key: &str,
    agent_id: &str,
    message_id: &str,
    text: &str,
) -> Result<Favorite, ApiError> {
    let body = json!({
        "session_key": session_key,
        "agent_id": agent_id,
        "message_id": message_id,
        "text": text,
    });
    client.authenticated_post("chat-favorites/", &body).await
}

/// DELETE /chat-favorites/{message_id}.
pub async fn delete(client: &ApiClient, message_id: &str) -> Result<(), ApiError> {
    client
        .authenticated_delete(&format!("chat-favorites/{}", urlencoding::encode(message_id)))
        .await
}
