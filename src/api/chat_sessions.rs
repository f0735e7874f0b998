//! Chat session endpoints.

use serde_json::json;

use super::client::{ApiClient, ApiRequest};
use super::types::ChatSession;
use crate::error::ApiError;

/// GET /chat-session/.
pub async fn list(client: &ApiClient) -> Result<Vec<ChatSession>, ApiError> {
    client.authenticated_get("chat-session/").await
}

/// POST /chat-session/ to record a new conversation.
pub async fn create(
    client: &ApiClient,
    session_key: &str,
    agent_id: &str,
    first_message: &str,
) -> Result<ChatSession, ApiError> {
    let body = json!({
        "session_key": session_key,
        "agent_id": agent_id,
        "first_message": first_message,
    });
    client.authenticated_post("chat-session/", &body).await
}

/// DELETE /chat-session/ with the session identified in the body.
pub async fn delete(client: &ApiClient, session_key: &str, agent_id: &str) -> Result<(), ApiError> {
    let request = ApiRequest::delete("chat-session/")
        .json(&json!({ "session_key": session_key, "agent_id": agent_id }))?;
    client.send(&request).await?;
    Ok(())
}
