//! Bot (agent) endpoints.

use serde_json::json;

use super::client::{ApiClient, ApiRequest};
use super::types::{Agent, AgentPatch, AgentQuery, NewAgent, Paginated};
use crate::error::ApiError;

fn bot_path(id: &str) -> String {
    format!("bots/{}/", urlencoding::encode(id))
}

/// GET /bots/ with optional paging, search and active filter.
pub async fn list(client: &ApiClient, query: &AgentQuery) -> Result<Paginated<Agent>, ApiError> {
    let request = ApiRequest::get("bots/")
        .query_opt("page", query.page)
        .query_opt("page_size", query.page_size)
        .query_opt("search", query.search.as_deref())
        .query_opt("active", query.active);
    client.send_json(&request).await
}

/// GET /bots/{id}/.
pub async fn get(client: &ApiClient, id: &str) -> Result<Agent, ApiError> {
    client.authenticated_get(&bot_path(id)).await
}

/// POST /bots/.
pub async fn create(client: &ApiClient, payload: &NewAgent) -> Result<Agent, ApiError> {
    client.authenticated_post("bots/", payload).await
}

/// PATCH /bots/{id}/.
pub async fn patch(client: &ApiClient, id: &str, payload: &AgentPatch) -> Result<Agent, ApiError> {
    client.authenticated_patch(&bot_path(id), payload).await
}

/// POST /bots/{id}/expertise/. `None` detaches the expertise area.
pub async fn set_expertise(
    client: &ApiClient,
    id: &str,
    expertise_id: Option<&str>,
) -> Result<Agent, ApiError> {
    let path = format!("{}expertise/", bot_path(id));
    client
        .authenticated_post(&path, &json!({ "expertise_area": expertise_id }))
        .await
}

/// DELETE /bots/{id}/.
pub async fn remove(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.authenticated_delete(&bot_path(id)).await
}
