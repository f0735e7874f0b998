//! Project endpoints, including bot and user attachment.

use serde_json::{json, Value};

use super::client::{ApiClient, ApiRequest};
use super::types::{Agent, AttachResult, DetachResult, Paginated, Project, ProjectForm};
use crate::error::ApiError;

fn project_path(id: &str) -> String {
    format!("projects/{}/", urlencoding::encode(id))
}

/// The API takes `bot_id` for a single bot and `bot_ids` for several.
fn bot_selection(ids: &[String]) -> Value {
    match ids {
        [single] => json!({ "bot_id": single }),
        many => json!({ "bot_ids": many }),
    }
}

/// GET /projects/ one page at a time, optionally filtered by `search`.
pub async fn list(
    client: &ApiClient,
    page: u32,
    page_size: u32,
    search: Option<&str>,
) -> Result<Paginated<Project>, ApiError> {
    let request = ApiRequest::get("projects/")
        .query("page", page)
        .query("page_size", page_size)
        .query_opt("search", search.filter(|s| !s.is_empty()));
    client.send_json(&request).await
}

/// POST /projects/.
pub async fn create(client: &ApiClient, form: &ProjectForm) -> Result<Project, ApiError> {
    client.authenticated_post("projects/", form).await
}

/// PATCH /projects/{id}/.
pub async fn edit(client: &ApiClient, id: &str, form: &ProjectForm) -> Result<Project, ApiError> {
    client.authenticated_patch(&project_path(id), form).await
}

/// DELETE /projects/{id}/.
pub async fn delete(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.authenticated_delete(&project_path(id)).await
}

/// GET /projects/{id}/bots/.
pub async fn bots(client: &ApiClient, id: &str) -> Result<Vec<Agent>, ApiError> {
    client
        .authenticated_get(&format!("{}bots/", project_path(id)))
        .await
}

/// POST /projects/{id}/bots/attach/.
pub async fn attach_bots(client: &ApiClient, id: &str, bot_ids: &[String]) -> Result<AttachResult, ApiError> {
    let path = format!("{}bots/attach/", project_path(id));
    client.authenticated_post(&path, &bot_selection(bot_ids)).await
}

/// POST /projects/{id}/bots/detach/.
pub async fn detach_bots(client: &ApiClient, id: &str, bot_ids: &[String]) -> Result<DetachResult, ApiError> {
    let path = format!("{}bots/detach/", project_path(id));
    client.authenticated_post(&path, &bot_selection(bot_ids)).await
}

/// POST /projects/{id}/users/attach/.
pub async fn attach_users(client: &ApiClient, id: &str, user_ids: &[String]) -> Result<(), ApiError> {
    let request = ApiRequest::post(format!("{}users/attach/", project_path(id)))
        .json(&json!({ "user_ids": user_ids }))?;
    client.send(&request).await?;
    Ok(())
}

/// POST /projects/{id}/users/detach/.
pub async fn detach_users(client: &ApiClient, id: &str, user_ids: &[String]) -> Result<(), ApiError> {
    let request = ApiRequest::post(format!("{}users/detach/", project_path(id)))
        .json(&json!({ "user_ids": user_ids }))?;
    client.send(&request).await?;
    Ok(())
}
