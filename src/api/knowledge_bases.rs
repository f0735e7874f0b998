//! Knowledge-base endpoints. The server proxies these to the document
//! pipeline, so edit and delete answer with whatever JSON the pipeline sends.

use serde_json::{json, Value};

use super::client::{ApiClient, ApiRequest};
use super::types::{
    KnowledgeBase, KnowledgeBaseEdit, KnowledgeBaseFile, KnowledgeBaseFiles, KnowledgeBaseListing,
    NewKnowledgeBase,
};
use crate::error::ApiError;

/// GET /kb/list-all/ for one project.
///
/// Rows that only carry `external_id` get it copied into `hash_id`, the key
/// every other knowledge-base call takes.
pub async fn list_all(client: &ApiClient, project_id: &str) -> Result<Vec<KnowledgeBase>, ApiError> {
    let request = ApiRequest::get("kb/list-all/").query("project_id", project_id);
    let listing: KnowledgeBaseListing = client.send_json(&request).await?;
    Ok(listing
        .kbs
        .into_iter()
        .map(|mut kb| {
            if kb.hash_id.is_empty() {
                if let Some(ref external) = kb.external_id {
                    kb.hash_id = external.clone();
                }
            }
            kb
        })
        .collect())
}

/// POST /kb/create/.
pub async fn create(client: &ApiClient, payload: &NewKnowledgeBase) -> Result<KnowledgeBase, ApiError> {
    let mut created: Value = client.authenticated_post("kb/create/", payload).await?;
    // The pipeline answers in several shapes; pull out the identifier.
    let hash_id = ["hash_id", "id", "external_id"]
        .iter()
        .find_map(|key| created.get(*key).and_then(Value::as_str))
        .or_else(|| created.pointer("/data/hash_id").and_then(Value::as_str))
        .or_else(|| created.pointer("/kb/id").and_then(Value::as_str))
        .map(str::to_string)
        .ok_or_else(|| ApiError::Decode("knowledge base response carried no identifier".into()))?;

    if let Some(obj) = created.as_object_mut() {
        obj.insert("hash_id".into(), json!(hash_id));
        obj.entry("name").or_insert_with(|| json!(payload.name));
    }
    serde_json::from_value(created).map_err(|e| ApiError::Decode(e.to_string()))
}

/// PATCH /kb/edit/.
pub async fn edit(client: &ApiClient, payload: &KnowledgeBaseEdit) -> Result<Value, ApiError> {
    client.authenticated_patch("kb/edit/", payload).await
}

/// DELETE /kb/delete/ with the hash id in the body.
pub async fn delete(client: &ApiClient, hash_id: &str) -> Result<(), ApiError> {
    let request = ApiRequest::delete("kb/delete/").json(&json!({ "hash_id": hash_id }))?;
    client.send(&request).await?;
    Ok(())
}

/// GET /kb/files/list/.
pub async fn list_files(client: &ApiClient, hash_id: &str) -> Result<Vec<KnowledgeBaseFile>, ApiError> {
    let request = ApiRequest::get("kb/files/list/").query("hash_id", hash_id);
    let files: KnowledgeBaseFiles = client.send_json(&request).await?;
    Ok(files.into())
}

/// POST /kb/file/add/ as multipart.
pub async fn add_file(
    client: &ApiClient,
    hash_id: &str,
    project_id: &str,
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<Value, ApiError> {
    let request = ApiRequest::post("kb/file/add/")
        .form_text("hash_id", hash_id)
        .form_text("project_id", project_id)
        .form_file("file", file_name, bytes);
    client.send_json(&request).await
}

/// PATCH /kb/file/update/ as multipart, replacing `old_file` when given.
pub async fn update_file(
    client: &ApiClient,
    hash_id: &str,
    project_id: &str,
    file_name: &str,
    bytes: Vec<u8>,
    old_file: Option<&str>,
) -> Result<Value, ApiError> {
    let mut request = ApiRequest::patch("kb/file/update/")
        .form_text("hash_id", hash_id)
        .form_text("project_id", project_id)
        .form_file("file", file_name, bytes);
    if let Some(old) = old_file {
        request = request.form_text("old_file", old);
    }
    client.send_json(&request).await
}

/// DELETE /kb/file/delete/ with the file named in the body.
pub async fn delete_file(client: &ApiClient, hash_id: &str, file_name: &str) -> Result<(), ApiError> {
    let request = ApiRequest::delete("kb/file/delete/")
        .json(&json!({ "hash_id": hash_id, "file": file_name }))?;
    client.send(&request).await?;
    Ok(())
}
