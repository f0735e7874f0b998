//! User directory.

use super::client::{ApiClient, ApiRequest};
use super::types::{Paginated, User};
use crate::error::ApiError;

/// GET /users/ one page at a time.
pub async fn list(
    client: &ApiClient,
    page: u32,
    page_size: u32,
    search: Option<&str>,
) -> Result<Paginated<User>, ApiError> {
    let request = ApiRequest::get("users/")
        .query("page", page)
        .query("page_size", page_size)
        .query_opt("search", search.filter(|s| !s.is_empty()));
    client.send_json(&request).await
}
