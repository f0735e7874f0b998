//! Expertise areas that agents can be tagged with.

use super::client::{ApiClient, ApiRequest};
use super::types::{ExpertiseArea, NewExpertiseArea, Paginated};
use crate::error::ApiError;

/// GET /expertise-areas/.
pub async fn list(client: &ApiClient, page: u32, page_size: u32) -> Result<Paginated<ExpertiseArea>, ApiError> {
    let request = ApiRequest::get("expertise-areas/")
        .query("page", page)
        .query("page_size", page_size);
    client.send_json(&request).await
}

/// POST /expertise-areas/.
pub async fn create(client: &ApiClient, area: &NewExpertiseArea) -> Result<ExpertiseArea, ApiError> {
    client.authenticated_post("expertise-areas/", area).await
}
