//! Roles the current user may assign when inviting.

use super::client::ApiClient;
use super::types::{RoleListing, RoleOption};
use crate::error::ApiError;

/// GET /roles/.
pub async fn list(client: &ApiClient) -> Result<Vec<RoleOption>, ApiError> {
    let listing: RoleListing = client.authenticated_get("roles/").await?;
    Ok(listing.roles)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::tokens::TokenStore;

    #[tokio::test]
    async fn test_list_roles_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/roles/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "roles": [
                    { "value": "MANAGER", "label": "Manager" },
                    { "value": "USER", "label": "User" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = Arc::new(TokenStore::in_memory());
        tokens.set_access_token(Some("A1"));
        let roles = list(&ApiClient::new(&server.uri(), tokens)).await.unwrap();
        let values: Vec<_> = roles.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, ["MANAGER", "USER"]);
    }
}
