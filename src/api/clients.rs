//! Tenant (client) endpoints.

use serde_json::json;

use super::client::ApiClient;
use super::types::Client;
use crate::error::ApiError;

fn client_path(id: &str) -> String {
    format!("clients/{}/", urlencoding::encode(id))
}

/// GET /clients/.
pub async fn list(client: &ApiClient) -> Result<Vec<Client>, ApiError> {
    client.authenticated_get("clients/").await
}

/// POST /clients/.
pub async fn create(client: &ApiClient, name: &str) -> Result<Client, ApiError> {
    client.authenticated_post("clients/", &json!({ "name": name })).await
}

/// PATCH /clients/{id}/.
pub async fn update(client: &ApiClient, id: &str, name: &str) -> Result<Client, ApiError> {
    client
        .authenticated_patch(&client_path(id), &json!({ "name": name }))
        .await
}

/// DELETE /clients/{id}/.
pub async fn delete(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.authenticated_delete(&client_path(id)).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::tokens::TokenStore;

    fn client_for(server: &MockServer) -> ApiClient {
        let tokens = Arc::new(TokenStore::in_memory());
        tokens.set_access_token(Some("A1"));
        ApiClient::new(&server.uri(), tokens)
    }

    #[tokio::test]
    async fn test_client_crud() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/clients/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "c1", "name": "Acme" }])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/clients/"))
            .and(body_json(json!({ "name": "Globex" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "c2", "name": "Globex" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/clients/c2/"))
            .and(body_json(json!({ "name": "Globex Corp" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "c2", "name": "Globex Corp" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/clients/c2/"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let api = client_for(&server);
        assert_eq!(list(&api).await.unwrap()[0].name, "Acme");
        assert_eq!(create(&api, "Globex").await.unwrap().id, "c2");
        assert_eq!(update(&api, "c2", "Globex Corp").await.unwrap().name, "Globex Corp");
        delete(&api, "c2").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_surfaces_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/clients/c1/"))
            .respond_with(ResponseTemplate::new(409).set_body_string("client has projects"))
            .mount(&server)
            .await;

        let err = delete(&client_for(&server), "c1").await.unwrap_err();
        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status.as_u16(), 409);
                assert!(body.contains("projects"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
