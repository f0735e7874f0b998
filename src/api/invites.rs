//! Invitations: an administrator invites an email into a project, and the
//! invitee sets a password through the emailed link.

use serde_json::json;

use super::client::{ApiClient, ApiRequest};
use super::types::{Detail, Invitation};
use crate::error::ApiError;

/// POST /invite/.
pub async fn send(client: &ApiClient, invitation: &Invitation) -> Result<Detail, ApiError> {
    log::info!("Inviting {} as {:?}", invitation.email, invitation.role);
    client.authenticated_post("invite/", invitation).await
}

/// POST /invite/confirm/ with the email and token from the invitation link.
/// Anonymous: the invitee has no session yet.
pub async fn confirm(client: &ApiClient, email: &str, token: &str, password: &str) -> Result<Detail, ApiError> {
    let request = ApiRequest::post("invite/confirm/")
        .query("email", email)
        .query("token", token)
        .json(&json!({ "password": password }))?;
    client.send_public_json(&request).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::types::UserRole;
    use crate::tokens::TokenStore;

    fn client_for(server: &MockServer) -> ApiClient {
        let tokens = Arc::new(TokenStore::in_memory());
        tokens.set_access_token(Some("A1"));
        ApiClient::new(&server.uri(), tokens)
    }

    #[tokio::test]
    async fn test_send_invitation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/invite/"))
            .and(header("Authorization", "Bearer A1"))
            .and(body_json(json!({
                "email": "bo@example.com",
                "role": "MANAGER",
                "project_id": "p1"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "detail": "Invitation sent" })))
            .expect(1)
            .mount(&server)
            .await;

        let invitation = Invitation {
            email: "bo@example.com".into(),
            role: UserRole::Manager,
            project_id: "p1".into(),
            client_id: None,
        };
        let detail = send(&client_for(&server), &invitation).await.unwrap();
        assert_eq!(detail.detail.as_deref(), Some("Invitation sent"));
    }

    #[tokio::test]
    async fn test_confirm_passes_link_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/invite/confirm/"))
            .and(query_param("email", "bo@example.com"))
            .and(query_param("token", "abc"))
            .and(body_json(json!({ "password": "s3cret" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let detail = confirm(&client_for(&server), "bo@example.com", "abc", "s3cret")
            .await
            .unwrap();
        assert_eq!(detail, Detail::default());
    }
}
