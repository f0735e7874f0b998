//! Knowledge bases of one project, mirrored into the store.

use crate::api::client::ApiClient;
use crate::api::knowledge_bases;
use crate::api::types::{KnowledgeBase, KnowledgeBaseEdit, NewKnowledgeBase};
use crate::error::ApiError;
use crate::store::Store;

pub struct KnowledgeBases<'a> {
    api: &'a ApiClient,
    store: &'a Store,
}

impl<'a> KnowledgeBases<'a> {
    pub fn new(api: &'a ApiClient, store: &'a Store) -> Self {
        Self { api, store }
    }

    /// Replace the cached collection with the project's knowledge bases.
    pub async fn fetch(&self, project_id: &str) -> Result<Vec<KnowledgeBase>, ApiError> {
        let kbs = knowledge_bases::list_all(self.api, project_id).await?;
        self.store.update(kbs.clone());
        Ok(kbs)
    }

    pub async fn create(&self, payload: &NewKnowledgeBase) -> Result<KnowledgeBase, ApiError> {
        let created = knowledge_bases::create(self.api, payload).await?;
        self.store.add_one(created.clone());
        Ok(created)
    }

    /// Edit on the server, then apply the same fields to the cached copy.
    pub async fn edit(&self, payload: &KnowledgeBaseEdit) -> Result<(), ApiError> {
        knowledge_bases::edit(self.api, payload).await?;
        let name = payload.name.clone();
        let description = payload.description.clone();
        self.store.edit::<KnowledgeBase>(&payload.hash_id, move |kb| {
            if let Some(name) = name {
                kb.name = name;
            }
            if description.is_some() {
                kb.description = description;
            }
        });
        Ok(())
    }

    pub async fn delete(&self, hash_id: &str) -> Result<(), ApiError> {
        knowledge_bases::delete(self.api, hash_id).await?;
        self.store.remove::<KnowledgeBase>(hash_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::tokens::TokenStore;

    fn client_for(server: &MockServer) -> ApiClient {
        let tokens = Arc::new(TokenStore::in_memory());
        tokens.set_pair(Some("A1"), Some("R1"));
        ApiClient::new(&server.uri(), tokens)
    }

    async fn mount_listing(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/kb/list-all/"))
            .and(query_param("project_id", "p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "project_id": "p1",
                "count": 2,
                "kbs": [
                    { "external_id": "h1", "name": "Docs" },
                    { "external_id": "h2", "name": "FAQ" }
                ]
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_then_edit_and_delete_keep_cache_in_step() {
        let server = MockServer::start().await;
        mount_listing(&server).await;
        Mock::given(method("PATCH"))
            .and(path("/kb/edit/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/kb/delete/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
            .expect(1)
            .mount(&server)
            .await;

        let api = client_for(&server);
        let store = Store::new();
        let kbs = KnowledgeBases::new(&api, &store);

        kbs.fetch("p1").await.unwrap();
        assert_eq!(store.len::<KnowledgeBase>(), 2);

        let edit = KnowledgeBaseEdit {
            hash_id: "h1".into(),
            name: Some("Handbook".into()),
            description: Some("internal".into()),
        };
        kbs.edit(&edit).await.unwrap();
        let cached = store.find::<KnowledgeBase>("h1").unwrap();
        assert_eq!(cached.name, "Handbook");
        assert_eq!(cached.description.as_deref(), Some("internal"));

        kbs.delete("h2").await.unwrap();
        assert!(store.find::<KnowledgeBase>("h2").is_none());
        assert_eq!(store.len::<KnowledgeBase>(), 1);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_cache() {
        let server = MockServer::start().await;
        mount_listing(&server).await;
        Mock::given(method("DELETE"))
            .and(path("/kb/delete/"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let api = client_for(&server);
        let store = Store::new();
        let kbs = KnowledgeBases::new(&api, &store);
        kbs.fetch("p1").await.unwrap();

        assert!(kbs.delete("h1").await.is_err());
        assert_eq!(store.len::<KnowledgeBase>(), 2);
    }

    #[tokio::test]
    async fn test_create_adds_to_cache() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/kb/create/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hash_id": "h5" })))
            .mount(&server)
            .await;

        let api = client_for(&server);
        let store = Store::new();
        let payload = NewKnowledgeBase {
            name: "Manuals".into(),
            description: None,
            project_id: "p1".into(),
        };
        KnowledgeBases::new(&api, &store).create(&payload).await.unwrap();
        assert_eq!(store.find::<KnowledgeBase>("h5").unwrap().name, "Manuals");
    }
}
