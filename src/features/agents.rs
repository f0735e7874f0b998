//! Agent list workflow: fetch-once caching plus create/update/delete that
//! keep the cached collection in step with the server.

use crate::api::client::ApiClient;
use crate::api::types::{Agent, AgentPatch, AgentQuery, Favorite, NewAgent};
use crate::api::{bots, chat_sessions, favorites};
use crate::error::ApiError;
use crate::store::Store;

/// Agents fetched per list call; the console shows them on one screen.
pub const FETCH_PAGE_SIZE: u32 = 100;

pub struct Agents<'a> {
    api: &'a ApiClient,
    store: &'a Store,
}

impl<'a> Agents<'a> {
    pub fn new(api: &'a ApiClient, store: &'a Store) -> Self {
        Self { api, store }
    }

    /// Agents currently cached, without touching the network.
    pub fn cached(&self) -> Vec<Agent> {
        self.store.items()
    }

    /// Return cached agents, fetching from the API when the cache is empty
    /// or `force` is set.
    pub async fn fetch(&self, force: bool) -> Result<Vec<Agent>, ApiError> {
        if !force {
            let cached = self.cached();
            if !cached.is_empty() {
                return Ok(cached);
            }
        }

        let query = AgentQuery {
            page_size: Some(FETCH_PAGE_SIZE),
            ..Default::default()
        };
        let page = bots::list(self.api, &query).await?;
        if page.count > page.results.len() as u64 {
            log::warn!(
                "Showing {} of {} agents; the rest are beyond the first page",
                page.results.len(),
                page.count
            );
        }
        self.store.update(page.results.clone());
        Ok(page.results)
    }

    pub async fn reload(&self) -> Result<Vec<Agent>, ApiError> {
        self.fetch(true).await
    }

    pub async fn add(&self, payload: &NewAgent) -> Result<Agent, ApiError> {
        let created = bots::create(self.api, payload).await?;
        self.store.add_one(created.clone());
        Ok(created)
    }

    /// Patch an agent and merge the server's copy into the cache.
    ///
    /// Cached chat sessions survive when the response omits them.
    pub async fn update(&self, id: &str, patch: &AgentPatch) -> Result<Agent, ApiError> {
        let updated = bots::patch(self.api, id, patch).await?;
        let replacement = updated.clone();
        self.store.edit::<Agent>(id, move |agent| {
            let sessions = std::mem::take(&mut agent.chat_sessions);
            *agent = replacement;
            if agent.chat_sessions.is_empty() {
                agent.chat_sessions = sessions;
            }
        });
        Ok(updated)
    }

    pub async fn remove(&self, id: &str) -> Result<(), ApiError> {
        bots::remove(self.api, id).await?;
        self.store.remove::<Agent>(id);
        Ok(())
    }

    /// Delete a chat session on the server and drop it from the cached agent.
    pub async fn delete_session(&self, agent_id: &str, session_key: &str) -> Result<(), ApiError> {
        chat_sessions::delete(self.api, session_key, agent_id).await?;
        self.store.remove_session_from_agent(agent_id, session_key);
        Ok(())
    }

    pub async fn fetch_favorites(&self, force: bool) -> Result<Vec<Favorite>, ApiError> {
        if !force {
            let cached = self.store.items::<Favorite>();
            if !cached.is_empty() {
                return Ok(cached);
            }
        }
        let fetched = favorites::list(self.api).await?;
        self.store.update(fetched.clone());
        Ok(fetched)
    }

    pub async fn remove_favorite(&self, message_id: &str) -> Result<(), ApiError> {
        favorites::delete(self.api, message_id).await?;
        self.store.remove_favorite_by_message(message_id);
        Ok(())
    }
}
