//! In-memory, observable cache of console entities.
//!
//! One typed collection per [`CollectionKind`], selected by the element type:
//! `store.add::<Agent>(..)` can only ever touch the agents collection.
//! Every mutation that changes a collection publishes a [`StoreEvent`] to
//! subscribers. Nothing is persisted; collections are rehydrated from the API.

mod records;

pub use records::Record;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rand::RngCore;
use tokio::sync::broadcast;

use crate::api::types::{Agent, Client, Favorite, KnowledgeBase, Project, User};

/// Buffered events per subscriber before slow receivers start lagging.
const EVENT_CAPACITY: usize = 256;

/// Random bytes per generated record id (hex-encoded to 32 chars).
const ID_BYTES: usize = 16;

/// The closed set of cached collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Users,
    Agents,
    Projects,
    KnowledgeBases,
    Clients,
    Favorites,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 6] = [
        CollectionKind::Users,
        CollectionKind::Agents,
        CollectionKind::Projects,
        CollectionKind::KnowledgeBases,
        CollectionKind::Clients,
        CollectionKind::Favorites,
    ];
}

/// What a mutation did to a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Replaced { len: usize },
    Added { ids: Vec<String> },
    Edited { id: String },
    Removed { id: String },
    SessionRemoved { agent_id: String, session_key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEvent {
    pub kind: CollectionKind,
    pub change: Change,
}

/// Plain snapshot of every collection.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub users: Vec<User>,
    pub agents: Vec<Agent>,
    pub projects: Vec<Project>,
    pub knowledge_bases: Vec<KnowledgeBase>,
    pub clients: Vec<Client>,
    pub favorites: Vec<Favorite>,
}

/// Shared handle to the cache. Clones observe and mutate the same tables.
#[derive(Clone)]
pub struct Store {
    tables: Arc<RwLock<Tables>>,
    events: broadcast::Sender<StoreEvent>,
}

impl Store {
    /// Create a store with every collection empty.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            tables: Arc::new(RwLock::new(Tables::default())),
            events,
        }
    }

    /// Receive an event for every subsequent change.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> Tables {
        self.read().clone()
    }

    pub fn items<T: Record>(&self) -> Vec<T> {
        T::table(&self.read()).clone()
    }

    pub fn find<T: Record>(&self, id: &str) -> Option<T> {
        T::table(&self.read()).iter().find(|r| r.id() == id).cloned()
    }

    pub fn len<T: Record>(&self) -> usize {
        T::table(&self.read()).len()
    }

    pub fn is_empty<T: Record>(&self) -> bool {
        T::table(&self.read()).is_empty()
    }

    /// Replace the whole collection.
    pub fn update<T: Record>(&self, items: Vec<T>) {
        let len = items.len();
        *T::table_mut(&mut self.write()) = items;
        self.notify(T::KIND, Change::Replaced { len });
    }

    /// Append records, assigning a generated id to any record without one.
    /// Returns the ids of the appended records in order.
    pub fn add<T: Record>(&self, items: impl IntoIterator<Item = T>) -> Vec<String> {
        let items: Vec<T> = items
            .into_iter()
            .map(|mut item| {
                if item.id().is_empty() {
                    item.set_id(generate_id());
                }
                item
            })
            .collect();
        if items.is_empty() {
            return Vec::new();
        }

        let ids: Vec<String> = items.iter().map(|r| r.id().to_string()).collect();
        T::table_mut(&mut self.write()).extend(items);
        self.notify(T::KIND, Change::Added { ids: ids.clone() });
        ids
    }

    /// Append a single record and return its id.
    pub fn add_one<T: Record>(&self, item: T) -> String {
        self.add(std::iter::once(item)).remove(0)
    }

    /// Apply `apply` to the record whose id matches. Other records are left
    /// untouched; returns `false` (and changes nothing) if none matches.
    pub fn edit<T: Record>(&self, id: &str, apply: impl FnOnce(&mut T)) -> bool {
        let edited = {
            let mut tables = self.write();
            match T::table_mut(&mut tables).iter_mut().find(|r| r.id() == id) {
                Some(record) => {
                    apply(record);
                    true
                }
                None => false,
            }
        };
        if edited {
            self.notify(T::KIND, Change::Edited { id: id.to_string() });
        }
        edited
    }

    /// Delete the record with a matching id. Returns `false` if absent.
    pub fn remove<T: Record>(&self, id: &str) -> bool {
        let removed = {
            let mut tables = self.write();
            let table = T::table_mut(&mut tables);
            let before = table.len();
            table.retain(|r| r.id() != id);
            table.len() != before
        };
        if removed {
            self.notify(T::KIND, Change::Removed { id: id.to_string() });
        }
        removed
    }

    /// Drop one chat session (matched by `session_key`) from an agent.
    pub fn remove_session_from_agent(&self, agent_id: &str, session_key: &str) -> bool {
        let removed = {
            let mut tables = self.write();
            match tables.agents.iter_mut().find(|a| a.id == agent_id) {
                Some(agent) => {
                    let before = agent.chat_sessions.len();
                    agent.chat_sessions.retain(|s| s.session_key != session_key);
                    agent.chat_sessions.len() != before
                }
                None => false,
            }
        };
        if removed {
            self.notify(
                CollectionKind::Agents,
                Change::SessionRemoved {
                    agent_id: agent_id.to_string(),
                    session_key: session_key.to_string(),
                },
            );
        }
        removed
    }

    /// Drop every favorite pointing at `message_id`. The same message can be
    /// starred from more than one session.
    pub fn remove_favorite_by_message(&self, message_id: &str) -> bool {
        let removed = {
            let mut tables = self.write();
            let before = tables.favorites.len();
            tables.favorites.retain(|f| f.message_id != message_id);
            tables.favorites.len() != before
        };
        if removed {
            self.notify(
                CollectionKind::Favorites,
                Change::Removed {
                    id: message_id.to_string(),
                },
            );
        }
        removed
    }

    /// Empty every collection (logout).
    pub fn reset(&self) {
        *self.write() = Tables::default();
        for kind in CollectionKind::ALL {
            self.notify(kind, Change::Replaced { len: 0 });
        }
    }

    fn notify(&self, kind: CollectionKind, change: Change) {
        log::trace!("Store change on {:?}: {:?}", kind, change);
        // No subscribers is fine.
        let _ = self.events.send(StoreEvent { kind, change });
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Random record id: 16 bytes from the OS RNG, hex-encoded.
///
/// Collisions are not checked; with 128 random bits they are negligible for
/// a client-side cache.
pub fn generate_id() -> String {
    let mut buf = [0u8; ID_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}
