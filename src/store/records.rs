use super::{CollectionKind, Tables};
use crate::api::types::{Agent, Client, Favorite, KnowledgeBase, Project, User};

/// An entity cached in the [`Store`](super::Store). Each record type maps to
/// exactly one collection.
pub trait Record: Clone + Send + Sync + 'static {
    const KIND: CollectionKind;

    /// Identity within the collection. Empty means "not yet assigned".
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);

    fn table(tables: &Tables) -> &Vec<Self>;
    fn table_mut(tables: &mut Tables) -> &mut Vec<Self>;
}

macro_rules! record {
    ($ty:ty, $kind:ident, $table:ident, $id:ident) => {
        impl Record for $ty {
            const KIND: CollectionKind = CollectionKind::$kind;

            fn id(&self) -> &str {
                &self.$id
            }

            fn set_id(&mut self, id: String) {
                self.$id = id;
            }

            fn table(tables: &Tables) -> &Vec<Self> {
                &tables.$table
            }

            fn table_mut(tables: &mut Tables) -> &mut Vec<Self> {
                &mut tables.$table
            }
        }
    };
}

record!(User, Users, users, id);
record!(Agent, Agents, agents, id);
record!(Project, Projects, projects, id);
record!(KnowledgeBase, KnowledgeBases, knowledge_bases, hash_id);
record!(Client, Clients, clients, id);
record!(Favorite, Favorites, favorites, message_id);
