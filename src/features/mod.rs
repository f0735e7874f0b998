//! Feature-level workflows that pair API calls with the entity store.

pub mod agents;
pub mod knowledge_bases;

pub use agents::Agents;
pub use knowledge_bases::KnowledgeBases;
