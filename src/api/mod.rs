//! API client module for the enlaight console.
//!
//! Provides the HTTP client with bearer-token injection and single-flight
//! token refresh, plus thin service functions over the console's REST
//! endpoints and their request/response types.

pub mod auth;
pub mod bots;
pub mod chat_sessions;
pub mod client;
pub mod clients;
pub mod expertise;
pub mod favorites;
pub mod invites;
pub mod knowledge_bases;
pub mod projects;
pub mod refresh;
pub mod roles;
pub mod types;
pub mod users;


pub use client::{ApiClient, ApiRequest, FormField, FormValue, RequestBody};
