//! Request and response types for the console REST API.
//!
//! Field names follow the API's snake_case JSON. Optional fields default so
//! partial server payloads still decode; unknown fields are ignored.

use serde::{Deserialize, Serialize};

// ── Auth ────────────────────────────────────────────────────────────────────

/// Login request body sent to POST /login/.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response from POST /login/.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Body for the refresh endpoint and for POST /logout/.
#[derive(Debug, Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Refresh response. `refresh` is only present when the server rotates
/// refresh tokens.
#[derive(Debug, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

// ── Pagination ──────────────────────────────────────────────────────────────

/// Paged list envelope used by list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

// ── Entities ────────────────────────────────────────────────────────────────

/// Console role of a user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Administrator,
    Manager,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(default)]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpertiseArea {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
}

/// A stored chat conversation between a user and an agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatSession {
    #[serde(default)]
    pub id: String,
    pub session_key: String,
    #[serde(default, alias = "agent_id")]
    pub agent: String,
    #[serde(default, alias = "user_id")]
    pub user: String,
    /// Serialized conversation; null for sessions that never stored one.
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// An agent, called a bot by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Agent {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url_n8n: String,
    #[serde(default)]
    pub expertise_area: Option<ExpertiseArea>,
    #[serde(default)]
    pub projects: Vec<ProjectSummary>,
    #[serde(default)]
    pub chat_sessions: Vec<ChatSession>,
}

/// The owning client of a project; the API sends either an id or an object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ProjectClient {
    Id(String),
    Summary {
        id: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl ProjectClient {
    pub fn id(&self) -> &str {
        match self {
            ProjectClient::Id(id) => id,
            ProjectClient::Summary { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub client: Option<ProjectClient>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Knowledge base. Identified by `hash_id`; the numeric database id is not
/// used by the console.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeBase {
    #[serde(default)]
    pub hash_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A tenant of the platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    #[serde(default)]
    pub id: String,
    pub name: String,
}

/// A chat message the user starred. The API identifies favorites by
/// `message_id`; list responses name the agent and session `agent` and
/// `session`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Favorite {
    pub message_id: String,
    #[serde(default, alias = "session")]
    pub session_key: String,
    #[serde(default, alias = "agent")]
    pub agent_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub agent_name: String,
}

// ── Payloads ────────────────────────────────────────────────────────────────

/// POST /bots/ body.
#[derive(Debug, Clone, Serialize)]
pub struct NewAgent {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url_n8n: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// PATCH /bots/{id}/ body. Absent fields are left untouched by the server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AgentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_n8n: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<String>>,
    /// `Some(None)` detaches the expertise area.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expertise_area: Option<Option<String>>,
}

/// Query parameters for GET /bots/.
#[derive(Debug, Clone, Default)]
pub struct AgentQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub active: Option<bool>,
}

/// Project create/edit body.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectForm {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub client_id: String,
}

/// Result of POST /projects/{id}/bots/attach/.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachResult {
    #[serde(default)]
    pub attached_now: Vec<String>,
    #[serde(default)]
    pub already_attached: Vec<String>,
    #[serde(default)]
    pub missing: Vec<String>,
    #[serde(default)]
    pub count_total: u64,
}

/// Result of POST /projects/{id}/bots/detach/.
#[derive(Debug, Clone, Deserialize)]
pub struct DetachResult {
    #[serde(default)]
    pub detached_now: Vec<String>,
    #[serde(default)]
    pub not_attached: Vec<String>,
    #[serde(default)]
    pub missing: Vec<String>,
    #[serde(default)]
    pub count_total: u64,
}

// ── Knowledge bases ─────────────────────────────────────────────────────────

/// GET /kb/list-all/ envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct KnowledgeBaseListing {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub kbs: Vec<KnowledgeBase>,
}

/// A file inside a knowledge base.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct KnowledgeBaseFile {
    pub name: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

/// The file list comes back either bare or wrapped in `files`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum KnowledgeBaseFiles {
    Wrapped { files: Vec<KnowledgeBaseFile> },
    Bare(Vec<KnowledgeBaseFile>),
}

impl From<KnowledgeBaseFiles> for Vec<KnowledgeBaseFile> {
    fn from(files: KnowledgeBaseFiles) -> Self {
        match files {
            KnowledgeBaseFiles::Wrapped { files } | KnowledgeBaseFiles::Bare(files) => files,
        }
    }
}

/// POST /kb/create/ body.
#[derive(Debug, Clone, Serialize)]
pub struct NewKnowledgeBase {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub project_id: String,
}

/// PATCH /kb/edit/ body.
#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeBaseEdit {
    pub hash_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ── Accounts ────────────────────────────────────────────────────────────────

/// Self-registration form for POST /create/ (sent as multipart).
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// File name and contents of an avatar image.
    pub avatar: Option<(String, Vec<u8>)>,
}

/// POST /invite/ body.
#[derive(Debug, Clone, Serialize)]
pub struct Invitation {
    pub email: String,
    pub role: UserRole,
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// A role the console can assign.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RoleOption {
    pub value: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RoleListing {
    pub roles: Vec<RoleOption>,
}

/// POST /expertise-areas/ body.
#[derive(Debug, Clone, Serialize)]
pub struct NewExpertiseArea {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Acknowledgement returned by invite and password endpoints.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Detail {
    #[serde(default, alias = "message")]
    pub detail: Option<String>,
}
