//! HTTP client with bearer-token injection and automatic token refresh.
//!
//! Authenticated requests carry `Authorization: <scheme> <access>` when an
//! access token is stored. A 401 on the first attempt triggers one
//! coordinated refresh (see [`super::refresh`]) and a single replay of the
//! request with the new token; a second 401 is returned to the caller as is.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{multipart, Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::refresh::{Entry, RefreshGate};
use super::types::{RefreshRequest, RefreshResponse};
use crate::error::ApiError;
use crate::tokens::TokenStore;

/// Default authorization scheme placed before the access token.
pub const DEFAULT_AUTH_SCHEME: &str = "Bearer";

/// Default refresh endpoint, relative to the base URL.
pub const DEFAULT_REFRESH_PATH: &str = "token/refresh/";

/// Request payload. Kept as plain data so a request can be rebuilt for its
/// replay after a token refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    /// `multipart/form-data` fields, in order.
    Form(Vec<FormField>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub name: String,
    pub value: FormValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File { file_name: String, bytes: Vec<u8> },
}

impl RequestBody {
    fn to_multipart(fields: &[FormField]) -> multipart::Form {
        fields.iter().fold(multipart::Form::new(), |form, field| {
            let name = field.name.clone();
            match &field.value {
                FormValue::Text(text) => form.text(name, text.clone()),
                FormValue::File { file_name, bytes } => form.part(
                    name,
                    multipart::Part::bytes(bytes.clone()).file_name(file_name.clone()),
                ),
            }
        })
    }
}

/// A replayable description of one API call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base URL, e.g. `bots/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a query parameter only when `value` is set.
    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.body = Some(RequestBody::Json(value));
        Ok(self)
    }

    /// Append a text field, switching the body to multipart.
    pub fn form_text(self, name: &str, value: impl Into<String>) -> Self {
        self.form_field(name, FormValue::Text(value.into()))
    }

    /// Append a file field, switching the body to multipart.
    pub fn form_file(self, name: &str, file_name: &str, bytes: Vec<u8>) -> Self {
        self.form_field(
            name,
            FormValue::File {
                file_name: file_name.to_string(),
                bytes,
            },
        )
    }

    fn form_field(mut self, name: &str, value: FormValue) -> Self {
        let field = FormField {
            name: name.to_string(),
            value,
        };
        match self.body {
            Some(RequestBody::Form(ref mut fields)) => fields.push(field),
            _ => self.body = Some(RequestBody::Form(vec![field])),
        }
        self
    }
}

/// HTTP client wrapper for the console API.
///
/// Owns the base URL, the shared [`TokenStore`] and the refresh gate. Share
/// one instance per session (it is `Send + Sync`); the single-flight refresh
/// guarantee holds per instance.
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth_scheme: String,
    refresh_path: String,
    tokens: Arc<TokenStore>,
    gate: RefreshGate,
}

impl ApiClient {
    /// Create a new API client with the given base URL.
    pub fn new(base_url: &str, tokens: Arc<TokenStore>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_scheme: DEFAULT_AUTH_SCHEME.to_string(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            tokens,
            gate: RefreshGate::new(),
        }
    }

    pub fn with_auth_scheme(mut self, scheme: &str) -> Self {
        self.auth_scheme = scheme.trim().to_string();
        self
    }

    pub fn with_refresh_path(mut self, path: &str) -> Self {
        self.refresh_path = path.to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// Whether a token refresh is currently in flight.
    pub fn is_refreshing(&self) -> bool {
        self.gate.is_refreshing()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send an authenticated request, refreshing the access token once on 401.
    ///
    /// Non-success statuses become [`ApiError::Status`]. A failed refresh
    /// clears the stored tokens and yields [`ApiError::SessionExpired`].
    pub async fn send(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        let token = self.tokens.access_token();
        let resp = self.dispatch(request, token.as_deref()).await?;
        if resp.status() != StatusCode::UNAUTHORIZED {
            return check_status(resp).await;
        }

        // This request is now marked as retried: the replay below is its only
        // one, whatever it returns.
        log::debug!("{} {} returned 401, renewing access token", request.method, request.path);
        let fresh = self.renew_access_token(token.as_deref()).await?;
        let retry = self.dispatch(request, Some(&fresh)).await?;
        check_status(retry).await
    }

    /// Send a request without an access token and without refresh handling.
    /// Used for login and other anonymous endpoints.
    pub async fn send_public(&self, request: &ApiRequest) -> Result<Response, ApiError> {
        let resp = self.dispatch(request, None).await?;
        check_status(resp).await
    }

    /// Send an unauthenticated request and decode the JSON response.
    pub async fn send_public_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        decode(self.send_public(request).await?).await
    }

    /// Send an authenticated request and decode the JSON response.
    pub async fn send_json<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        decode(self.send(request).await?).await
    }

    /// Send an authenticated GET request to a relative API path.
    pub async fn authenticated_get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send_json(&ApiRequest::get(path)).await
    }

    /// Send an authenticated POST request with a JSON body.
    pub async fn authenticated_post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(&ApiRequest::post(path).json(body)?).await
    }

    /// Send an authenticated PATCH request with a JSON body.
    pub async fn authenticated_patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(&ApiRequest::patch(path).json(body)?).await
    }

    /// Send an authenticated DELETE request, discarding the response body.
    pub async fn authenticated_delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(&ApiRequest::delete(path)).await?;
        Ok(())
    }

    /// Send an unauthenticated POST request with a JSON body.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_public_json(&ApiRequest::post(path).json(body)?).await
    }

    async fn dispatch(&self, request: &ApiRequest, token: Option<&str>) -> Result<Response, ApiError> {
        let mut builder = self
            .client
            .request(request.method.clone(), self.url(&request.path));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        match &request.body {
            Some(RequestBody::Json(body)) => builder = builder.json(body),
            Some(RequestBody::Form(fields)) => {
                builder = builder.multipart(RequestBody::to_multipart(fields))
            }
            None => {}
        }
        if let Some(t) = token {
            builder = builder.header(AUTHORIZATION, format!("{} {}", self.auth_scheme, t));
        }

        Ok(builder.send().await?)
    }

    /// Obtain an access token newer than `stale`, refreshing at most once per
    /// cycle across all concurrent callers.
    async fn renew_access_token(&self, stale: Option<&str>) -> Result<String, ApiError> {
        let entry = self.gate.enter(|| {
            self.tokens
                .access_token()
                .filter(|current| Some(current.as_str()) != stale)
        });

        match entry {
            Entry::Fresh(token) => Ok(token),
            Entry::Follower(rx) => match rx.await {
                Ok(Ok(token)) => Ok(token),
                Ok(Err(reason)) => Err(ApiError::SessionExpired(reason)),
                Err(_) => Err(ApiError::SessionExpired("token refresh was abandoned".to_string())),
            },
            Entry::Leader(guard) => {
                let outcome = self.refresh().await;
                if let Err(ref reason) = outcome {
                    log::warn!("Token refresh failed, clearing session: {}", reason);
                    self.tokens.clear();
                }
                let released = guard.finish(&outcome);
                if released > 0 {
                    log::info!("Released {} requests queued behind token refresh", released);
                }
                outcome.map_err(ApiError::SessionExpired)
            }
        }
    }

    /// POST the stored refresh token to the refresh endpoint and store the
    /// new access token (and the rotated refresh token, if any).
    async fn refresh(&self) -> Result<String, String> {
        let refresh_token = self
            .tokens
            .refresh_token()
            .ok_or_else(|| "no refresh token stored".to_string())?;

        log::info!("Refreshing access token");
        let body = RefreshRequest {
            refresh: refresh_token,
        };
        let resp = self
            .client
            .post(self.url(&self.refresh_path))
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Refresh request failed: {}", e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(format!("Refresh failed ({}): {}", status, body));
        }

        let refreshed: RefreshResponse = resp
            .json()
            .await
            .map_err(|e| format!("Failed to parse refresh response: {}", e))?;
        if refreshed.access.is_empty() {
            return Err("Refresh response carried an empty access token".to_string());
        }

        match refreshed.refresh.as_deref() {
            Some(rotated) if !rotated.is_empty() => {
                self.tokens.set_pair(Some(&refreshed.access), Some(rotated))
            }
            _ => self.tokens.set_access_token(Some(&refreshed.access)),
        }
        log::info!("Access token refreshed");
        Ok(refreshed.access)
    }
}

async fn check_status(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Status { status, body })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}
