//! Session endpoints: login, logout and the current user.
//!
//! Login goes through the unauthenticated path so bad credentials surface as
//! a plain 401 instead of triggering a token refresh.

use serde_json::json;

use super::client::{ApiClient, ApiRequest};
use super::types::{Detail, LoginRequest, LoginResponse, RefreshRequest, Registration, User};
use crate::error::ApiError;

/// POST /login/ and store the returned token pair.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
    log::info!("Logging in as {}", email);
    let request = LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    };
    let resp: LoginResponse = client.post("login/", &request).await?;

    client
        .tokens()
        .set_pair(Some(&resp.access), resp.refresh.as_deref());
    if resp.refresh.is_none() {
        log::warn!("Login response carried no refresh token; session ends when the access token expires");
    }
    Ok(resp)
}

/// POST /logout/ with the refresh token (best-effort), then clear tokens.
///
/// Local tokens are cleared even when the server call fails.
pub async fn logout(client: &ApiClient) -> Result<(), ApiError> {
    let Some(refresh) = client.tokens().refresh_token() else {
        client.tokens().clear();
        return Ok(());
    };

    let result = client
        .authenticated_post::<_, serde_json::Value>("logout/", &RefreshRequest { refresh })
        .await;
    client.tokens().clear();

    match result {
        Ok(_) => Ok(()),
        // Logout endpoints commonly answer 204/205 with an empty body.
        Err(ApiError::Decode(_)) => Ok(()),
        Err(e) => Err(e),
    }
}

/// GET /me/.
pub async fn me(client: &ApiClient) -> Result<User, ApiError> {
    client.authenticated_get("me/").await
}

/// POST /create/ as multipart. The endpoint rejects JSON bodies with 415.
pub async fn register(client: &ApiClient, form: &Registration) -> Result<User, ApiError> {
    let mut request = ApiRequest::post("create/")
        .form_text("email", form.email.as_str())
        .form_text("username", form.username.as_str())
        .form_text("password", form.password.as_str());
    if let Some(ref first) = form.first_name {
        request = request.form_text("first_name", first.as_str());
    }
    if let Some(ref last) = form.last_name {
        request = request.form_text("last_name", last.as_str());
    }
    if let Some((ref file_name, ref bytes)) = form.avatar {
        request = request.form_file("avatar", file_name, bytes.clone());
    }
    client.send_public_json(&request).await
}

/// POST /password/forgot/. The server mails a reset link if the address is known.
pub async fn request_password_reset(client: &ApiClient, email: &str) -> Result<Detail, ApiError> {
    client.post("password/forgot/", &json!({ "email": email })).await
}

/// POST /password/reset/ with the email and token from the reset link.
pub async fn reset_password(
    client: &ApiClient,
    email: &str,
    token: &str,
    new_password: &str,
) -> Result<Detail, ApiError> {
    let request = ApiRequest::post("password/reset/")
        .query("email", email)
        .query("token", token)
        .json(&json!({ "new_password": new_password }))?;
    client.send_public_json(&request).await
}
