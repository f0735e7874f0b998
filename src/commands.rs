//! Command handlers behind the `enlaight-console` CLI.
//!
//! Each handler performs one session or listing operation against
//! [`AppState`] and prints a short human-readable result to stdout.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::Engine;

use crate::api::{self, auth};
use crate::error::ApiError;
use crate::features::Agents;
use crate::state::AppState;

/// Claims the console reads from an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// `user_id`, or `sub` when the token has no `user_id`.
    pub user_id: String,
    /// Expiry as Unix seconds.
    pub expires_at: Option<u64>,
}

/// Log in and store the token pair.
pub async fn login(state: &AppState, email: &str, password: &str) -> Result<(), String> {
    let resp = auth::login(&state.api, email, password)
        .await
        .map_err(|e| describe("Login failed", e))?;

    match resp.user {
        Some(user) => println!("Logged in as {} ({})", user.email, user.id),
        None => println!("Logged in as {}", email),
    }
    Ok(())
}

/// Invalidate the refresh token server-side (best-effort) and clear the
/// local session.
pub async fn logout(state: &AppState) -> Result<(), String> {
    if let Err(e) = auth::logout(&state.api).await {
        log::warn!("Logout request failed (local session cleared anyway): {}", e);
    }
    state.clear_session();
    println!("Logged out");
    Ok(())
}

/// Show the authenticated user as the server sees it.
pub async fn whoami(state: &AppState) -> Result<(), String> {
    let user = auth::me(&state.api)
        .await
        .map_err(|e| describe("Failed to fetch current user", e))?;
    let name = format!("{} {}", user.first_name, user.last_name);
    println!("{} <{}>", name.trim(), user.email);
    println!("  id:     {}", user.id);
    if let Some(role) = user.role {
        println!("  role:   {:?}", role);
    }
    println!("  active: {}", user.is_active);
    Ok(())
}

/// Inspect stored tokens without contacting the server.
pub fn status(state: &AppState) -> Result<(), String> {
    println!("API: {}", state.config.api_base_url);

    let tokens = state.tokens();
    let Some(access) = tokens.access_token() else {
        println!("Not logged in");
        return Ok(());
    };

    match decode_claims(&access) {
        Ok(claims) => {
            println!("User: {}", claims.user_id);
            if let Some(exp) = claims.expires_at {
                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                if exp > now {
                    println!("Access token expires in {}s", exp - now);
                } else {
                    println!("Access token expired {}s ago", now - exp);
                }
            }
        }
        Err(e) => println!("Access token present ({})", e),
    }

    let refresh = if tokens.refresh_token().is_some() {
        "present"
    } else {
        "missing (session ends when the access token expires)"
    };
    println!("Refresh token: {}", refresh);
    Ok(())
}

/// List agents, optionally filtered by a case-insensitive name match.
pub async fn agents(state: &AppState, search: Option<&str>) -> Result<(), String> {
    let agents = Agents::new(&state.api, &state.store)
        .fetch(false)
        .await
        .map_err(|e| describe("Failed to list agents", e))?;

    let needle = search.map(|s| s.to_lowercase());
    let mut shown = 0;
    for agent in &agents {
        if let Some(ref needle) = needle {
            if !agent.name.to_lowercase().contains(needle) {
                continue;
            }
        }
        let expertise = agent
            .expertise_area
            .as_ref()
            .map(|e| e.name.as_str())
            .unwrap_or("-");
        println!(
            "{:<34} {:<30} {:<20} {} sessions",
            agent.id,
            agent.name,
            expertise,
            agent.chat_sessions.len()
        );
        shown += 1;
    }
    println!("{} agents", shown);
    Ok(())
}

/// List one page of projects.
pub async fn projects(
    state: &AppState,
    page: u32,
    page_size: u32,
    search: Option<&str>,
) -> Result<(), String> {
    let listing = api::projects::list(&state.api, page, page_size, search)
        .await
        .map_err(|e| describe("Failed to list projects", e))?;

    for project in &listing.results {
        let client = project.client.as_ref().map(|c| c.id()).unwrap_or("-");
        println!("{:<34} {:<30} client {}", project.id, project.name, client);
    }
    println!(
        "page {} ({} of {} projects)",
        page,
        listing.results.len(),
        listing.count
    );
    Ok(())
}

fn describe(context: &str, error: ApiError) -> String {
    match error {
        ApiError::SessionExpired(_) => {
            format!("{}: session expired, run `enlaight-console login` again", context)
        }
        other => format!("{}: {}", context, other),
    }
}

/// Decode the payload of a JWT access token without verifying it; the
/// server verifies, the console only needs the user id and expiry.
pub fn decode_claims(token: &str) -> Result<TokenClaims, String> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid JWT format".to_string());
    }

    let payload = parts[1].trim_end_matches('=');
    let decoded = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| format!("Failed to decode JWT payload: {}", e))?;

    let json: serde_json::Value = serde_json::from_slice(&decoded)
        .map_err(|e| format!("Failed to parse JWT payload: {}", e))?;

    let user_id = match (&json["user_id"], &json["sub"]) {
        (serde_json::Value::String(s), _) | (_, serde_json::Value::String(s)) => s.clone(),
        (serde_json::Value::Number(n), _) => n.to_string(),
        _ => return Err("JWT payload missing 'user_id'/'sub' claim".to_string()),
    };

    Ok(TokenClaims {
        user_id,
        expires_at: json["exp"].as_u64(),
    })
}
